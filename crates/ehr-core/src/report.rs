//! Exportable summaries of query results.
//!
//! Thin serializable views over the query engine for downstream consumers
//! (dashboards, spreadsheet imports). JSON via serde, CSV written by hand.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::index::RecordIndex;
use crate::query::{self, Comparator, QueryResult};

/// Result of one out-of-range membership query, ready for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutOfRangeReport {
    /// Lab test name the filter matched on
    pub test_name: String,
    /// Comparator symbol (">" or "<")
    pub comparator: String,
    /// Threshold the values were compared against
    pub threshold: f64,
    /// Export timestamp (RFC 3339)
    pub generated_at: String,
    /// Qualifying patient ids, sorted for stable output
    pub patient_ids: Vec<String>,
}

impl OutOfRangeReport {
    /// Run the query and capture its result.
    pub fn build(
        test_name: &str,
        comparator: Comparator,
        threshold: f64,
        index: &RecordIndex,
    ) -> QueryResult<Self> {
        let mut patient_ids: Vec<String> =
            query::patients_out_of_range(test_name, comparator, threshold, index)?
                .into_iter()
                .collect();
        patient_ids.sort();

        Ok(Self {
            test_name: test_name.to_string(),
            comparator: comparator.symbol().to_string(),
            threshold,
            generated_at: chrono::Utc::now().to_rfc3339(),
            patient_ids,
        })
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format, one row per qualifying patient.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();
        csv.push_str("test_name,comparator,threshold,patient_id\n");
        for id in &self.patient_ids {
            csv.push_str(&format!(
                "{},{},{},{}\n",
                escape_csv(&self.test_name),
                escape_csv(&self.comparator),
                self.threshold,
                escape_csv(id),
            ));
        }
        csv
    }
}

/// Cohort-level age distribution at a pinned instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortSummary {
    /// Instant the ages were evaluated at (source timestamp format)
    pub evaluated_at: String,
    /// Number of distinct patients in the index
    pub patient_count: usize,
    /// Total number of lab records in the index
    pub lab_count: usize,
    /// One row per requested age threshold
    pub older_than: Vec<OlderThanRow>,
}

/// Count of patients strictly older than one threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OlderThanRow {
    pub threshold_years: f64,
    pub count: usize,
}

impl CohortSummary {
    /// Evaluate the older-than count for each threshold at `now`.
    pub fn build(thresholds: &[f64], index: &RecordIndex, now: NaiveDateTime) -> QueryResult<Self> {
        let mut older_than = Vec::with_capacity(thresholds.len());
        for &threshold_years in thresholds {
            older_than.push(OlderThanRow {
                threshold_years,
                count: query::count_older_than_at(threshold_years, index, now)?,
            });
        }

        Ok(Self {
            evaluated_at: now.format(crate::age::TIMESTAMP_FORMAT).to_string(),
            patient_count: index.patient_count(),
            lab_count: index.lab_count(),
            older_than,
        })
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format, one row per threshold.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();
        csv.push_str("threshold_years,count\n");
        for row in &self.older_than {
            csv.push_str(&format!("{},{}\n", row.threshold_years, row.count));
        }
        csv
    }
}

/// Quote a CSV field if it contains a delimiter, quote, or newline.
fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
