//! Analytic queries served directly from the backing store.
//!
//! Same semantics as the in-memory operations in [`crate::query`]; the store
//! supplies the rows (point lookups via the lab indexes) and the shared
//! comparator/age policy does the rest, so both paths return identical
//! results for the same ingested data.

use chrono::NaiveDateTime;

use super::{Database, DbError};
use crate::age::elapsed_years;
use crate::index::RecordIndex;
use crate::models::Lab;
use crate::query::{self, Comparator, QueryError, QueryResult};

impl Database {
    /// Count patients whose age at `now` strictly exceeds `threshold_years`.
    pub fn count_older_than_at(
        &self,
        threshold_years: f64,
        now: NaiveDateTime,
    ) -> QueryResult<usize> {
        let mut older = 0;
        for patient in self.list_patients()? {
            let age = patient.age_at(now).map_err(|source| QueryError::Timestamp {
                value: patient.date_of_birth.clone(),
                source,
            })?;
            if age as f64 > threshold_years {
                older += 1;
            }
        }
        Ok(older)
    }

    /// [`Database::count_older_than_at`] against the current UTC wall clock.
    pub fn count_older_than(&self, threshold_years: f64) -> QueryResult<usize> {
        self.count_older_than_at(threshold_years, chrono::Utc::now().naive_utc())
    }

    /// Ids of patients with a `test_name` lab crossing the threshold.
    ///
    /// Row selection by test name is served by `idx_labs_test`; value
    /// conversion happens here, at filter time.
    pub fn patients_out_of_range(
        &self,
        test_name: &str,
        comparator: Comparator,
        threshold: f64,
    ) -> QueryResult<std::collections::HashSet<String>> {
        let mut out_of_range = std::collections::HashSet::new();
        for lab in self.labs_for_test(test_name)? {
            if comparator.matches(query::numeric_value(&lab)?, threshold) {
                out_of_range.insert(lab.patient_id);
            }
        }
        Ok(out_of_range)
    }

    /// Age of a patient at their earliest lab admission, in whole years.
    pub fn age_at_first_admission(&self, patient_id: &str) -> QueryResult<i64> {
        let patient = self
            .get_patient(patient_id)?
            .ok_or_else(|| QueryError::UnknownPatient(patient_id.to_string()))?;

        let labs = self.labs_for_patient(patient_id)?;
        if labs.is_empty() {
            return Err(QueryError::NoAdmissions(patient_id.to_string()));
        }

        let mut earliest: Option<NaiveDateTime> = None;
        for lab in &labs {
            let admission = query::admission_time(lab)?;
            if earliest.map_or(true, |t| admission < t) {
                earliest = Some(admission);
            }
        }

        let dob = patient
            .birth_time()
            .map_err(|source| QueryError::Timestamp {
                value: patient.date_of_birth.clone(),
                source,
            })?;
        Ok(elapsed_years(dob, earliest.unwrap_or(dob)))
    }

    /// Materialize the whole store as an in-memory [`RecordIndex`].
    pub fn load_index(&self) -> QueryResult<RecordIndex> {
        let mut index = RecordIndex::new();
        for patient in self.list_patients()? {
            index.upsert_patient(patient);
        }
        let mut stmt = self
            .conn
            .prepare("SELECT patient_id, test_name, value, admission FROM labs ORDER BY rowid")
            .map_err(DbError::from)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Lab {
                    patient_id: row.get(0)?,
                    test_name: row.get(1)?,
                    value: row.get(2)?,
                    admission: row.get(3)?,
                })
            })
            .map_err(DbError::from)?;
        for lab in rows {
            index.add_lab(lab.map_err(DbError::from)?);
        }
        Ok(index)
    }
}
