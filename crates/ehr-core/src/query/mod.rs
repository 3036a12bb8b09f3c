//! Analytic queries over an ingested record index.
//!
//! Three stateless operations: an age-threshold count, a lab-threshold
//! membership set, and age at first admission. None of them mutate the
//! index; each costs a single pass over the relevant record class, with
//! per-patient lookups served in O(1) by the index.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::age::elapsed_years;
use crate::index::RecordIndex;
use crate::models::Lab;

/// Query errors.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("unknown comparator {0:?}, expected \">\" or \"<\"")]
    InvalidComparator(String),

    #[error("lab value {value:?} for patient {patient_id} is not numeric")]
    ValueParse { patient_id: String, value: String },

    #[error("no patient with id {0:?}")]
    UnknownPatient(String),

    #[error("patient {0:?} has no lab records to derive a first admission from")]
    NoAdmissions(String),

    #[error("invalid timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        source: chrono::format::ParseError,
    },

    #[error("database error: {0}")]
    Database(#[from] crate::db::DbError),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Direction of a lab-value threshold filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// Keep values strictly above the threshold (`">"`)
    Above,
    /// Keep values strictly below the threshold (`"<"`)
    Below,
}

impl Comparator {
    /// Apply the comparison to a value/threshold pair.
    pub fn matches(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparator::Above => value > threshold,
            Comparator::Below => value < threshold,
        }
    }

    /// The source symbol for this comparator.
    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Above => ">",
            Comparator::Below => "<",
        }
    }
}

impl FromStr for Comparator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" => Ok(Comparator::Above),
            "<" => Ok(Comparator::Below),
            other => Err(QueryError::InvalidComparator(other.to_string())),
        }
    }
}

/// Count patients whose age at `now` strictly exceeds `threshold_years`.
pub fn count_older_than_at(
    threshold_years: f64,
    index: &RecordIndex,
    now: NaiveDateTime,
) -> QueryResult<usize> {
    let mut older = 0;
    for patient in index.patients() {
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

/// [`count_older_than_at`] against the current UTC wall clock.
pub fn count_older_than(threshold_years: f64, index: &RecordIndex) -> QueryResult<usize> {
    count_older_than_at(threshold_years, index, chrono::Utc::now().naive_utc())
}

/// Ids of patients with at least one `test_name` lab whose value crosses the
/// threshold in the comparator's direction.
///
/// Values are parsed to floating point only here, at filter time; a
/// non-numeric value on a row that matches `test_name` is an error even if
/// other rows would already qualify the patient. Duplicate qualifying labs
/// collapse into the set.
pub fn patients_out_of_range(
    test_name: &str,
    comparator: Comparator,
    threshold: f64,
    index: &RecordIndex,
) -> QueryResult<HashSet<String>> {
    let mut out_of_range = HashSet::new();
    for lab in index.labs().filter(|lab| lab.test_name == test_name) {
        if comparator.matches(numeric_value(lab)?, threshold) {
            out_of_range.insert(lab.patient_id.clone());
        }
    }
    Ok(out_of_range)
}

/// Age of a patient at their earliest lab admission, in whole years.
///
/// The earliest lab timestamp stands in for the first admission event; the
/// extracts carry no dedicated admission record. Unknown ids and patients
/// with no labs are distinct, checked errors.
pub fn age_at_first_admission(patient_id: &str, index: &RecordIndex) -> QueryResult<i64> {
    let patient = index
        .patient(patient_id)
        .ok_or_else(|| QueryError::UnknownPatient(patient_id.to_string()))?;

    let labs = index.labs_for(patient_id);
    if labs.is_empty() {
        return Err(QueryError::NoAdmissions(patient_id.to_string()));
    }

    let mut earliest: Option<NaiveDateTime> = None;
    for lab in labs {
        let admission = admission_time(lab)?;
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
    // labs is non-empty, so earliest is set
    Ok(elapsed_years(dob, earliest.unwrap_or(dob)))
}

pub(crate) fn numeric_value(lab: &Lab) -> QueryResult<f64> {
    lab.numeric_value().map_err(|_| QueryError::ValueParse {
        patient_id: lab.patient_id.clone(),
        value: lab.value.clone(),
    })
}

pub(crate) fn admission_time(lab: &Lab) -> QueryResult<NaiveDateTime> {
    lab.admission_time().map_err(|source| QueryError::Timestamp {
        value: lab.admission.clone(),
        source,
    })
}
