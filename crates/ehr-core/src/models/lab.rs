//! Lab result record.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::age::parse_timestamp;

/// Significant prefix of an admission timestamp. The source format is
/// fixed-width; anything past this is ignored.
const ADMISSION_TS_LEN: usize = 23;

/// One row of the lab results extract.
///
/// `value` stays a string until a query actually compares it numerically;
/// conversion failure is surfaced at that point, not at parse time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lab {
    /// Foreign key into the patient extract; not unique
    pub patient_id: String,
    /// Categorical test name, e.g. "CBC: MONOCYTES"
    pub test_name: String,
    /// Numeric test result in its raw string form
    pub value: String,
    /// Admission timestamp string; first 23 characters are significant
    pub admission: String,
}

impl Lab {
    /// Create a lab record from raw field values.
    pub fn new(patient_id: String, test_name: String, value: String, admission: String) -> Self {
        Self {
            patient_id,
            test_name,
            value,
            admission,
        }
    }

    /// The raw value converted to floating point.
    pub fn numeric_value(&self) -> Result<f64, std::num::ParseFloatError> {
        self.value.trim().parse()
    }

    /// Parsed admission timestamp (significant prefix only).
    pub fn admission_time(&self) -> Result<NaiveDateTime, chrono::format::ParseError> {
        let raw = self.admission.get(..ADMISSION_TS_LEN).unwrap_or(&self.admission);
        parse_timestamp(raw)
    }
}
