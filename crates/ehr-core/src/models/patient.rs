//! Patient demographics record.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::age::{elapsed_years, parse_timestamp};

/// One row of the patient demographics extract.
///
/// Constructed once at parse time and never mutated; the derived age is
/// recomputed against a supplied instant on every call rather than cached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    /// Opaque unique identifier (primary key)
    pub id: String,
    /// Categorical gender string, unvalidated
    pub gender: String,
    /// Date of birth as a source-format timestamp string; parsed on demand
    pub date_of_birth: String,
    /// Categorical race string, unvalidated
    pub race: String,
}

impl Patient {
    /// Create a patient record from raw field values.
    pub fn new(id: String, gender: String, date_of_birth: String, race: String) -> Self {
        Self {
            id,
            gender,
            date_of_birth,
            race,
        }
    }

    /// Parsed date of birth.
    pub fn birth_time(&self) -> Result<NaiveDateTime, chrono::format::ParseError> {
        parse_timestamp(&self.date_of_birth)
    }

    /// Age in whole fixed-length years at the given instant.
    ///
    /// `now` is explicit so callers (and tests) pin the clock; see
    /// [`Patient::age`] for the wall-clock convenience.
    pub fn age_at(&self, now: NaiveDateTime) -> Result<i64, chrono::format::ParseError> {
        Ok(elapsed_years(self.birth_time()?, now))
    }

    /// Age in whole fixed-length years as of the current UTC wall clock.
    pub fn age(&self) -> Result<i64, chrono::format::ParseError> {
        self.age_at(chrono::Utc::now().naive_utc())
    }
}
