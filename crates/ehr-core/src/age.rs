//! Shared timestamp parsing and age arithmetic.
//!
//! Every elapsed-age computation in the crate goes through [`elapsed_years`]
//! so that `Patient::age_at` and the first-admission query agree on the same
//! fixed-length-year policy.

use chrono::NaiveDateTime;

/// Timestamp format used by both source extracts (fractional seconds optional).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Mean tropical year length, in days. Ages are elapsed time divided by this,
/// floored, not complete calendar years since a birthday.
pub const DAYS_PER_YEAR: f64 = 365.2425;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Parse a source timestamp, tolerating trailing whitespace.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::format::ParseError> {
    NaiveDateTime::parse_from_str(raw.trim_end(), TIMESTAMP_FORMAT)
}

/// Whole years elapsed between two instants: `floor(days / 365.2425)`.
///
/// Negative for `t1 < t0` (floor, not truncation, so -0.3 years is -1).
pub fn elapsed_years(t0: NaiveDateTime, t1: NaiveDateTime) -> i64 {
    let seconds = (t1 - t0).num_seconds() as f64;
    (seconds / (SECONDS_PER_DAY * DAYS_PER_YEAR)).floor() as i64
}
