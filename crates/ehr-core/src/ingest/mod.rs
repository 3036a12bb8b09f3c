//! Tab-separated ingest of the patient and lab extracts.
//!
//! Both extracts share the same shape: a header row naming the columns, then
//! one record per row, fields located by header name rather than position.
//! Parsing is a single linear pass; the header is resolved once up front.
//! The first structural failure aborts the whole parse; partial ingest of a
//! source is not supported.

mod header;

pub use header::*;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::models::{Lab, Patient};

/// Patient extract column names.
pub const COL_PATIENT_ID: &str = "PatientID";
pub const COL_PATIENT_GENDER: &str = "PatientGender";
pub const COL_PATIENT_DOB: &str = "PatientDateOfBirth";
pub const COL_PATIENT_RACE: &str = "PatientRace";

/// Lab extract column names (`PatientID` is shared).
pub const COL_LAB_NAME: &str = "LabName";
pub const COL_LAB_VALUE: &str = "LabValue";
pub const COL_LAB_DATETIME: &str = "LabDateTime";

/// Ingest errors.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("I/O error reading source: {0}")]
    Io(#[from] std::io::Error),

    #[error("source has no header row")]
    EmptySource,

    #[error("required column {name:?} missing from header row")]
    MissingHeader { name: String },

    #[error("row {line} has {found} fields, expected at least {required}")]
    MalformedRow {
        line: usize,
        found: usize,
        required: usize,
    },
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parse the patient demographics extract into one record per data row.
pub fn parse_patients<R: BufRead>(source: R) -> ParseResult<Vec<Patient>> {
    let mut lines = source.lines();
    let header = HeaderIndex::parse(&next_header(&mut lines)?);

    let id_col = header.require(COL_PATIENT_ID)?;
    let gender_col = header.require(COL_PATIENT_GENDER)?;
    let dob_col = header.require(COL_PATIENT_DOB)?;
    let race_col = header.require(COL_PATIENT_RACE)?;
    let required = 1 + id_col.max(gender_col).max(dob_col).max(race_col);

    let mut patients = Vec::new();
    for (line_no, line) in lines.enumerate() {
        let line = line?;
        let fields = split_row(&line, line_no + 2, required)?;
        patients.push(Patient::new(
            fields[id_col].to_string(),
            fields[gender_col].to_string(),
            fields[dob_col].to_string(),
            fields[race_col].to_string(),
        ));
    }
    Ok(patients)
}

/// Parse the lab results extract into one record per data row.
///
/// Rows are never deduplicated; a patient with many labs yields many records.
pub fn parse_labs<R: BufRead>(source: R) -> ParseResult<Vec<Lab>> {
    let mut lines = source.lines();
    let header = HeaderIndex::parse(&next_header(&mut lines)?);

    let id_col = header.require(COL_PATIENT_ID)?;
    let name_col = header.require(COL_LAB_NAME)?;
    let value_col = header.require(COL_LAB_VALUE)?;
    let datetime_col = header.require(COL_LAB_DATETIME)?;
    let required = 1 + id_col.max(name_col).max(value_col).max(datetime_col);

    let mut labs = Vec::new();
    for (line_no, line) in lines.enumerate() {
        let line = line?;
        let fields = split_row(&line, line_no + 2, required)?;
        labs.push(Lab::new(
            fields[id_col].to_string(),
            fields[name_col].to_string(),
            fields[value_col].to_string(),
            fields[datetime_col].to_string(),
        ));
    }
    Ok(labs)
}

/// Parse a patient extract from a file path.
pub fn parse_patients_file<P: AsRef<Path>>(path: P) -> ParseResult<Vec<Patient>> {
    parse_patients(BufReader::new(File::open(path)?))
}

/// Parse a lab extract from a file path.
pub fn parse_labs_file<P: AsRef<Path>>(path: P) -> ParseResult<Vec<Lab>> {
    parse_labs(BufReader::new(File::open(path)?))
}

fn next_header(lines: &mut impl Iterator<Item = std::io::Result<String>>) -> ParseResult<String> {
    match lines.next() {
        Some(line) => Ok(line?),
        None => Err(ParseError::EmptySource),
    }
}

/// Split a data row, enforcing the minimum field count for the 1-based
/// source line number `line_no`.
fn split_row(line: &str, line_no: usize, required: usize) -> ParseResult<Vec<&str>> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < required {
        return Err(ParseError::MalformedRow {
            line: line_no,
            found: fields.len(),
            required,
        });
    }
    Ok(fields)
}
