//! EHR Analytics Core Library
//!
//! Ingest of tab-separated clinical extracts into a patient-keyed record
//! index, with a small set of cohort queries on top.
//!
//! # Architecture
//!
//! ```text
//! patients.txt ──┐
//!                ├─► ingest (header-name lookup, one linear pass)
//! labs.txt ──────┘                    │
//!                                     ▼
//!                    RecordIndex (id → Patient, id → Vec<Lab>)
//!                      or Database (SQLite, indexed lab table)
//!                                     │
//!              ┌──────────────────────┼──────────────────────┐
//!              ▼                      ▼                      ▼
//!      count_older_than    patients_out_of_range    age_at_first_admission
//! ```
//!
//! Grouping labs by patient id at ingest is the point of the design: build
//! cost is one pass per extract, and every per-patient lookup afterwards is
//! O(1), instead of rescanning the full lab list per patient per query.
//!
//! # Modules
//!
//! - [`models`]: `Patient` and `Lab` value types
//! - [`ingest`]: tab-separated parsing with name-based column lookup
//! - [`index`]: the in-memory patient-keyed index
//! - [`query`]: the three analytic operations
//! - [`age`]: shared timestamp parsing and elapsed-years policy
//! - [`db`]: SQLite backing store with the same contract as the index
//! - [`report`]: JSON/CSV export of query results

pub mod age;
pub mod db;
pub mod index;
pub mod ingest;
pub mod models;
pub mod query;
pub mod report;

// Re-export commonly used types
pub use db::Database;
pub use index::RecordIndex;
pub use ingest::{parse_labs, parse_labs_file, parse_patients, parse_patients_file, ParseError};
pub use models::{Lab, Patient};
pub use query::{
    age_at_first_admission, count_older_than, count_older_than_at, patients_out_of_range,
    Comparator, QueryError,
};
pub use report::{CohortSummary, OutOfRangeReport};
