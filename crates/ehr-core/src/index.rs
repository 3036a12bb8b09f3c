//! Patient-id-keyed record index.
//!
//! Grouping labs by patient id at build time is the load-bearing decision:
//! building costs one pass over each extract (O(N) patients + O(M) labs) and
//! every later per-patient lookup is O(1), where rescanning flat record lists
//! per patient per query would cost O(N×M).

use std::collections::HashMap;

use crate::models::{Lab, Patient};

/// In-memory index over parsed records.
///
/// Patients map one-to-one by id with insert-or-replace semantics; labs map
/// one-to-many, appended in source order and never deduplicated. Orphan labs
/// (ids with no matching patient) are tolerated here; queries that need the
/// patient record fail explicitly instead.
#[derive(Debug, Default)]
pub struct RecordIndex {
    patients: HashMap<String, Patient>,
    labs: HashMap<String, Vec<Lab>>,
    lab_count: usize,
}

impl RecordIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from parsed extracts.
    pub fn from_records(patients: Vec<Patient>, labs: Vec<Lab>) -> Self {
        let mut index = Self::new();
        for patient in patients {
            index.upsert_patient(patient);
        }
        for lab in labs {
            index.add_lab(lab);
        }
        index
    }

    /// Insert or replace a patient by id, returning the replaced record.
    pub fn upsert_patient(&mut self, patient: Patient) -> Option<Patient> {
        self.patients.insert(patient.id.clone(), patient)
    }

    /// Append a lab to its patient's sequence, creating the sequence on
    /// first sight of the id.
    pub fn add_lab(&mut self, lab: Lab) {
        self.lab_count += 1;
        self.labs.entry(lab.patient_id.clone()).or_default().push(lab);
    }

    /// Look up a patient by id.
    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.get(id)
    }

    /// All labs for a patient, in source order; empty for an unknown id.
    pub fn labs_for(&self, id: &str) -> &[Lab] {
        self.labs.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate all patients (arbitrary order).
    pub fn patients(&self) -> impl Iterator<Item = &Patient> {
        self.patients.values()
    }

    /// Iterate all labs (grouped by patient, source order within a group).
    pub fn labs(&self) -> impl Iterator<Item = &Lab> {
        self.labs.values().flatten()
    }

    /// Number of distinct patients.
    pub fn patient_count(&self) -> usize {
        self.patients.len()
    }

    /// Total number of lab records.
    pub fn lab_count(&self) -> usize {
        self.lab_count
    }
}
