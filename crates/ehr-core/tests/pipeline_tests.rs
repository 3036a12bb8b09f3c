//! End-to-end tests: raw extracts → index → queries.
//!
//! All age-sensitive cases pin the evaluation instant so expectations do not
//! drift with the wall clock.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::NaiveDateTime;
use ehr_core::age::parse_timestamp;
use ehr_core::ingest::{parse_labs, parse_patients};
use ehr_core::query::{
    age_at_first_admission, count_older_than_at, patients_out_of_range, Comparator, QueryError,
};
use ehr_core::RecordIndex;

const P_ELDER: &str = "DB92CDC6-FA9B-4492-BC2C-0C588AD78956";
const P_MIDDLE: &str = "79A7BA2A-D35A-4CB8-A835-6BAA13B0058C";
const P_SENIOR: &str = "56A35E74-90BE-44A0-B7BA-7743BB152133";
const P_NO_LABS: &str = "FB909154-6171-4A68-972C-1D5A023F969D";

const PATIENTS: &str = "\u{feff}PatientID\tPatientGender\tPatientDateOfBirth\tPatientRace\n\
    DB92CDC6-FA9B-4492-BC2C-0C588AD78956\tMale\t1947-12-28 02:45:40.547\tUnknown\n\
    79A7BA2A-D35A-4CB8-A835-6BAA13B0058C\tFemale\t1970-07-25 13:04:20.717\tWhite\n\
    56A35E74-90BE-44A0-B7BA-7743BB152133\tFemale\t1964-03-01 21:02:40.560\tAfrican American\n\
    FB909154-6171-4A68-972C-1D5A023F969D\tMale\t2005-06-01 00:00:00.000\tAsian\n";

const LABS: &str = "PatientID\tAdmissionID\tLabName\tLabValue\tLabUnits\tLabDateTime\n\
    DB92CDC6-FA9B-4492-BC2C-0C588AD78956\t1\tURINALYSIS: RED BLOOD CELLS\t1.8\trbc/hpf\t1992-07-01 01:36:17.910\n\
    DB92CDC6-FA9B-4492-BC2C-0C588AD78956\t1\tCBC: MONOCYTES\t0.2\tk/cumm\t1992-07-01 03:45:00.000\n\
    79A7BA2A-D35A-4CB8-A835-6BAA13B0058C\t1\tCBC: HEMOGLOBIN\t19.0\tgm/dl\t1997-06-30 08:00:00.000\n\
    79A7BA2A-D35A-4CB8-A835-6BAA13B0058C\t2\tCBC: MONOCYTES\t0.3\tk/cumm\t1998-03-12 10:00:00.000\n\
    56A35E74-90BE-44A0-B7BA-7743BB152133\t1\tCBC: HEMOGLOBIN\t12.9\tgm/dl\t1985-01-02 06:30:00.000\n\
    56A35E74-90BE-44A0-B7BA-7743BB152133\t2\tCBC: MONOCYTES\t0.1\tk/cumm\t1992-02-20 12:00:00.000\n";

fn now() -> NaiveDateTime {
    parse_timestamp("2022-01-01 00:00:00.0").unwrap()
}

fn build_index() -> RecordIndex {
    let patients = parse_patients(PATIENTS.as_bytes()).unwrap();
    let labs = parse_labs(LABS.as_bytes()).unwrap();
    RecordIndex::from_records(patients, labs)
}

#[test]
fn test_parse_counts_match_rows() {
    let patients = parse_patients(PATIENTS.as_bytes()).unwrap();
    let labs = parse_labs(LABS.as_bytes()).unwrap();
    assert_eq!(patients.len(), 4);
    assert_eq!(labs.len(), 6);

    let source_ids: HashSet<&str> = [P_ELDER, P_MIDDLE, P_SENIOR, P_NO_LABS].into();
    assert!(patients.iter().all(|p| source_ids.contains(p.id.as_str())));
}

#[test]
fn test_count_older_than_cases() {
    struct Case {
        threshold: f64,
        expected: usize,
    }
    // Pinned ages: elder 74, middle 51, senior 57, no-labs 16.
    let cases = [
        Case { threshold: 0.0, expected: 4 },
        Case { threshold: 16.0, expected: 3 },
        Case { threshold: 52.0, expected: 2 },
        Case { threshold: 60.0, expected: 1 },
        Case { threshold: 150.0, expected: 0 },
    ];

    let index = build_index();
    for case in cases {
        assert_eq!(
            count_older_than_at(case.threshold, &index, now()).unwrap(),
            case.expected,
            "threshold {}",
            case.threshold
        );
    }
}

#[test]
fn test_out_of_range_cases() {
    struct Case {
        test_name: &'static str,
        comparator: &'static str,
        threshold: f64,
        expected: &'static [&'static str],
    }
    let cases = [
        Case {
            test_name: "CBC: MONOCYTES",
            comparator: ">",
            threshold: 0.2,
            expected: &[P_MIDDLE],
        },
        Case {
            test_name: "CBC: MONOCYTES",
            comparator: "<",
            threshold: 0.25,
            expected: &[P_ELDER, P_SENIOR],
        },
        Case {
            test_name: "CBC: HEMOGLOBIN",
            comparator: "<",
            threshold: 13.0,
            expected: &[P_SENIOR],
        },
        Case {
            test_name: "CBC: PLATELETS",
            comparator: ">",
            threshold: 0.0,
            expected: &[],
        },
    ];

    let index = build_index();
    for case in cases {
        let comparator = Comparator::from_str(case.comparator).unwrap();
        let got =
            patients_out_of_range(case.test_name, comparator, case.threshold, &index).unwrap();
        let expected: HashSet<String> = case.expected.iter().map(|s| s.to_string()).collect();
        assert_eq!(got, expected, "{} {} {}", case.test_name, case.comparator, case.threshold);
    }
}

#[test]
fn test_invalid_comparator_symbol() {
    assert!(matches!(
        Comparator::from_str(">="),
        Err(QueryError::InvalidComparator(_))
    ));
}

#[test]
fn test_age_at_first_admission_cases() {
    let index = build_index();
    // Earliest lab stands in for the first admission event.
    assert_eq!(age_at_first_admission(P_ELDER, &index).unwrap(), 44);
    assert_eq!(age_at_first_admission(P_MIDDLE, &index).unwrap(), 26);
    assert_eq!(age_at_first_admission(P_SENIOR, &index).unwrap(), 20);
}

#[test]
fn test_age_at_first_admission_errors() {
    let index = build_index();
    assert!(matches!(
        age_at_first_admission("no-such-id", &index),
        Err(QueryError::UnknownPatient(_))
    ));
    assert!(matches!(
        age_at_first_admission(P_NO_LABS, &index),
        Err(QueryError::NoAdmissions(_))
    ));
}

#[test]
fn test_reingest_idempotent_for_patients_only() {
    let patients = parse_patients(PATIENTS.as_bytes()).unwrap();
    let labs = parse_labs(LABS.as_bytes()).unwrap();

    let mut index = RecordIndex::from_records(patients.clone(), labs.clone());
    for patient in patients {
        index.upsert_patient(patient);
    }
    for lab in labs {
        index.add_lab(lab);
    }

    assert_eq!(index.patient_count(), 4);
    assert_eq!(index.lab_count(), 12);
    // Query answers are unchanged by duplicate labs (set semantics).
    let got = patients_out_of_range(
        "CBC: MONOCYTES",
        Comparator::Above,
        0.2,
        &index,
    )
    .unwrap();
    assert_eq!(got, HashSet::from([P_MIDDLE.to_string()]));
}
