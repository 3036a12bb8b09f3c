//! SQLite schema definition.

/// Complete database schema for the record store.
///
/// All columns are TEXT; numeric and timestamp conversion is deferred to
/// query time, matching the in-memory models. The `idx_labs_patient` index is
/// what keeps per-patient lab lookups from degrading to full-table scans.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Patients (one row per id, replaced on re-ingest)
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    patient_id TEXT PRIMARY KEY,
    gender TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,
    race TEXT NOT NULL
);

-- ============================================================================
-- Labs (append-only, many rows per patient)
-- ============================================================================

CREATE TABLE IF NOT EXISTS labs (
    patient_id TEXT NOT NULL,
    test_name TEXT NOT NULL,
    value TEXT NOT NULL,
    admission TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_labs_patient ON labs(patient_id);
CREATE INDEX IF NOT EXISTS idx_labs_test ON labs(test_name);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_patient_primary_key_replaces() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute(
            "INSERT OR REPLACE INTO patients (patient_id, gender, date_of_birth, race) VALUES (?, ?, ?, ?)",
            ["P1", "Male", "1950-01-01 00:00:00.0", "White"],
        )
        .unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO patients (patient_id, gender, date_of_birth, race) VALUES (?, ?, ?, ?)",
            ["P1", "Male", "1950-01-01 00:00:00.0", "Asian"],
        )
        .unwrap();

        let (count, race): (i64, String) = conn
            .query_row("SELECT COUNT(*), MAX(race) FROM patients", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(race, "Asian");
    }
}
