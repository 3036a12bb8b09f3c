//! Lab table operations.

use rusqlite::{params, Row};

use super::{Database, DbResult};
use crate::models::Lab;

fn lab_from_row(row: &Row<'_>) -> rusqlite::Result<Lab> {
    Ok(Lab {
        patient_id: row.get(0)?,
        test_name: row.get(1)?,
        value: row.get(2)?,
        admission: row.get(3)?,
    })
}

impl Database {
    /// Append one lab record. Labs are never deduplicated or replaced.
    pub fn insert_lab(&self, lab: &Lab) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO labs (patient_id, test_name, value, admission)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![lab.patient_id, lab.test_name, lab.value, lab.admission],
        )?;
        Ok(())
    }

    /// Append a whole extract inside one transaction.
    pub fn ingest_labs(&mut self, labs: &[Lab]) -> DbResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO labs (patient_id, test_name, value, admission)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )?;
            for lab in labs {
                stmt.execute(params![lab.patient_id, lab.test_name, lab.value, lab.admission])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// All labs for one patient, in insertion order (served by the
    /// `idx_labs_patient` index, not a table scan).
    pub fn labs_for_patient(&self, patient_id: &str) -> DbResult<Vec<Lab>> {
        let mut stmt = self.conn.prepare(
            "SELECT patient_id, test_name, value, admission FROM labs
             WHERE patient_id = ? ORDER BY rowid",
        )?;
        let rows = stmt.query_map([patient_id], lab_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// All labs for one test name, in insertion order.
    pub fn labs_for_test(&self, test_name: &str) -> DbResult<Vec<Lab>> {
        let mut stmt = self.conn.prepare(
            "SELECT patient_id, test_name, value, admission FROM labs
             WHERE test_name = ? ORDER BY rowid",
        )?;
        let rows = stmt.query_map([test_name], lab_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Total number of lab records.
    pub fn lab_count(&self) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM labs", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
