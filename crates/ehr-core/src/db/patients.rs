//! Patient table operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::Patient;

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        gender: row.get(1)?,
        date_of_birth: row.get(2)?,
        race: row.get(3)?,
    })
}

impl Database {
    /// Insert or replace a patient by id (last write wins).
    pub fn upsert_patient(&self, patient: &Patient) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO patients (patient_id, gender, date_of_birth, race)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                patient.id,
                patient.gender,
                patient.date_of_birth,
                patient.race,
            ],
        )?;
        Ok(())
    }

    /// Upsert a whole extract inside one transaction.
    pub fn ingest_patients(&mut self, patients: &[Patient]) -> DbResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT OR REPLACE INTO patients (patient_id, gender, date_of_birth, race)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )?;
            for patient in patients {
                stmt.execute(params![
                    patient.id,
                    patient.gender,
                    patient.date_of_birth,
                    patient.race,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Point lookup by patient id.
    pub fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                "SELECT patient_id, gender, date_of_birth, race FROM patients WHERE patient_id = ?",
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// All patients.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self
            .conn
            .prepare("SELECT patient_id, gender, date_of_birth, race FROM patients")?;
        let rows = stmt.query_map([], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Number of distinct patients.
    pub fn patient_count(&self) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
