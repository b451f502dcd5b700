//! Patient database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::Patient;

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        number: row.get(1)?,
        last_name: row.get(2)?,
        first_name: row.get(3)?,
        date_of_birth: row.get(4)?,
        phone: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

const PATIENT_COLUMNS: &str =
    "id, number, last_name, first_name, date_of_birth, phone, notes, created_at, updated_at";

impl Database {
    /// Insert a new patient.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO patients (
                id, number, last_name, first_name, date_of_birth,
                phone, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                patient.id,
                patient.number,
                patient.last_name,
                patient.first_name,
                patient.date_of_birth,
                patient.phone,
                patient.notes,
                patient.created_at,
                patient.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing patient.
    pub fn update_patient(&self, patient: &Patient) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                number = ?2,
                last_name = ?3,
                first_name = ?4,
                date_of_birth = ?5,
                phone = ?6,
                notes = ?7,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                patient.id,
                patient.number,
                patient.last_name,
                patient.first_name,
                patient.date_of_birth,
                patient.phone,
                patient.notes,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Rewrite only a patient's number (renumbering path).
    pub fn update_patient_number(&self, id: &str, number: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE patients SET number = ?2, updated_at = datetime('now') WHERE id = ?1",
            params![id, number],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by record id.
    pub fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?"),
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a patient by patient number.
    pub fn get_patient_by_number(&self, number: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE number = ?"),
                [number],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all patients, ordered by number.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {PATIENT_COLUMNS} FROM patients ORDER BY number"))?;
        let rows = stmt.query_map([], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a patient.
    pub fn delete_patient(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patients WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}
