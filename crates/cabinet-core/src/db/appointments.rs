//! Appointment database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{Appointment, AppointmentStatus};

fn appointment_from_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    let status: String = row.get(5)?;
    Ok(Appointment {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        last_name: row.get(2)?,
        first_name: row.get(3)?,
        time: row.get(4)?,
        status: AppointmentStatus::parse(&status),
        reason: row.get(6)?,
        created_at: row.get(7)?,
    })
}

const APPOINTMENT_COLUMNS: &str =
    "id, patient_id, last_name, first_name, time, status, reason, created_at";

impl Database {
    /// Insert a new appointment.
    pub fn insert_appointment(&self, appointment: &Appointment) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO appointments (
                id, patient_id, last_name, first_name, time, status, reason, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                appointment.id,
                appointment.patient_id,
                appointment.last_name,
                appointment.first_name,
                appointment.time,
                appointment.status.as_str(),
                appointment.reason,
                appointment.created_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing appointment.
    pub fn update_appointment(&self, appointment: &Appointment) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE appointments SET
                patient_id = ?2,
                last_name = ?3,
                first_name = ?4,
                time = ?5,
                status = ?6,
                reason = ?7
            WHERE id = ?1
            "#,
            params![
                appointment.id,
                appointment.patient_id,
                appointment.last_name,
                appointment.first_name,
                appointment.time,
                appointment.status.as_str(),
                appointment.reason,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get an appointment by id.
    pub fn get_appointment(&self, id: &str) -> DbResult<Option<Appointment>> {
        self.conn
            .query_row(
                &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?"),
                [id],
                appointment_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all appointments, ordered by scheduled time.
    pub fn list_appointments(&self) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments ORDER BY time"
        ))?;
        let rows = stmt.query_map([], appointment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete an appointment.
    pub fn delete_appointment(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM appointments WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}
