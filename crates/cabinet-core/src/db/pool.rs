//! Reservation-pool persistence.
//!
//! The pool lives under one named key in the kv_store table, serialized
//! as a sorted JSON array of patient-number strings.

use std::collections::BTreeSet;

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};

/// kv_store key holding the patient-number reservation pool.
pub const NUMBER_POOL_KEY: &str = "patient_numbers";

impl Database {
    /// Read a named blob from the key-value store.
    pub fn get_blob(&self, key: &str) -> DbResult<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv_store WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Into::into)
    }

    /// Write a named blob, replacing any previous value.
    pub fn put_blob(&self, key: &str, value: &str) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO kv_store (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// Load the reservation pool. A missing entry is an empty pool.
    pub fn load_number_pool(&self) -> DbResult<BTreeSet<String>> {
        match self.get_blob(NUMBER_POOL_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(BTreeSet::new()),
        }
    }

    /// Persist the reservation pool. BTreeSet keeps the serialized array
    /// sorted, so the stored blob is canonical.
    pub fn save_number_pool(&self, pool: &BTreeSet<String>) -> DbResult<()> {
        self.put_blob(NUMBER_POOL_KEY, &serde_json::to_string(pool)?)
    }
}
