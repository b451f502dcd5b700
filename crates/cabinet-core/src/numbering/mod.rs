//! Patient number allocation over a persisted reservation pool.
//!
//! Numbers form a bounded, human-readable namespace (`P0001`..`P9999`
//! by default). The pool of reserved numbers is persisted as a named
//! blob so reservations survive restarts; every record in the store is
//! expected to hold a pooled number, while the pool may temporarily
//! hold extras awaiting release.

mod format;

pub use format::NumberFormat;

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::{debug, warn};

use crate::db::{Database, DbError};
use crate::models::{identity_key, Patient};

/// Allocation errors.
#[derive(Error, Debug)]
pub enum NumberError {
    #[error("no free patient number in 1..={max}")]
    Exhausted { max: u32 },

    #[error("invalid patient number {number:?}, expected {expected}")]
    InvalidFormat { number: String, expected: String },

    #[error(transparent)]
    Db(#[from] DbError),
}

pub type NumberResult<T> = Result<T, NumberError>;

/// Allocates, reserves, releases and compacts patient numbers.
///
/// Every pool operation is a read-modify-write of the persisted blob;
/// callers must serialize access to the underlying [`Database`] (the
/// [`Registry`](crate::registry::Registry) holds one mutex for this).
pub struct NumberAllocator<'a> {
    format: NumberFormat,
    db: &'a Database,
}

impl<'a> NumberAllocator<'a> {
    /// Allocator with the default `P` + 4-digit format.
    pub fn new(db: &'a Database) -> Self {
        Self::with_format(db, NumberFormat::default())
    }

    pub fn with_format(db: &'a Database, format: NumberFormat) -> Self {
        Self { format, db }
    }

    pub fn format(&self) -> &NumberFormat {
        &self.format
    }

    /// Lowest formatted number absent from the reservation pool.
    ///
    /// Does not reserve: the caller must follow up with [`reserve`]
    /// before the next allocation, otherwise back-to-back calls return
    /// the same number.
    ///
    /// [`reserve`]: NumberAllocator::reserve
    pub fn allocate(&self) -> NumberResult<String> {
        let pool = self.db.load_number_pool()?;
        for value in 1..=self.format.max() {
            let candidate = self.format.format(value);
            if !pool.contains(&candidate) {
                debug!(number = %candidate, "allocated patient number");
                return Ok(candidate);
            }
        }
        warn!(max = self.format.max(), "patient number namespace exhausted");
        Err(NumberError::Exhausted {
            max: self.format.max(),
        })
    }

    /// Add a number to the reservation pool. Reserving an
    /// already-reserved number is a no-op.
    pub fn reserve(&self, number: &str) -> NumberResult<()> {
        if !self.format.is_valid(number) {
            return Err(NumberError::InvalidFormat {
                number: number.to_string(),
                expected: self.format.pattern(),
            });
        }
        let mut pool = self.db.load_number_pool()?;
        if pool.insert(number.to_string()) {
            self.db.save_number_pool(&pool)?;
        }
        Ok(())
    }

    /// Drop a number from the pool unless some record in `active` still
    /// holds it. Returns whether the release happened; a
    /// still-referenced number (e.g. an unconsolidated duplicate) is an
    /// expected outcome, not an error.
    pub fn release(&self, number: &str, active: &[Patient]) -> NumberResult<bool> {
        if active.iter().any(|p| p.number == number) {
            debug!(number, "release skipped, number still referenced");
            return Ok(false);
        }
        let mut pool = self.db.load_number_pool()?;
        if pool.remove(number) {
            self.db.save_number_pool(&pool)?;
        }
        Ok(true)
    }

    /// A number is available when no record in `active` holds it and it
    /// is not in the reservation pool.
    pub fn is_available(&self, number: &str, active: &[Patient]) -> NumberResult<bool> {
        if active.iter().any(|p| p.number == number) {
            return Ok(false);
        }
        let pool = self.db.load_number_pool()?;
        Ok(!pool.contains(number))
    }

    /// Pure format check, no pool access.
    pub fn validate(&self, number: &str) -> bool {
        self.format.is_valid(number)
    }

    /// Identity-preserving lookup for externally supplied datasets: a
    /// record in `existing` with the same normalized name keeps its
    /// number (the same person never gets two numbers); otherwise the
    /// lowest value unused among `existing` is assigned. The reservation
    /// pool is deliberately not consulted on this path.
    pub fn find_or_assign(&self, last_name: &str, first_name: &str, existing: &[Patient]) -> String {
        let key = identity_key(last_name, first_name);
        if let Some(patient) = existing.iter().find(|p| p.identity_key() == key) {
            return patient.number.clone();
        }

        let used: BTreeSet<&str> = existing.iter().map(|p| p.number.as_str()).collect();
        let mut value = 1;
        loop {
            let candidate = self.format.format(value);
            if !used.contains(candidate.as_str()) {
                return candidate;
            }
            value += 1;
        }
    }

    /// Renumber `patients` sequentially from 1 in ascending
    /// current-number order and rewrite the pool to exactly the new set,
    /// discarding stale reservations.
    ///
    /// Rewrites every record's number and the whole pool; the caller
    /// must hold exclusive access for the duration and persist the
    /// mutated records afterwards (see
    /// [`Registry::renumber`](crate::registry::Registry::renumber)).
    pub fn compact(&self, patients: &mut [Patient]) -> NumberResult<()> {
        // Unparseable numbers sort last and get renumbered like the rest.
        patients.sort_by_key(|p| self.format.parse(&p.number).unwrap_or(u32::MAX));

        let mut pool = BTreeSet::new();
        for (index, patient) in patients.iter_mut().enumerate() {
            let number = self.format.format(index as u32 + 1);
            patient.number = number.clone();
            pool.insert(number);
        }
        self.db.save_number_pool(&pool)?;
        debug!(count = patients.len(), "compacted patient numbers");
        Ok(())
    }
}
