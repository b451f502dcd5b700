//! Owning-application facade over the record store and the allocator.
//!
//! A single mutex serializes every read-modify-write of the reservation
//! pool, so allocation, reservation, release and renumbering never
//! interleave. The roster derivations are pure and only need a read of
//! the two collections.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::db::{Database, DbError};
use crate::models::{Appointment, Patient};
use crate::numbering::{NumberAllocator, NumberError, NumberFormat};
use crate::roster::{self, EnrichedPatient};

/// Registry errors.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    Number(#[from] NumberError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("unknown patient: {0}")]
    UnknownPatient(String),

    #[error("store lock poisoned")]
    Poisoned,
}

impl<T> From<PoisonError<T>> for RegistryError {
    fn from(_: PoisonError<T>) -> Self {
        RegistryError::Poisoned
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Details captured by the new-patient form.
#[derive(Debug, Clone, Default)]
pub struct NewPatient {
    pub last_name: String,
    pub first_name: String,
    pub date_of_birth: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// Thread-safe front-office facade.
pub struct Registry {
    db: Arc<Mutex<Database>>,
    format: NumberFormat,
}

impl Registry {
    /// Open or create the store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> RegistryResult<Self> {
        Ok(Self::with_format(Database::open(path)?, NumberFormat::default()))
    }

    /// In-memory store (for testing).
    pub fn open_in_memory() -> RegistryResult<Self> {
        Ok(Self::with_format(
            Database::open_in_memory()?,
            NumberFormat::default(),
        ))
    }

    pub fn with_format(db: Database, format: NumberFormat) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            format,
        }
    }

    /// Create a patient record with a freshly allocated number. On an
    /// exhausted namespace nothing is persisted and the error surfaces
    /// to the caller - a number is never silently reused.
    pub fn create_patient(&self, details: NewPatient) -> RegistryResult<Patient> {
        let db = self.db.lock()?;
        let allocator = NumberAllocator::with_format(&db, self.format.clone());

        let number = allocator.allocate()?;
        let mut patient = Patient::new(number.clone(), details.last_name, details.first_name);
        patient.date_of_birth = details.date_of_birth;
        patient.phone = details.phone;
        patient.notes = details.notes;

        db.insert_patient(&patient)?;
        allocator.reserve(&number)?;
        debug!(number = %number, "created patient");
        Ok(patient)
    }

    /// Delete a patient, releasing their number unless another record
    /// (an unconsolidated duplicate) still holds it. Returns whether the
    /// number was released.
    pub fn delete_patient(&self, id: &str) -> RegistryResult<bool> {
        let db = self.db.lock()?;
        let patient = db
            .get_patient(id)?
            .ok_or_else(|| RegistryError::UnknownPatient(id.to_string()))?;

        let survivors: Vec<Patient> = db
            .list_patients()?
            .into_iter()
            .filter(|p| p.id != id)
            .collect();

        let allocator = NumberAllocator::with_format(&db, self.format.clone());
        let released = allocator.release(&patient.number, &survivors)?;
        db.delete_patient(id)?;
        debug!(number = %patient.number, released, "deleted patient");
        Ok(released)
    }

    /// Renumber every record sequentially from 1 and rewrite the pool,
    /// in one transaction. Record numbers and pool change together or
    /// not at all.
    pub fn renumber(&self) -> RegistryResult<Vec<Patient>> {
        let db = self.db.lock()?;
        let mut patients = db.list_patients()?;
        let allocator = NumberAllocator::with_format(&db, self.format.clone());

        let tx = db.conn().unchecked_transaction().map_err(DbError::from)?;
        allocator.compact(&mut patients)?;
        for patient in &patients {
            db.update_patient_number(&patient.id, &patient.number)?;
        }
        tx.commit().map_err(DbError::from)?;
        Ok(patients)
    }

    /// Deduplicated, enriched roster for display, relative to `today`.
    pub fn roster(&self, today: DateTime<Utc>) -> RegistryResult<Vec<EnrichedPatient>> {
        let db = self.db.lock()?;
        let patients = db.list_patients()?;
        let appointments = db.list_appointments()?;

        let canonical = roster::consolidate(&patients, &self.format);
        Ok(canonical
            .iter()
            .map(|patient| roster::enrich(patient, &appointments, today))
            .collect())
    }

    /// Whether a number is free: unheld by any record and unreserved.
    pub fn number_available(&self, number: &str) -> RegistryResult<bool> {
        let db = self.db.lock()?;
        let patients = db.list_patients()?;
        let allocator = NumberAllocator::with_format(&db, self.format.clone());
        Ok(allocator.is_available(number, &patients)?)
    }

    /// All patients, as stored (duplicates included).
    pub fn list_patients(&self) -> RegistryResult<Vec<Patient>> {
        Ok(self.db.lock()?.list_patients()?)
    }

    pub fn get_patient(&self, id: &str) -> RegistryResult<Option<Patient>> {
        Ok(self.db.lock()?.get_patient(id)?)
    }

    /// Edit a stored patient record. Returns whether a record matched.
    /// The number field is owned by the allocator; use [`renumber`] to
    /// change numbers, not this.
    ///
    /// [`renumber`]: Registry::renumber
    pub fn update_patient(&self, patient: &Patient) -> RegistryResult<bool> {
        Ok(self.db.lock()?.update_patient(patient)?)
    }

    /// Book an appointment.
    pub fn add_appointment(&self, appointment: &Appointment) -> RegistryResult<()> {
        Ok(self.db.lock()?.insert_appointment(appointment)?)
    }

    /// Edit a stored appointment, e.g. marking an outcome validated
    /// after the consultation. Returns whether a record matched.
    pub fn update_appointment(&self, appointment: &Appointment) -> RegistryResult<bool> {
        Ok(self.db.lock()?.update_appointment(appointment)?)
    }

    pub fn list_appointments(&self) -> RegistryResult<Vec<Appointment>> {
        Ok(self.db.lock()?.list_appointments()?)
    }

    pub fn delete_appointment(&self, id: &str) -> RegistryResult<bool> {
        Ok(self.db.lock()?.delete_appointment(id)?)
    }
}
