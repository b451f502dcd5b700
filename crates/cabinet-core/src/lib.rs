//! Cabinet Core Library
//!
//! Front-office core for a small clinic practice: allocation of
//! human-readable patient numbers over a bounded namespace, collapsing
//! of duplicate patient records, and per-patient consultation facts
//! derived from the appointment book.
//!
//! # Architecture
//!
//! ```text
//!                    ┌──────────────────────────┐
//!                    │         Registry         │  one mutex serializes
//!                    │  (owning application)    │  pool read-modify-write
//!                    └──────┬────────────┬──────┘
//!                           │            │
//!              ┌────────────▼──┐     ┌───▼────────────────┐
//!              │   numbering   │     │       roster       │
//!              │ allocate /    │     │ consolidate (pure) │
//!              │ reserve /     │     │ enrich      (pure) │
//!              │ release /     │     └───┬────────────────┘
//!              │ compact       │         │ reads only
//!              └────────┬──────┘         │
//!                       │ pool blob      │ patients + appointments
//!                    ┌──▼────────────────▼──┐
//!                    │      db (SQLite)     │
//!                    └──────────────────────┘
//! ```
//!
//! # Core Principle
//!
//! **A number is never silently reused.** Allocation fails loudly on an
//! exhausted namespace, and release is refused while any record still
//! holds the number.
//!
//! # Modules
//!
//! - [`db`]: SQLite record store and the persisted reservation pool
//! - [`models`]: domain types (Patient, Appointment)
//! - [`numbering`]: patient-number format and allocator
//! - [`roster`]: duplicate collapsing and appointment-derived facts
//! - [`registry`]: owning-application facade
//! - [`timeutil`]: calendar-day truncation and timestamp parsing

pub mod db;
pub mod models;
pub mod numbering;
pub mod registry;
pub mod roster;
pub mod timeutil;

// Re-export commonly used types
pub use db::Database;
pub use models::{Appointment, AppointmentStatus, Patient};
pub use numbering::{NumberAllocator, NumberError, NumberFormat};
pub use registry::{NewPatient, Registry, RegistryError};
pub use roster::{consolidate, enrich, EnrichedPatient};
