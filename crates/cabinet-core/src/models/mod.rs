//! Domain types shared across the library.

mod appointment;
mod patient;

pub use appointment::{Appointment, AppointmentStatus};
pub use patient::{identity_key, Patient};
