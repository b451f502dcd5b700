//! Appointment records from the scheduling book.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::patient::{identity_key, Patient};
use crate::timeutil;

/// Outcome status of a scheduled appointment.
///
/// `Unknown` absorbs statuses introduced by newer versions of the book
/// so that reading old data never fails.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    /// The consultation actually took place
    Validated,
    /// Scheduled, not yet seen
    Pending,
    /// Canceled by either side
    Canceled,
    /// Anything this version does not recognize
    Unknown,
}

impl From<String> for AppointmentStatus {
    fn from(s: String) -> Self {
        AppointmentStatus::parse(&s)
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Validated => "validated",
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Canceled => "canceled",
            AppointmentStatus::Unknown => "unknown",
        }
    }

    /// Parse a stored status string, degrading to `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s {
            "validated" => AppointmentStatus::Validated,
            "pending" => AppointmentStatus::Pending,
            "canceled" => AppointmentStatus::Canceled,
            _ => AppointmentStatus::Unknown,
        }
    }
}

/// An appointment. References its patient by record id when booked from
/// the patient file; walk-in bookings may only carry a name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    /// Record UUID
    pub id: String,
    /// Foreign key to [`Patient::id`], when known
    pub patient_id: Option<String>,
    /// Family name as typed at booking time
    pub last_name: Option<String>,
    /// Given name as typed at booking time
    pub first_name: Option<String>,
    /// Scheduled instant, RFC 3339
    pub time: String,
    /// Outcome status
    pub status: AppointmentStatus,
    /// Reason for the visit
    pub reason: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl Appointment {
    /// Create a new appointment at the given instant.
    pub fn new(time: String, status: AppointmentStatus) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id: None,
            last_name: None,
            first_name: None,
            time,
            status,
            reason: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Whether this appointment is for the given patient: foreign-key
    /// match first, normalized-name match as the fallback.
    pub fn belongs_to(&self, patient: &Patient) -> bool {
        if self.patient_id.as_deref() == Some(patient.id.as_str()) {
            return true;
        }
        match (&self.last_name, &self.first_name) {
            (Some(last), Some(first)) => identity_key(last, first) == patient.identity_key(),
            _ => false,
        }
    }

    /// Scheduled instant as a parsed timestamp. None for malformed data;
    /// read paths skip such appointments rather than failing.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        timeutil::parse_instant(&self.time)
    }
}
