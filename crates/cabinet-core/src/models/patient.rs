//! Patient records.

use serde::{Deserialize, Serialize};

/// A patient record as managed by the front office.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Record UUID - primary key in the store
    pub id: String,
    /// Human-readable patient number (e.g. "P0042"), unique per person
    pub number: String,
    /// Family name
    pub last_name: String,
    /// Given name
    pub first_name: String,
    /// Date of birth
    pub date_of_birth: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Patient {
    /// Create a new patient with required fields.
    pub fn new(number: String, last_name: String, first_name: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            number,
            last_name,
            first_name,
            date_of_birth: None,
            phone: None,
            notes: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Normalized identity key: two records with the same key describe
    /// the same person, whatever their numbers say.
    pub fn identity_key(&self) -> String {
        identity_key(&self.last_name, &self.first_name)
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

/// Case-insensitive (last name, first name) key shared by deduplication
/// and appointment matching.
pub fn identity_key(last_name: &str, first_name: &str) -> String {
    format!(
        "{} {}",
        last_name.trim().to_lowercase(),
        first_name.trim().to_lowercase()
    )
}
