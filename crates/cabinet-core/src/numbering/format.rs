//! Patient number format: a fixed prefix followed by a fixed-width,
//! zero-padded decimal value.

use serde::{Deserialize, Serialize};

/// Numbering configuration. The namespace covers `1..=max()`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NumberFormat {
    /// Leading prefix, e.g. "P"
    pub prefix: String,
    /// Digit count after the prefix
    pub width: usize,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::new("P", 4)
    }
}

impl NumberFormat {
    pub fn new(prefix: impl Into<String>, width: usize) -> Self {
        Self {
            prefix: prefix.into(),
            width,
        }
    }

    /// Highest representable value: 10^width - 1, saturating at
    /// `u32::MAX` for widths beyond what u32 holds.
    pub fn max(&self) -> u32 {
        match 10u32.checked_pow(self.width as u32) {
            Some(bound) => bound - 1,
            None => u32::MAX,
        }
    }

    /// Format a numeric value as a patient number.
    pub fn format(&self, value: u32) -> String {
        format!("{}{:0w$}", self.prefix, value, w = self.width)
    }

    /// Human-readable shape of a valid number, e.g. "PXXXX".
    pub fn pattern(&self) -> String {
        format!("{}{}", self.prefix, "X".repeat(self.width))
    }

    /// Parse a patient number back to its numeric value. None when the
    /// string does not match the format or the value falls outside
    /// `1..=max()`.
    pub fn parse(&self, number: &str) -> Option<u32> {
        let digits = number.strip_prefix(self.prefix.as_str())?;
        if digits.len() != self.width || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value: u32 = digits.parse().ok()?;
        (value >= 1).then_some(value)
    }

    /// Pure format check.
    pub fn is_valid(&self, number: &str) -> bool {
        self.parse(number).is_some()
    }
}
