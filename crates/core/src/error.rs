//! # Error Module
//!
//! Domain validation errors for Tellerbank, built with thiserror.

use thiserror::Error;

/// Core domain errors.
///
/// Pure validation failures, independent of any storage concern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // === Money errors ===
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    // === Account errors ===
    #[error("Invalid account details: {0}")]
    InvalidAccountDetails(String),

    // === Person errors ===
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Invalid {field} value: {value}")]
    InvalidEnumValue { field: &'static str, value: String },

    // === Credential errors ===
    #[error("Malformed credential hash")]
    MalformedCredentialHash,
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create an invalid enum value error
    pub fn invalid_enum(field: &'static str, value: &str) -> Self {
        Self::InvalidEnumValue {
            field,
            value: value.to_string(),
        }
    }

    /// Whether this error came from amount validation
    pub fn is_invalid_amount(&self) -> bool {
        matches!(self, CoreError::InvalidAmount(_))
    }
}
