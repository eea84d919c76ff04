//! # Persistence Errors
//!
//! Error types for the persistence layer, wrapping sqlx errors.

use thiserror::Error;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    // === Database errors ===
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Record not found: {entity} with {key}")]
    NotFound { entity: String, key: String },

    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    // === Statement errors ===
    #[error("Statement rejected by safety filter (pattern {pattern:?})")]
    UnsafeStatement { pattern: &'static str },

    #[error("Store call timed out after {0} ms")]
    Timeout(u64),

    // === Conversion errors ===
    #[error("Invalid stored value: {field} = {value}")]
    InvalidStoredValue { field: String, value: String },
}

/// Result type alias for PersistenceError
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl From<sqlx::Error> for PersistenceError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::UniqueViolation(db_err.message().to_string())
            }
            _ => Self::Database(err),
        }
    }
}

impl PersistenceError {
    /// Create NotFound error
    pub fn not_found(entity: &str, key: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            key: key.to_string(),
        }
    }

    /// Create InvalidStoredValue error
    pub fn invalid_value(field: &str, value: impl std::fmt::Display) -> Self {
        Self::InvalidStoredValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Whether the record was missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether a UNIQUE constraint rejected the write
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Whether the message names the given column (sqlite reports
    /// `UNIQUE constraint failed: table.column`)
    pub fn violates(&self, column: &str) -> bool {
        match self {
            Self::UniqueViolation(message) => message.contains(column),
            _ => false,
        }
    }
}

impl From<tellerbank_core::CoreError> for PersistenceError {
    fn from(err: tellerbank_core::CoreError) -> Self {
        Self::InvalidStoredValue {
            field: "domain".to_string(),
            value: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found() {
        let err = PersistenceError::not_found("Account", "number 10000");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Record not found: Account with number 10000");
    }

    #[test]
    fn test_unique_violation_column() {
        let err = PersistenceError::UniqueViolation("UNIQUE constraint failed: user.cpf".to_string());
        assert!(err.is_unique_violation());
        assert!(err.violates("user.cpf"));
        assert!(!err.violates("employee.employee_code"));
    }
}
