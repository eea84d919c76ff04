//! Business layer errors
//!
//! One typed failure per public operation. Store faults are logged here with
//! full detail and surface as [`BankError::StoreUnavailable`] without their
//! cause.

use rust_decimal::Decimal;
use tellerbank_core::CoreError;
use tellerbank_persistence::PersistenceError;
use thiserror::Error;

/// Business operation errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BankError {
    // === Identity errors ===
    #[error("Identity already registered: {0}")]
    DuplicateIdentity(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Authentication failed")]
    AuthenticationFailed,

    // === Account and ledger errors ===
    #[error("Invalid account details: {0}")]
    InvalidAccountDetails(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Not applicable: {0}")]
    NotApplicable(String),

    // === Store errors ===
    #[error("Store unavailable")]
    StoreUnavailable,
}

/// Result type alias for business operations
pub type BankResult<T> = Result<T, BankError>;

impl BankError {
    /// Create insufficient funds error
    pub fn insufficient_funds(requested: Decimal, available: Decimal) -> Self {
        Self::InsufficientFunds {
            requested,
            available,
        }
    }
}

impl From<PersistenceError> for BankError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound { entity, key } => {
                Self::NotFound(format!("{entity} with {key}"))
            }
            ref unique if unique.violates("user.cpf") => {
                Self::DuplicateIdentity("national id already registered".to_string())
            }
            ref unique if unique.violates("employee.employee_code") => {
                Self::DuplicateIdentity("employee code already registered".to_string())
            }
            other => {
                tracing::error!(error = %other, "store fault");
                Self::StoreUnavailable
            }
        }
    }
}

impl From<CoreError> for BankError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidAmount(msg) => Self::InvalidAmount(msg),
            CoreError::InvalidAccountDetails(msg) => Self::InvalidAccountDetails(msg),
            CoreError::InvalidProfile(msg) => Self::InvalidProfile(msg),
            // Only reachable through corrupt stored data.
            other => {
                tracing::error!(error = %other, "stored value rejected");
                Self::StoreUnavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insufficient_funds_error() {
        let err = BankError::insufficient_funds(dec!(150.00), dec!(100.00));
        assert!(err.to_string().contains("requested 150.00"));
        assert!(err.to_string().contains("available 100.00"));
    }

    #[test]
    fn test_persistence_mapping() {
        let missing: BankError = PersistenceError::not_found("Account", "number 10000").into();
        assert_eq!(missing, BankError::NotFound("Account with number 10000".to_string()));

        let duplicate: BankError =
            PersistenceError::UniqueViolation("UNIQUE constraint failed: user.cpf".to_string())
                .into();
        assert!(matches!(duplicate, BankError::DuplicateIdentity(_)));

        let timeout: BankError = PersistenceError::Timeout(10_000).into();
        assert_eq!(timeout, BankError::StoreUnavailable);
        assert_eq!(timeout.to_string(), "Store unavailable");
    }

    #[test]
    fn test_core_mapping() {
        let err: BankError = CoreError::InvalidAmount("must be positive".to_string()).into();
        assert!(matches!(err, BankError::InvalidAmount(_)));

        let corrupt: BankError = CoreError::MalformedCredentialHash.into();
        assert_eq!(corrupt, BankError::StoreUnavailable);
    }
}
