//! # Transaction Module
//!
//! Append-only ledger entries and their read models.

use crate::account::AccountKind;
use crate::error::{CoreError, CoreResult};
use crate::ids::{AccountNumber, TransactionId};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdrawal => "WITHDRAWAL",
        }
    }

    pub fn parse(s: &str) -> CoreResult<Self> {
        match s.to_uppercase().as_str() {
            "DEPOSIT" => Ok(TransactionKind::Deposit),
            "WITHDRAWAL" => Ok(TransactionKind::Withdrawal),
            _ => Err(CoreError::invalid_enum("transaction_type", s)),
        }
    }

    /// Signed amount as recorded: deposits positive, withdrawals negative
    pub fn signed(&self, amount: Money) -> Money {
        match self {
            TransactionKind::Deposit => amount,
            TransactionKind::Withdrawal => amount.negated(),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of an account statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementEntry {
    pub id: TransactionId,
    pub kind: TransactionKind,
    /// Signed amount
    pub amount: Money,
    pub timestamp: DateTime<Utc>,
}

/// One row of the all-transactions report handed to the report writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReport {
    pub transaction_id: TransactionId,
    pub account_number: AccountNumber,
    pub account_kind: AccountKind,
    pub transaction_kind: TransactionKind,
    pub amount: Money,
    pub timestamp: DateTime<Utc>,
    pub customer_name: String,
    pub customer_national_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_amount() {
        let amount = Money::from_cents(2500);
        assert_eq!(TransactionKind::Deposit.signed(amount).cents(), 2500);
        assert_eq!(TransactionKind::Withdrawal.signed(amount).cents(), -2500);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(
            TransactionKind::parse("withdrawal").unwrap(),
            TransactionKind::Withdrawal
        );
        assert!(TransactionKind::parse("TRANSFER").is_err());
        assert_eq!(TransactionKind::Deposit.to_string(), "DEPOSIT");
    }
}
