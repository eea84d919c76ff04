//! # Account Module
//!
//! Account kinds and the type-specific extension attached to every account.
//! A checking account carries a credit limit and a due date, a savings
//! account carries an interest rate.

use crate::error::{CoreError, CoreResult};
use crate::ids::{AccountId, AccountNumber};
use crate::money::Money;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountKind {
    Checking,
    Savings,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Checking => "CHECKING",
            AccountKind::Savings => "SAVINGS",
        }
    }

    pub fn parse(s: &str) -> CoreResult<Self> {
        match s.to_uppercase().as_str() {
            "CHECKING" => Ok(AccountKind::Checking),
            "SAVINGS" => Ok(AccountKind::Savings),
            _ => Err(CoreError::invalid_enum("account_type", s)),
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Type-specific attributes supplied when opening an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountDetails {
    Checking {
        credit_limit: Decimal,
        due_date: Option<NaiveDate>,
    },
    Savings {
        interest_rate: Decimal,
    },
}

impl AccountDetails {
    pub fn checking(credit_limit: Decimal, due_date: NaiveDate) -> Self {
        AccountDetails::Checking {
            credit_limit,
            due_date: Some(due_date),
        }
    }

    pub fn savings(interest_rate: Decimal) -> Self {
        AccountDetails::Savings { interest_rate }
    }

    pub fn kind(&self) -> AccountKind {
        match self {
            AccountDetails::Checking { .. } => AccountKind::Checking,
            AccountDetails::Savings { .. } => AccountKind::Savings,
        }
    }

    /// Checking needs a positive credit limit and a due date; savings needs a
    /// positive interest rate.
    pub fn validate(&self) -> CoreResult<()> {
        match self {
            AccountDetails::Checking {
                credit_limit,
                due_date,
            } => {
                if *credit_limit <= Decimal::ZERO {
                    return Err(CoreError::InvalidAccountDetails(format!(
                        "credit limit must be positive: {}",
                        credit_limit
                    )));
                }
                if due_date.is_none() {
                    return Err(CoreError::InvalidAccountDetails(
                        "checking account requires a due date".to_string(),
                    ));
                }
            }
            AccountDetails::Savings { interest_rate } => {
                if *interest_rate <= Decimal::ZERO {
                    return Err(CoreError::InvalidAccountDetails(format!(
                        "interest rate must be positive: {}",
                        interest_rate
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Identity of a freshly opened account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenedAccount {
    pub id: AccountId,
    pub number: AccountNumber,
}

/// Read model joining an account with its holder and extension row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountOverview {
    pub id: AccountId,
    pub number: AccountNumber,
    pub kind: AccountKind,
    pub branch: String,
    pub holder_name: String,
    pub holder_national_id: String,
    pub balance: Money,
    pub details: AccountDetails,
}
