//! # Identifiers
//!
//! Typed row identifiers and the customer-facing account number.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

row_id!(
    /// Primary key of a `user` row
    UserId
);
row_id!(
    /// Primary key of a `customer` row
    CustomerId
);
row_id!(
    /// Primary key of an `employee` row
    EmployeeId
);
row_id!(
    /// Primary key of an `account` row
    AccountId
);
row_id!(
    /// Primary key of a `transaction` row
    TransactionId
);

/// Customer-facing account number.
///
/// Numbers are allocated as `max(existing) + 1`, starting at
/// [`AccountNumber::FIRST`] on an empty store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNumber(pub i64);

impl AccountNumber {
    /// First number handed out on an empty store
    pub const FIRST: AccountNumber = AccountNumber(10000);

    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for AccountNumber {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
