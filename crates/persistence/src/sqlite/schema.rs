//! Database schema definitions
//!
//! Row types for sqlx mapping from SQLite tables and joins.
//! Schema is defined in migrations/20260101000000_init.sql

use crate::error::{PersistenceError, PersistenceResult};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tellerbank_core::{
    AccountDetails, AccountId, AccountKind, AccountNumber, AccountOverview, Address,
    EmployeeView, Money, ProfileView, StatementEntry, TransactionId, TransactionKind,
    TransactionReport,
};

/// `user` LEFT JOIN `address`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ProfileRow {
    pub name: String,
    pub cpf: String,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub id_address: Option<i64>,
    pub zip_code: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// `employee` joined with its profile
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct EmployeeProfileRow {
    pub employee_code: String,
    pub role: String,
    #[sqlx(flatten)]
    pub profile: ProfileRow,
}

/// Stored credential of the user reached through an account or customer
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CredentialRow {
    pub id_account: i64,
    pub password_hash: String,
}

/// `account` joined with its holder and whichever extension row exists
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AccountOverviewRow {
    pub id_account: i64,
    pub account_number: i64,
    pub branch: String,
    pub account_type: String,
    pub balance: i64,
    pub holder_name: String,
    pub holder_cpf: String,
    pub credit_limit: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub interest_rate: Option<String>,
}

/// Row type for table `"transaction"`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct StatementRow {
    pub id_transaction: i64,
    pub transaction_type: String,
    pub amount: i64, // signed cents
    pub transaction_date: DateTime<Utc>,
}

/// `"transaction"` joined with account and holder
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ReportRow {
    pub id_transaction: i64,
    pub account_number: i64,
    pub account_type: String,
    pub transaction_type: String,
    pub amount: i64,
    pub transaction_date: DateTime<Utc>,
    pub name: String,
    pub cpf: String,
}

// === Conversion implementations ===

pub(crate) fn parse_decimal(field: &str, value: &str) -> PersistenceResult<Decimal> {
    Decimal::from_str(value).map_err(|_| PersistenceError::invalid_value(field, value))
}

impl ProfileRow {
    fn address(&self) -> Option<Address> {
        self.id_address.map(|_| Address {
            zip_code: self.zip_code.clone(),
            street: self.street.clone(),
            house_number: self.house_number.clone(),
            neighborhood: self.neighborhood.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
        })
    }
}

impl From<ProfileRow> for ProfileView {
    fn from(row: ProfileRow) -> Self {
        let address = row
            .address()
            .map(|address| address.formatted())
            .unwrap_or_default();
        ProfileView {
            full_name: row.name,
            national_id: row.cpf,
            birth_date: row.birth_date,
            phone: row.phone,
            address,
        }
    }
}

impl From<EmployeeProfileRow> for EmployeeView {
    fn from(row: EmployeeProfileRow) -> Self {
        EmployeeView {
            employee_code: row.employee_code,
            job_title: row.role,
            profile: row.profile.into(),
        }
    }
}

impl TryFrom<AccountOverviewRow> for AccountOverview {
    type Error = PersistenceError;

    fn try_from(row: AccountOverviewRow) -> Result<Self, Self::Error> {
        let kind = AccountKind::parse(&row.account_type)?;
        let details = match kind {
            AccountKind::Checking => {
                let limit = row
                    .credit_limit
                    .as_deref()
                    .ok_or_else(|| PersistenceError::not_found("CheckingAccount", row.account_number))?;
                AccountDetails::Checking {
                    credit_limit: parse_decimal("credit_limit", limit)?,
                    due_date: row.due_date,
                }
            }
            AccountKind::Savings => {
                let rate = row
                    .interest_rate
                    .as_deref()
                    .ok_or_else(|| PersistenceError::not_found("SavingsAccount", row.account_number))?;
                AccountDetails::Savings {
                    interest_rate: parse_decimal("interest_rate", rate)?,
                }
            }
        };

        Ok(AccountOverview {
            id: AccountId(row.id_account),
            number: AccountNumber(row.account_number),
            kind,
            branch: row.branch,
            holder_name: row.holder_name,
            holder_national_id: row.holder_cpf,
            balance: Money::from_cents(row.balance),
            details,
        })
    }
}

impl TryFrom<StatementRow> for StatementEntry {
    type Error = PersistenceError;

    fn try_from(row: StatementRow) -> Result<Self, Self::Error> {
        Ok(StatementEntry {
            id: TransactionId(row.id_transaction),
            kind: TransactionKind::parse(&row.transaction_type)?,
            amount: Money::from_cents(row.amount),
            timestamp: row.transaction_date,
        })
    }
}

impl TryFrom<ReportRow> for TransactionReport {
    type Error = PersistenceError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        Ok(TransactionReport {
            transaction_id: TransactionId(row.id_transaction),
            account_number: AccountNumber(row.account_number),
            account_kind: AccountKind::parse(&row.account_type)?,
            transaction_kind: TransactionKind::parse(&row.transaction_type)?,
            amount: Money::from_cents(row.amount),
            timestamp: row.transaction_date,
            customer_name: row.name,
            customer_national_id: row.cpf,
        })
    }
}
