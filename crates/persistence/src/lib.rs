//! # Tellerbank Persistence
//!
//! Persistent store for Tellerbank: SQLite through sqlx.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Store                               │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────────┐ │
//! │  │   SQLite    │    │   Account   │    │     Repos       │ │
//! │  │  (WAL pool) │    │    locks    │    │ (named, guarded)│ │
//! │  └─────────────┘    └─────────────┘    └─────────────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tellerbank_persistence::{AccountRepo, Store, StoreConfig};
//!
//! let store = Store::connect(&StoreConfig::for_path("bank.db")).await?;
//!
//! // Single reads go straight to the pool
//! let balance = AccountRepo::balance(store.pool(), account_id).await?;
//!
//! // Writes that belong together share a unit of work
//! let mut uow = store.with_account_lock(account_id).await?;
//! AccountRepo::debit(uow.conn(), account_id, amount).await?;
//! uow.commit().await?;
//! ```

pub mod config;
pub mod error;
pub mod guard;
pub mod locks;
pub mod sqlite;
pub mod store;

pub use config::{BankConfig, ConfigError, StoreConfig};
pub use error::{PersistenceError, PersistenceResult};
pub use locks::{AccountGuard, AccountLocks};
pub use sqlite::schema::{
    AccountOverviewRow, CredentialRow, EmployeeProfileRow, ProfileRow, ReportRow,
    StatementRow,
};
pub use sqlite::{
    AccountRepo, AddressRepo, CustomerRepo, EmployeeRepo, ExtensionRepo, ReportRepo,
    TransactionRepo, UserRepo,
};
pub use sqlx::SqliteConnection;
pub use store::{Store, UnitOfWork};
