//! # Tellerbank Core
//!
//! Domain types shared by the persistence and business layers: identifiers,
//! money, people, accounts, ledger entries and credentials. No I/O lives here.

pub mod account;
pub mod credential;
pub mod error;
pub mod ids;
pub mod money;
pub mod person;
pub mod transaction;

pub use account::{AccountDetails, AccountKind, AccountOverview, OpenedAccount};
pub use credential::{Credential, CredentialHash};
pub use error::{CoreError, CoreResult};
pub use ids::{AccountId, AccountNumber, CustomerId, EmployeeId, TransactionId, UserId};
pub use money::Money;
pub use person::{Address, EmployeeView, NewEmployee, ProfileView, Role, UserProfile};
pub use transaction::{StatementEntry, TransactionKind, TransactionReport};
