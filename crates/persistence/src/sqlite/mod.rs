//! SQLite persistence module
//!
//! Repository pattern for SQLite database access.

pub mod repos;
pub mod schema;

pub use repos::{
    AccountRepo, AddressRepo, CustomerRepo, EmployeeRepo, ExtensionRepo, ReportRepo,
    TransactionRepo, UserRepo,
};
pub use schema::{
    AccountOverviewRow, CredentialRow, EmployeeProfileRow, ProfileRow, ReportRow,
    StatementRow,
};
