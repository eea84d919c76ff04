//! # Tellerbank Business
//!
//! Business logic layer - identity registry, account factory, ledger,
//! account closure and the reporting projection.
//!
//! ```rust,ignore
//! use tellerbank_business::{AccountFactory, Ledger, ServiceContext};
//!
//! let ctx = ServiceContext::connect(&config.store).await?;
//! let onboarding = AccountFactory::new(&ctx).onboard(&profile, "0001", &details).await?;
//! Ledger::new(&ctx).deposit(onboarding.account.id, dec!(100.00)).await?;
//! ```

pub mod closure;
pub mod error;
pub mod factory;
pub mod identity;
pub mod ledger;
pub mod reporting;
pub mod services;

pub use closure::AccountClosure;
pub use error::{BankError, BankResult};
pub use factory::AccountFactory;
pub use identity::IdentityRegistry;
pub use ledger::Ledger;
pub use reporting::Reporting;
pub use services::{ClosureTarget, Onboarding, ServiceContext};
