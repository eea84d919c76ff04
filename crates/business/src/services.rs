//! Service context and shared result types
//!
//! Every service borrows one [`ServiceContext`], which carries the store
//! handle. Nothing here is global: callers build a context and hand it down.

use crate::error::{BankError, BankResult};
use serde::Serialize;
use sqlx::SqlitePool;
use std::future::Future;
use tellerbank_core::{
    AccountNumber, Credential, CredentialHash, CustomerId, OpenedAccount, UserId,
};
use tellerbank_persistence::{Store, StoreConfig};

/// Context for business operations - contains store access
#[derive(Debug, Clone)]
pub struct ServiceContext {
    store: Store,
}

impl ServiceContext {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Open the store described by `config` and wrap it
    pub async fn connect(config: &StoreConfig) -> BankResult<Self> {
        let store = Store::connect(config).await?;
        Ok(Self::new(store))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Get database pool
    pub fn pool(&self) -> &SqlitePool {
        self.store.pool()
    }

    /// Run one business operation under the configured store timeout
    pub async fn bounded<T, F>(&self, fut: F) -> BankResult<T>
    where
        F: Future<Output = BankResult<T>>,
    {
        self.store.bounded(fut).await
    }
}

/// Check a supplied credential against its stored encoding
pub(crate) fn credential_matches(stored: &str, candidate: &Credential) -> BankResult<bool> {
    let hash = CredentialHash::parse(stored).map_err(BankError::from)?;
    Ok(hash.verify(candidate))
}

/// Result of the onboarding flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Onboarding {
    pub user_id: UserId,
    pub customer_id: CustomerId,
    pub account: OpenedAccount,
}

/// Identities an account closure resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosureTarget {
    pub national_id: String,
    pub user_id: UserId,
    pub customer_id: CustomerId,
    pub account_number: AccountNumber,
}
