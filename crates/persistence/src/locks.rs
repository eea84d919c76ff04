//! Per-account lock registry
//!
//! Hands out one async mutex per account id so that every balance mutation on
//! an account runs alone inside this process. Entries are dropped once no
//! task holds or waits on them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tellerbank_core::AccountId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Default, Clone)]
pub struct AccountLocks {
    inner: Arc<Mutex<HashMap<AccountId, Arc<AsyncMutex<()>>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use of the account
    pub async fn acquire(&self, account_id: AccountId) -> AccountGuard {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            map.entry(account_id)
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        AccountGuard {
            guard: Some(lock.lock_owned().await),
            account_id,
            registry: self.clone(),
        }
    }

    /// Number of accounts with a live lock entry
    pub fn tracked(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn release(&self, account_id: AccountId) {
        let mut map = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // Only the map itself still references the mutex: nobody waits on it.
        if map
            .get(&account_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            map.remove(&account_id);
        }
    }
}

/// Held for the duration of one unit of work on an account
pub struct AccountGuard {
    guard: Option<OwnedMutexGuard<()>>,
    account_id: AccountId,
    registry: AccountLocks,
}

impl Drop for AccountGuard {
    fn drop(&mut self) {
        // Release the mutex before deciding whether the entry can go.
        drop(self.guard.take());
        self.registry.release(self.account_id);
    }
}
