//! Store facade
//!
//! Owns the SQLite pool, the per-account lock registry and the configured
//! timeouts. Business code reaches the database only through the named
//! repository operations, run either directly on [`Store::pool`] or inside a
//! unit of work opened here.

use crate::config::StoreConfig;
use crate::error::{PersistenceError, PersistenceResult};
use crate::locks::{AccountGuard, AccountLocks};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::future::Future;
use std::str::FromStr;
use tellerbank_core::AccountId;

/// Handle to the persistent store. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
    config: StoreConfig,
    locks: AccountLocks,
}

impl Store {
    /// Open (creating if missing) the database and apply migrations
    pub async fn connect(config: &StoreConfig) -> PersistenceResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout());

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        sqlx::migrate!("../../migrations").run(&pool).await?;

        tracing::info!(url = %config.database_url, "store ready");

        Ok(Self {
            pool,
            config: config.clone(),
            locks: AccountLocks::new(),
        })
    }

    /// Get SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Bound a store call by the configured statement timeout
    pub async fn bounded<T, E, F>(&self, fut: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<PersistenceError>,
    {
        let limit = self.config.statement_timeout();
        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout_ms = self.config.statement_timeout_ms, "store call timed out");
                Err(PersistenceError::Timeout(self.config.statement_timeout_ms).into())
            }
        }
    }

    /// Open a unit of work: one database transaction, committed by
    /// [`UnitOfWork::commit`] and rolled back when dropped uncommitted.
    pub async fn transaction(&self) -> PersistenceResult<UnitOfWork> {
        let tx = self.pool.begin().await?;
        Ok(UnitOfWork { tx, _guard: None })
    }

    /// Open a unit of work that is the only one touching `account_id` in
    /// this process until it is committed or dropped.
    pub async fn with_account_lock(&self, account_id: AccountId) -> PersistenceResult<UnitOfWork> {
        let guard = self.locks.acquire(account_id).await;
        let tx = self.pool.begin().await?;
        Ok(UnitOfWork {
            tx,
            _guard: Some(guard),
        })
    }

    /// Close the pool, waiting for connections to be returned
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// An open database transaction, optionally holding an account lock.
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
    _guard: Option<AccountGuard>,
}

impl UnitOfWork {
    /// Connection to run repository operations on
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.tx
    }

    pub async fn commit(self) -> PersistenceResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> PersistenceResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
