//! Account closure
//!
//! Resolves a national id down to an account number, then deletes the
//! account together with its extension row and its ledger entries.

use crate::error::BankResult;
use crate::services::{ClosureTarget, ServiceContext};
use tellerbank_core::AccountNumber;
use tellerbank_persistence::{AccountRepo, CustomerRepo, ExtensionRepo, TransactionRepo, UserRepo};
use tracing::{debug, info};

/// Account Closure Service
pub struct AccountClosure<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountClosure<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// User, customer and lowest-numbered account behind a national id.
    /// Fails with `NotFound` naming the first stage without a match.
    #[tracing::instrument(skip(self))]
    pub async fn resolve_closure_target(&self, national_id: &str) -> BankResult<ClosureTarget> {
        self.ctx
            .bounded(async {
                let pool = self.ctx.pool();
                let user_id = UserRepo::id_by_national_id(pool, national_id).await?;
                let customer_id = CustomerRepo::id_by_user(pool, user_id).await?;
                let account_number =
                    AccountRepo::lowest_number_for_customer(pool, customer_id).await?;

                debug!(%user_id, %customer_id, %account_number, "closure target resolved");
                Ok(ClosureTarget {
                    national_id: national_id.to_string(),
                    user_id,
                    customer_id,
                    account_number,
                })
            })
            .await
    }

    /// Delete the account, its extension row and its transactions. Returns
    /// whether exactly one account row was removed.
    #[tracing::instrument(skip(self))]
    pub async fn close_account(&self, number: AccountNumber) -> BankResult<bool> {
        self.ctx
            .bounded(async {
                let account_id = match AccountRepo::id_by_number(self.ctx.pool(), number).await {
                    Ok(id) => id,
                    Err(err) if err.is_not_found() => {
                        debug!(%number, "nothing to close");
                        return Ok(false);
                    }
                    Err(err) => return Err(err.into()),
                };

                let mut uow = self.ctx.store().with_account_lock(account_id).await?;
                let entries = TransactionRepo::delete_by_account_number(uow.conn(), number).await?;
                let checking = ExtensionRepo::delete_checking_by_number(uow.conn(), number).await?;
                let savings = ExtensionRepo::delete_savings_by_number(uow.conn(), number).await?;
                let removed = AccountRepo::delete_by_number(uow.conn(), number).await?;
                uow.commit().await?;

                info!(
                    %number,
                    entries,
                    extensions = checking + savings,
                    removed,
                    "account closed"
                );
                Ok(removed == 1)
            })
            .await
    }
}
