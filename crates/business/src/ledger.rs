//! Ledger - balances, deposits, withdrawals, statements
//!
//! Every balance mutation holds the account lock and runs as one unit of
//! work whose first statement is the guarded balance update, followed by the
//! ledger entry. Reads that expose account data require the holder's
//! credential; `deposit` and `get_account_type` do not.

use crate::error::{BankError, BankResult};
use crate::services::{credential_matches, ServiceContext};
use chrono::Utc;
use rust_decimal::Decimal;
use tellerbank_core::{AccountId, AccountKind, Credential, Money, StatementEntry, TransactionKind};
use tellerbank_persistence::{AccountRepo, ExtensionRepo, TransactionRepo};
use tracing::{info, warn};

/// Ledger Service - authenticated money movement
pub struct Ledger<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> Ledger<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Whether `credential` belongs to the holder of the account. Unknown
    /// accounts never authenticate.
    #[tracing::instrument(skip(self, credential))]
    pub async fn authenticate(
        &self,
        account_id: AccountId,
        credential: &Credential,
    ) -> BankResult<bool> {
        self.ctx.bounded(self.check_credential(account_id, credential)).await
    }

    async fn check_credential(
        &self,
        account_id: AccountId,
        credential: &Credential,
    ) -> BankResult<bool> {
        match AccountRepo::holder_credential(self.ctx.pool(), account_id).await? {
            Some(stored) => credential_matches(&stored, credential),
            None => Ok(false),
        }
    }

    async fn require_holder(&self, account_id: AccountId, credential: &Credential) -> BankResult<()> {
        if self.check_credential(account_id, credential).await? {
            Ok(())
        } else {
            warn!(%account_id, "authentication failed");
            Err(BankError::AuthenticationFailed)
        }
    }

    #[tracing::instrument(skip(self, credential))]
    pub async fn get_balance(
        &self,
        account_id: AccountId,
        credential: &Credential,
    ) -> BankResult<Decimal> {
        self.ctx
            .bounded(async {
                self.require_holder(account_id, credential).await?;
                let balance = AccountRepo::balance(self.ctx.pool(), account_id).await?;
                Ok(balance.to_decimal())
            })
            .await
    }

    /// Credit the account and record a DEPOSIT entry; returns the new balance.
    /// Deposits are accepted without a credential.
    #[tracing::instrument(skip(self))]
    pub async fn deposit(&self, account_id: AccountId, amount: Decimal) -> BankResult<Decimal> {
        let amount = Money::positive(amount)?;

        self.ctx
            .bounded(async {
                let mut uow = self.ctx.store().with_account_lock(account_id).await?;
                let credited = AccountRepo::credit(uow.conn(), account_id, amount).await?;
                let Some(balance) = credited else {
                    drop(uow);
                    // Missing account surfaces as NotFound here.
                    AccountRepo::balance(self.ctx.pool(), account_id).await?;
                    return Err(BankError::InvalidAmount(format!(
                        "deposit of {amount} would overflow the balance"
                    )));
                };
                let entry = TransactionRepo::insert(
                    uow.conn(),
                    account_id,
                    TransactionKind::Deposit,
                    amount,
                    Utc::now(),
                )
                .await?;
                uow.commit().await?;

                info!(%account_id, transaction_id = %entry, %amount, %balance, "deposit recorded");
                Ok(balance.to_decimal())
            })
            .await
    }

    /// Debit the account if it holds at least `amount` and record a
    /// WITHDRAWAL entry; returns the new balance. Credit limits are not
    /// drawn on.
    #[tracing::instrument(skip(self, credential))]
    pub async fn withdraw(
        &self,
        account_id: AccountId,
        amount: Decimal,
        credential: &Credential,
    ) -> BankResult<Decimal> {
        let amount = Money::positive(amount)?;

        self.ctx
            .bounded(async {
                self.require_holder(account_id, credential).await?;

                let mut uow = self.ctx.store().with_account_lock(account_id).await?;
                let debited = AccountRepo::debit(uow.conn(), account_id, amount).await?;
                let Some(balance) = debited else {
                    let available = AccountRepo::balance(uow.conn(), account_id).await?;
                    warn!(%account_id, %amount, %available, "insufficient funds");
                    return Err(BankError::insufficient_funds(
                        amount.to_decimal(),
                        available.to_decimal(),
                    ));
                };
                let entry = TransactionRepo::insert(
                    uow.conn(),
                    account_id,
                    TransactionKind::Withdrawal,
                    amount,
                    Utc::now(),
                )
                .await?;
                uow.commit().await?;

                info!(%account_id, transaction_id = %entry, %amount, %balance, "withdrawal recorded");
                Ok(balance.to_decimal())
            })
            .await
    }

    #[tracing::instrument(skip(self, credential))]
    pub async fn get_credit_limit(
        &self,
        account_id: AccountId,
        credential: &Credential,
    ) -> BankResult<Decimal> {
        self.ctx
            .bounded(async {
                self.require_holder(account_id, credential).await?;
                ExtensionRepo::credit_limit(self.ctx.pool(), account_id)
                    .await?
                    .ok_or_else(|| {
                        BankError::NotApplicable(format!(
                            "account {account_id} is not a checking account"
                        ))
                    })
            })
            .await
    }

    /// Ledger entries of the account, oldest first
    #[tracing::instrument(skip(self, credential))]
    pub async fn get_statement(
        &self,
        account_id: AccountId,
        credential: &Credential,
    ) -> BankResult<Vec<StatementEntry>> {
        self.ctx
            .bounded(async {
                self.require_holder(account_id, credential).await?;
                let rows = TransactionRepo::by_account(self.ctx.pool(), account_id).await?;
                rows.into_iter()
                    .map(|row| StatementEntry::try_from(row).map_err(BankError::from))
                    .collect()
            })
            .await
    }

    pub async fn get_account_type(&self, account_id: AccountId) -> BankResult<AccountKind> {
        self.ctx
            .bounded(async { Ok(AccountRepo::kind(self.ctx.pool(), account_id).await?) })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::AccountFactory;
    use rust_decimal_macros::dec;
    use tellerbank_core::{AccountDetails, UserProfile};
    use tellerbank_persistence::{Store, StoreConfig};
    use tempfile::TempDir;

    async fn savings_account(dir: &TempDir) -> (ServiceContext, AccountId) {
        let store = Store::connect(&StoreConfig::for_path(dir.path().join("bank.db")))
            .await
            .unwrap();
        let ctx = ServiceContext::new(store);
        let profile = UserProfile::new("Ana Souza", "11111111111", Credential::new("pw"));
        let onboarding = AccountFactory::new(&ctx)
            .onboard(&profile, "0001", &AccountDetails::savings(dec!(0.005)))
            .await
            .unwrap();
        (ctx, onboarding.account.id)
    }

    #[tokio::test]
    async fn test_amount_validation() {
        let dir = TempDir::new().unwrap();
        let (ctx, account) = savings_account(&dir).await;
        let ledger = Ledger::new(&ctx);

        for amount in [dec!(0), dec!(-5), dec!(1.005)] {
            assert!(matches!(
                ledger.deposit(account, amount).await,
                Err(BankError::InvalidAmount(_))
            ));
        }
        assert!(matches!(
            ledger.withdraw(account, dec!(0), &Credential::new("pw")).await,
            Err(BankError::InvalidAmount(_))
        ));
    }

    #[tokio::test]
    async fn test_deposit_to_unknown_account() {
        let dir = TempDir::new().unwrap();
        let (ctx, _) = savings_account(&dir).await;

        let err = Ledger::new(&ctx)
            .deposit(AccountId(999), dec!(10))
            .await
            .unwrap_err();
        assert!(matches!(err, BankError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unknown_account_never_authenticates() {
        let dir = TempDir::new().unwrap();
        let (ctx, account) = savings_account(&dir).await;
        let ledger = Ledger::new(&ctx);

        assert!(ledger.authenticate(account, &Credential::new("pw")).await.unwrap());
        assert!(!ledger.authenticate(AccountId(999), &Credential::new("pw")).await.unwrap());
        assert_eq!(
            ledger.get_balance(AccountId(999), &Credential::new("pw")).await,
            Err(BankError::AuthenticationFailed)
        );
    }

    #[tokio::test]
    async fn test_deposit_returns_new_balance() {
        let dir = TempDir::new().unwrap();
        let (ctx, account) = savings_account(&dir).await;
        let ledger = Ledger::new(&ctx);

        assert_eq!(ledger.deposit(account, dec!(10.50)).await.unwrap(), dec!(10.50));
        assert_eq!(ledger.deposit(account, dec!(0.25)).await.unwrap(), dec!(10.75));
        assert_eq!(
            ledger.withdraw(account, dec!(0.75), &Credential::new("pw")).await.unwrap(),
            dec!(10.00)
        );
    }
}
