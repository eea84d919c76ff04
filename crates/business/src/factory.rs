//! Account factory - opening accounts and the onboarding flow
//!
//! The account row and its extension row are written by the same unit of
//! work. Account numbers are allocated by the insert itself.

use crate::error::{BankError, BankResult};
use crate::identity::insert_user;
use crate::services::{Onboarding, ServiceContext};
use tellerbank_core::{
    AccountDetails, AccountId, AccountNumber, AccountOverview, CredentialHash, CustomerId,
    OpenedAccount, Role, UserProfile,
};
use tellerbank_persistence::{AccountRepo, CustomerRepo, ExtensionRepo, SqliteConnection};
use tracing::info;

async fn insert_account(
    conn: &mut SqliteConnection,
    customer_id: CustomerId,
    branch: &str,
    details: &AccountDetails,
) -> BankResult<OpenedAccount> {
    let (id, number) =
        AccountRepo::insert_next(&mut *conn, customer_id, branch, details.kind()).await?;

    match details {
        AccountDetails::Checking {
            credit_limit,
            due_date,
        } => ExtensionRepo::insert_checking(&mut *conn, id, *credit_limit, *due_date).await?,
        AccountDetails::Savings { interest_rate } => {
            ExtensionRepo::insert_savings(&mut *conn, id, *interest_rate).await?
        }
    }

    Ok(OpenedAccount { id, number })
}

fn validate_opening(branch: &str, details: &AccountDetails) -> BankResult<()> {
    if branch.trim().is_empty() {
        return Err(BankError::InvalidAccountDetails(
            "branch is required".to_string(),
        ));
    }
    details.validate()?;
    Ok(())
}

/// Account Factory - opens accounts
pub struct AccountFactory<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountFactory<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Open an account with balance 0 for an existing customer
    #[tracing::instrument(skip(self, details), fields(kind = %details.kind()))]
    pub async fn open_account(
        &self,
        customer_id: CustomerId,
        branch: &str,
        details: &AccountDetails,
    ) -> BankResult<OpenedAccount> {
        validate_opening(branch, details)?;

        self.ctx
            .bounded(async {
                if !CustomerRepo::exists(self.ctx.pool(), customer_id).await? {
                    return Err(BankError::NotFound(format!("Customer with id {customer_id}")));
                }

                let mut uow = self.ctx.store().transaction().await?;
                let opened = insert_account(uow.conn(), customer_id, branch, details).await?;
                uow.commit().await?;

                info!(account_id = %opened.id, number = %opened.number, "account opened");
                Ok(opened)
            })
            .await
    }

    /// Register a customer and open their first account as one unit of work
    #[tracing::instrument(skip(self, profile, details), fields(national_id = %profile.national_id))]
    pub async fn onboard(
        &self,
        profile: &UserProfile,
        branch: &str,
        details: &AccountDetails,
    ) -> BankResult<Onboarding> {
        profile.validate()?;
        validate_opening(branch, details)?;
        let password_hash = CredentialHash::derive(&profile.credential).encode();

        self.ctx
            .bounded(async {
                let mut uow = self.ctx.store().transaction().await?;
                let user_id =
                    insert_user(uow.conn(), profile, &password_hash, Role::Customer).await?;
                let customer_id = CustomerRepo::insert(uow.conn(), user_id).await?;
                let account = insert_account(uow.conn(), customer_id, branch, details).await?;
                uow.commit().await?;

                info!(%user_id, %customer_id, number = %account.number, "customer onboarded");
                Ok(Onboarding {
                    user_id,
                    customer_id,
                    account,
                })
            })
            .await
    }

    /// Account joined with its holder and extension
    pub async fn account_overview(&self, number: AccountNumber) -> BankResult<AccountOverview> {
        self.ctx
            .bounded(async {
                let row = AccountRepo::overview_by_number(self.ctx.pool(), number).await?;
                Ok(AccountOverview::try_from(row)?)
            })
            .await
    }

    pub async fn resolve_account(&self, number: AccountNumber) -> BankResult<AccountId> {
        self.ctx
            .bounded(async { Ok(AccountRepo::id_by_number(self.ctx.pool(), number).await?) })
            .await
    }
}
