//! Identity registry - users, customers, employees
//!
//! Registration writes the user row, its address and the role row in one
//! unit of work. National id and employee code uniqueness is enforced by the
//! schema inside that unit of work, so a duplicate leaves no rows behind.

use crate::error::{BankError, BankResult};
use crate::services::{credential_matches, ServiceContext};
use tellerbank_core::{
    AccountId, Credential, CredentialHash, CustomerId, EmployeeId, EmployeeView, NewEmployee,
    ProfileView, Role, UserId, UserProfile,
};
use tellerbank_persistence::{
    AddressRepo, CustomerRepo, EmployeeRepo, SqliteConnection, UserRepo,
};
use tracing::{debug, info, warn};

/// Insert a user and its address on an open unit of work
pub(crate) async fn insert_user(
    conn: &mut SqliteConnection,
    profile: &UserProfile,
    password_hash: &str,
    role: Role,
) -> BankResult<UserId> {
    let user_id = UserRepo::insert(&mut *conn, profile, role, password_hash).await?;
    if let Some(address) = &profile.address {
        AddressRepo::insert(&mut *conn, user_id, address).await?;
    }
    Ok(user_id)
}

/// Identity Registry - registration, lookups and logins
pub struct IdentityRegistry<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> IdentityRegistry<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a user (and address, if present) under `role`
    #[tracing::instrument(skip(self, profile), fields(national_id = %profile.national_id))]
    pub async fn register_user(&self, profile: &UserProfile, role: Role) -> BankResult<UserId> {
        profile.validate()?;
        let password_hash = CredentialHash::derive(&profile.credential).encode();

        self.ctx
            .bounded(async {
                let mut uow = self.ctx.store().transaction().await?;
                let user_id = insert_user(uow.conn(), profile, &password_hash, role).await?;
                uow.commit().await?;

                info!(%user_id, %role, "user registered");
                Ok(user_id)
            })
            .await
    }

    /// Register a customer: user, address and customer row together
    #[tracing::instrument(skip(self, profile), fields(national_id = %profile.national_id))]
    pub async fn register_customer(
        &self,
        profile: &UserProfile,
    ) -> BankResult<(UserId, CustomerId)> {
        profile.validate()?;
        let password_hash = CredentialHash::derive(&profile.credential).encode();

        self.ctx
            .bounded(async {
                let mut uow = self.ctx.store().transaction().await?;
                let user_id =
                    insert_user(uow.conn(), profile, &password_hash, Role::Customer).await?;
                let customer_id = CustomerRepo::insert(uow.conn(), user_id).await?;
                uow.commit().await?;

                info!(%user_id, %customer_id, "customer registered");
                Ok((user_id, customer_id))
            })
            .await
    }

    /// Register an employee: user, address and employee row together
    #[tracing::instrument(skip(self, employee), fields(code = %employee.employee_code))]
    pub async fn register_employee(
        &self,
        employee: &NewEmployee,
    ) -> BankResult<(UserId, EmployeeId)> {
        employee.validate()?;
        let password_hash = CredentialHash::derive(&employee.profile.credential).encode();

        self.ctx
            .bounded(async {
                let mut uow = self.ctx.store().transaction().await?;
                let user_id =
                    insert_user(uow.conn(), &employee.profile, &password_hash, Role::Employee)
                        .await?;
                let employee_id = EmployeeRepo::insert(
                    uow.conn(),
                    user_id,
                    &employee.employee_code,
                    &employee.job_title,
                )
                .await?;
                uow.commit().await?;

                info!(%user_id, %employee_id, "employee registered");
                Ok((user_id, employee_id))
            })
            .await
    }

    pub async fn lookup_user_id_by_national_id(&self, national_id: &str) -> BankResult<UserId> {
        self.ctx
            .bounded(async {
                let user_id = UserRepo::id_by_national_id(self.ctx.pool(), national_id).await?;
                debug!(%user_id, "user resolved");
                Ok(user_id)
            })
            .await
    }

    pub async fn lookup_customer_id_by_user_id(&self, user_id: UserId) -> BankResult<CustomerId> {
        self.ctx
            .bounded(async { Ok(CustomerRepo::id_by_user(self.ctx.pool(), user_id).await?) })
            .await
    }

    /// Customer profile with the formatted address
    pub async fn fetch_profile(&self, national_id: &str) -> BankResult<ProfileView> {
        self.ctx
            .bounded(async {
                let row = UserRepo::customer_profile(self.ctx.pool(), national_id).await?;
                Ok(row.into())
            })
            .await
    }

    pub async fn fetch_employee_profile(&self, employee_code: &str) -> BankResult<EmployeeView> {
        self.ctx
            .bounded(async {
                let row = EmployeeRepo::profile_by_code(self.ctx.pool(), employee_code).await?;
                Ok(row.into())
            })
            .await
    }

    pub async fn employee_name(&self, employee_code: &str) -> BankResult<String> {
        self.ctx
            .bounded(async { Ok(EmployeeRepo::name_by_code(self.ctx.pool(), employee_code).await?) })
            .await
    }

    /// Whether `credential` belongs to the employee with this code
    #[tracing::instrument(skip(self, credential))]
    pub async fn validate_employee_login(
        &self,
        employee_code: &str,
        credential: &Credential,
    ) -> BankResult<bool> {
        self.ctx
            .bounded(async {
                let valid = match EmployeeRepo::credential_by_code(self.ctx.pool(), employee_code)
                    .await?
                {
                    Some(stored) => credential_matches(&stored, credential)?,
                    None => false,
                };
                if !valid {
                    warn!("employee login rejected");
                }
                Ok(valid)
            })
            .await
    }

    /// Log a customer in at a branch; yields the account they hold there
    #[tracing::instrument(skip(self, national_id, credential))]
    pub async fn login_customer(
        &self,
        national_id: &str,
        credential: &Credential,
        branch: &str,
    ) -> BankResult<AccountId> {
        self.ctx
            .bounded(async {
                let row = CustomerRepo::credential_at_branch(self.ctx.pool(), national_id, branch)
                    .await?;
                let valid = match &row {
                    Some(row) => credential_matches(&row.password_hash, credential)?,
                    None => false,
                };
                match row {
                    Some(row) if valid => {
                        let account_id = AccountId(row.id_account);
                        info!(%account_id, "customer logged in");
                        Ok(account_id)
                    }
                    _ => {
                        warn!("customer login rejected");
                        Err(BankError::AuthenticationFailed)
                    }
                }
            })
            .await
    }
}
