//! Repository implementations for SQLite
//!
//! One function per named statement. Every statement goes through
//! [`checked`] and every value travels as a bind parameter. Functions take any
//! SQLite executor: the pool for single reads, or the connection of an open
//! [`UnitOfWork`](crate::UnitOfWork) for writes that must land together.

use crate::error::{PersistenceError, PersistenceResult};
use crate::guard::checked;
use crate::sqlite::schema::*;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::SqliteExecutor;
use tellerbank_core::{
    AccountId, AccountKind, AccountNumber, Address, CustomerId, EmployeeId, Money, Role,
    TransactionId, TransactionKind, UserId, UserProfile,
};

// ============================================================================
// User Repository
// ============================================================================

/// Repository for table `user`
pub struct UserRepo;

impl UserRepo {
    /// Insert a user with an already hashed credential
    pub async fn insert<'e, E: SqliteExecutor<'e>>(
        db: E,
        profile: &UserProfile,
        role: Role,
        password_hash: &str,
    ) -> PersistenceResult<UserId> {
        let id = sqlx::query_scalar::<_, i64>(checked(
            "INSERT INTO user (name, cpf, birth_date, phone, password_hash, user_type) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id_user",
        )?)
        .bind(&profile.full_name)
        .bind(&profile.national_id)
        .bind(profile.birth_date)
        .bind(&profile.phone)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(db)
        .await?;
        Ok(UserId(id))
    }

    pub async fn id_by_national_id<'e, E: SqliteExecutor<'e>>(
        db: E,
        national_id: &str,
    ) -> PersistenceResult<UserId> {
        sqlx::query_scalar::<_, i64>(checked("SELECT id_user FROM user WHERE cpf = ?")?)
            .bind(national_id)
            .fetch_optional(db)
            .await?
            .map(UserId)
            .ok_or_else(|| PersistenceError::not_found("User", format!("national id {national_id}")))
    }

    /// Profile of a customer, with address if any
    pub async fn customer_profile<'e, E: SqliteExecutor<'e>>(
        db: E,
        national_id: &str,
    ) -> PersistenceResult<ProfileRow> {
        sqlx::query_as::<_, ProfileRow>(checked(
            "SELECT u.name, u.cpf, u.birth_date, u.phone, \
                    a.id_address, a.zip_code, a.street, a.house_number, a.neighborhood, a.city, a.state \
             FROM user u \
             JOIN customer c ON c.id_user = u.id_user \
             LEFT JOIN address a ON a.id_user = u.id_user \
             WHERE u.cpf = ?",
        )?)
        .bind(national_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| PersistenceError::not_found("Customer", format!("national id {national_id}")))
    }

    pub async fn count<'e, E: SqliteExecutor<'e>>(db: E) -> PersistenceResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(checked("SELECT COUNT(*) FROM user")?)
            .fetch_one(db)
            .await?;
        Ok(count)
    }
}

// ============================================================================
// Address Repository
// ============================================================================

/// Repository for table `address`
pub struct AddressRepo;

impl AddressRepo {
    pub async fn insert<'e, E: SqliteExecutor<'e>>(
        db: E,
        user_id: UserId,
        address: &Address,
    ) -> PersistenceResult<()> {
        sqlx::query(checked(
            "INSERT INTO address (zip_code, street, house_number, neighborhood, city, state, id_user) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )?)
        .bind(&address.zip_code)
        .bind(&address.street)
        .bind(&address.house_number)
        .bind(&address.neighborhood)
        .bind(&address.city)
        .bind(&address.state)
        .bind(user_id.get())
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn count<'e, E: SqliteExecutor<'e>>(db: E) -> PersistenceResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(checked("SELECT COUNT(*) FROM address")?)
            .fetch_one(db)
            .await?;
        Ok(count)
    }
}

// ============================================================================
// Customer Repository
// ============================================================================

/// Repository for table `customer`
pub struct CustomerRepo;

impl CustomerRepo {
    pub async fn insert<'e, E: SqliteExecutor<'e>>(
        db: E,
        user_id: UserId,
    ) -> PersistenceResult<CustomerId> {
        let id = sqlx::query_scalar::<_, i64>(checked(
            "INSERT INTO customer (id_user) VALUES (?) RETURNING id_customer",
        )?)
        .bind(user_id.get())
        .fetch_one(db)
        .await?;
        Ok(CustomerId(id))
    }

    pub async fn id_by_user<'e, E: SqliteExecutor<'e>>(
        db: E,
        user_id: UserId,
    ) -> PersistenceResult<CustomerId> {
        sqlx::query_scalar::<_, i64>(checked("SELECT id_customer FROM customer WHERE id_user = ?")?)
            .bind(user_id.get())
            .fetch_optional(db)
            .await?
            .map(CustomerId)
            .ok_or_else(|| PersistenceError::not_found("Customer", format!("user {user_id}")))
    }

    pub async fn exists<'e, E: SqliteExecutor<'e>>(
        db: E,
        customer_id: CustomerId,
    ) -> PersistenceResult<bool> {
        let found = sqlx::query_scalar::<_, i64>(checked(
            "SELECT COUNT(*) FROM customer WHERE id_customer = ?",
        )?)
        .bind(customer_id.get())
        .fetch_one(db)
        .await?;
        Ok(found > 0)
    }

    /// Lowest-numbered account a customer holds at a branch, with the
    /// customer's stored credential
    pub async fn credential_at_branch<'e, E: SqliteExecutor<'e>>(
        db: E,
        national_id: &str,
        branch: &str,
    ) -> PersistenceResult<Option<CredentialRow>> {
        let row = sqlx::query_as::<_, CredentialRow>(checked(
            "SELECT a.id_account, u.password_hash \
             FROM user u \
             JOIN customer c ON c.id_user = u.id_user \
             JOIN account a ON a.id_customer = c.id_customer \
             WHERE u.cpf = ? AND a.branch = ? \
             ORDER BY a.account_number ASC LIMIT 1",
        )?)
        .bind(national_id)
        .bind(branch)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }
}

// ============================================================================
// Employee Repository
// ============================================================================

/// Repository for table `employee`
pub struct EmployeeRepo;

impl EmployeeRepo {
    pub async fn insert<'e, E: SqliteExecutor<'e>>(
        db: E,
        user_id: UserId,
        employee_code: &str,
        job_title: &str,
    ) -> PersistenceResult<EmployeeId> {
        let id = sqlx::query_scalar::<_, i64>(checked(
            "INSERT INTO employee (employee_code, role, id_user) VALUES (?, ?, ?) RETURNING id_employee",
        )?)
        .bind(employee_code)
        .bind(job_title)
        .bind(user_id.get())
        .fetch_one(db)
        .await?;
        Ok(EmployeeId(id))
    }

    pub async fn profile_by_code<'e, E: SqliteExecutor<'e>>(
        db: E,
        employee_code: &str,
    ) -> PersistenceResult<EmployeeProfileRow> {
        sqlx::query_as::<_, EmployeeProfileRow>(checked(
            "SELECT e.employee_code, e.role, u.name, u.cpf, u.birth_date, u.phone, \
                    a.id_address, a.zip_code, a.street, a.house_number, a.neighborhood, a.city, a.state \
             FROM employee e \
             JOIN user u ON u.id_user = e.id_user \
             LEFT JOIN address a ON a.id_user = u.id_user \
             WHERE e.employee_code = ?",
        )?)
        .bind(employee_code)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| PersistenceError::not_found("Employee", format!("code {employee_code}")))
    }

    pub async fn name_by_code<'e, E: SqliteExecutor<'e>>(
        db: E,
        employee_code: &str,
    ) -> PersistenceResult<String> {
        sqlx::query_scalar::<_, String>(checked(
            "SELECT u.name FROM employee e JOIN user u ON u.id_user = e.id_user \
             WHERE e.employee_code = ?",
        )?)
        .bind(employee_code)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| PersistenceError::not_found("Employee", format!("code {employee_code}")))
    }

    /// Stored credential of an employee, if the code exists
    pub async fn credential_by_code<'e, E: SqliteExecutor<'e>>(
        db: E,
        employee_code: &str,
    ) -> PersistenceResult<Option<String>> {
        let hash = sqlx::query_scalar::<_, String>(checked(
            "SELECT u.password_hash FROM employee e JOIN user u ON u.id_user = e.id_user \
             WHERE e.employee_code = ?",
        )?)
        .bind(employee_code)
        .fetch_optional(db)
        .await?;
        Ok(hash)
    }
}

// ============================================================================
// Account Repository
// ============================================================================

/// Repository for table `account`
pub struct AccountRepo;

impl AccountRepo {
    /// Insert an account with balance 0 under the next free number.
    ///
    /// The number is `MAX(account_number) + 1` (or [`AccountNumber::FIRST`] on
    /// an empty table), read and written by the same statement.
    pub async fn insert_next<'e, E: SqliteExecutor<'e>>(
        db: E,
        customer_id: CustomerId,
        branch: &str,
        kind: AccountKind,
    ) -> PersistenceResult<(AccountId, AccountNumber)> {
        let (id, number) = sqlx::query_as::<_, (i64, i64)>(checked(
            "INSERT INTO account (account_number, id_customer, branch, account_type, balance) \
             SELECT COALESCE(MAX(account_number) + 1, ?), ?, ?, ?, 0 FROM account \
             RETURNING id_account, account_number",
        )?)
        .bind(AccountNumber::FIRST.get())
        .bind(customer_id.get())
        .bind(branch)
        .bind(kind.as_str())
        .fetch_one(db)
        .await?;
        Ok((AccountId(id), AccountNumber(number)))
    }

    pub async fn id_by_number<'e, E: SqliteExecutor<'e>>(
        db: E,
        number: AccountNumber,
    ) -> PersistenceResult<AccountId> {
        sqlx::query_scalar::<_, i64>(checked(
            "SELECT id_account FROM account WHERE account_number = ?",
        )?)
        .bind(number.get())
        .fetch_optional(db)
        .await?
        .map(AccountId)
        .ok_or_else(|| PersistenceError::not_found("Account", format!("number {number}")))
    }

    pub async fn lowest_number_for_customer<'e, E: SqliteExecutor<'e>>(
        db: E,
        customer_id: CustomerId,
    ) -> PersistenceResult<AccountNumber> {
        sqlx::query_scalar::<_, Option<i64>>(checked(
            "SELECT MIN(account_number) FROM account WHERE id_customer = ?",
        )?)
        .bind(customer_id.get())
        .fetch_one(db)
        .await?
        .map(AccountNumber)
        .ok_or_else(|| PersistenceError::not_found("Account", format!("customer {customer_id}")))
    }

    /// Stored credential of the user owning the account
    pub async fn holder_credential<'e, E: SqliteExecutor<'e>>(
        db: E,
        account_id: AccountId,
    ) -> PersistenceResult<Option<String>> {
        let hash = sqlx::query_scalar::<_, String>(checked(
            "SELECT u.password_hash \
             FROM account a \
             JOIN customer c ON c.id_customer = a.id_customer \
             JOIN user u ON u.id_user = c.id_user \
             WHERE a.id_account = ?",
        )?)
        .bind(account_id.get())
        .fetch_optional(db)
        .await?;
        Ok(hash)
    }

    pub async fn balance<'e, E: SqliteExecutor<'e>>(
        db: E,
        account_id: AccountId,
    ) -> PersistenceResult<Money> {
        sqlx::query_scalar::<_, i64>(checked("SELECT balance FROM account WHERE id_account = ?")?)
            .bind(account_id.get())
            .fetch_optional(db)
            .await?
            .map(Money::from_cents)
            .ok_or_else(|| PersistenceError::not_found("Account", format!("id {account_id}")))
    }

    pub async fn kind<'e, E: SqliteExecutor<'e>>(
        db: E,
        account_id: AccountId,
    ) -> PersistenceResult<AccountKind> {
        let code = sqlx::query_scalar::<_, String>(checked(
            "SELECT account_type FROM account WHERE id_account = ?",
        )?)
        .bind(account_id.get())
        .fetch_optional(db)
        .await?
        .ok_or_else(|| PersistenceError::not_found("Account", format!("id {account_id}")))?;
        Ok(AccountKind::parse(&code)?)
    }

    /// Add to the balance. `None` when the account does not exist or the sum
    /// would overflow.
    pub async fn credit<'e, E: SqliteExecutor<'e>>(
        db: E,
        account_id: AccountId,
        amount: Money,
    ) -> PersistenceResult<Option<Money>> {
        let balance = sqlx::query_scalar::<_, i64>(checked(
            "UPDATE account SET balance = balance + ? \
             WHERE id_account = ? AND balance <= ? RETURNING balance",
        )?)
        .bind(amount.cents())
        .bind(account_id.get())
        .bind(i64::MAX - amount.cents())
        .fetch_optional(db)
        .await?;
        Ok(balance.map(Money::from_cents))
    }

    /// Subtract from the balance only if it covers the amount. `None` when
    /// the account does not exist or holds less than `amount`.
    pub async fn debit<'e, E: SqliteExecutor<'e>>(
        db: E,
        account_id: AccountId,
        amount: Money,
    ) -> PersistenceResult<Option<Money>> {
        let balance = sqlx::query_scalar::<_, i64>(checked(
            "UPDATE account SET balance = balance - ? \
             WHERE id_account = ? AND balance >= ? RETURNING balance",
        )?)
        .bind(amount.cents())
        .bind(account_id.get())
        .bind(amount.cents())
        .fetch_optional(db)
        .await?;
        Ok(balance.map(Money::from_cents))
    }

    pub async fn overview_by_number<'e, E: SqliteExecutor<'e>>(
        db: E,
        number: AccountNumber,
    ) -> PersistenceResult<AccountOverviewRow> {
        sqlx::query_as::<_, AccountOverviewRow>(checked(
            "SELECT a.id_account, a.account_number, a.branch, a.account_type, a.balance, \
                    u.name AS holder_name, u.cpf AS holder_cpf, \
                    ca.credit_limit, ca.due_date, sa.interest_rate \
             FROM account a \
             JOIN customer c ON c.id_customer = a.id_customer \
             JOIN user u ON u.id_user = c.id_user \
             LEFT JOIN checking_account ca ON ca.id_account = a.id_account \
             LEFT JOIN savings_account sa ON sa.id_account = a.id_account \
             WHERE a.account_number = ?",
        )?)
        .bind(number.get())
        .fetch_optional(db)
        .await?
        .ok_or_else(|| PersistenceError::not_found("Account", format!("number {number}")))
    }

    /// Number of account rows removed
    pub async fn delete_by_number<'e, E: SqliteExecutor<'e>>(
        db: E,
        number: AccountNumber,
    ) -> PersistenceResult<u64> {
        let result = sqlx::query(checked("DELETE FROM account WHERE account_number = ?")?)
            .bind(number.get())
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count<'e, E: SqliteExecutor<'e>>(db: E) -> PersistenceResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(checked("SELECT COUNT(*) FROM account")?)
            .fetch_one(db)
            .await?;
        Ok(count)
    }
}

// ============================================================================
// Extension Repository
// ============================================================================

/// Repository for tables `checking_account` and `savings_account`
pub struct ExtensionRepo;

impl ExtensionRepo {
    pub async fn insert_checking<'e, E: SqliteExecutor<'e>>(
        db: E,
        account_id: AccountId,
        credit_limit: Decimal,
        due_date: Option<NaiveDate>,
    ) -> PersistenceResult<()> {
        sqlx::query(checked(
            "INSERT INTO checking_account (id_account, credit_limit, due_date) VALUES (?, ?, ?)",
        )?)
        .bind(account_id.get())
        .bind(credit_limit.to_string())
        .bind(due_date)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn insert_savings<'e, E: SqliteExecutor<'e>>(
        db: E,
        account_id: AccountId,
        interest_rate: Decimal,
    ) -> PersistenceResult<()> {
        sqlx::query(checked(
            "INSERT INTO savings_account (id_account, interest_rate) VALUES (?, ?)",
        )?)
        .bind(account_id.get())
        .bind(interest_rate.to_string())
        .execute(db)
        .await?;
        Ok(())
    }

    /// Credit limit of a checking account; `None` without a checking row
    pub async fn credit_limit<'e, E: SqliteExecutor<'e>>(
        db: E,
        account_id: AccountId,
    ) -> PersistenceResult<Option<Decimal>> {
        let limit = sqlx::query_scalar::<_, String>(checked(
            "SELECT credit_limit FROM checking_account WHERE id_account = ?",
        )?)
        .bind(account_id.get())
        .fetch_optional(db)
        .await?;

        limit
            .map(|value| parse_decimal("credit_limit", &value))
            .transpose()
    }

    pub async fn delete_checking_by_number<'e, E: SqliteExecutor<'e>>(
        db: E,
        number: AccountNumber,
    ) -> PersistenceResult<u64> {
        let result = sqlx::query(checked(
            "DELETE FROM checking_account WHERE id_account IN \
             (SELECT id_account FROM account WHERE account_number = ?)",
        )?)
        .bind(number.get())
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_savings_by_number<'e, E: SqliteExecutor<'e>>(
        db: E,
        number: AccountNumber,
    ) -> PersistenceResult<u64> {
        let result = sqlx::query(checked(
            "DELETE FROM savings_account WHERE id_account IN \
             (SELECT id_account FROM account WHERE account_number = ?)",
        )?)
        .bind(number.get())
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    /// Extension rows of both kinds
    pub async fn count<'e, E: SqliteExecutor<'e>>(db: E) -> PersistenceResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(checked(
            "SELECT (SELECT COUNT(*) FROM checking_account) + (SELECT COUNT(*) FROM savings_account)",
        )?)
        .fetch_one(db)
        .await?;
        Ok(count)
    }
}

// ============================================================================
// Transaction Repository
// ============================================================================

/// Repository for table `"transaction"`
pub struct TransactionRepo;

impl TransactionRepo {
    /// Append a ledger entry; `amount` is stored signed
    pub async fn insert<'e, E: SqliteExecutor<'e>>(
        db: E,
        account_id: AccountId,
        kind: TransactionKind,
        amount: Money,
        at: DateTime<Utc>,
    ) -> PersistenceResult<TransactionId> {
        let id = sqlx::query_scalar::<_, i64>(checked(
            "INSERT INTO \"transaction\" (transaction_type, amount, transaction_date, id_account) \
             VALUES (?, ?, ?, ?) RETURNING id_transaction",
        )?)
        .bind(kind.as_str())
        .bind(kind.signed(amount).cents())
        .bind(at)
        .bind(account_id.get())
        .fetch_one(db)
        .await?;
        Ok(TransactionId(id))
    }

    /// Entries of one account, oldest first
    pub async fn by_account<'e, E: SqliteExecutor<'e>>(
        db: E,
        account_id: AccountId,
    ) -> PersistenceResult<Vec<StatementRow>> {
        let rows = sqlx::query_as::<_, StatementRow>(checked(
            "SELECT id_transaction, transaction_type, amount, transaction_date \
             FROM \"transaction\" WHERE id_account = ? \
             ORDER BY transaction_date ASC, id_transaction ASC",
        )?)
        .bind(account_id.get())
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn delete_by_account_number<'e, E: SqliteExecutor<'e>>(
        db: E,
        number: AccountNumber,
    ) -> PersistenceResult<u64> {
        let result = sqlx::query(checked(
            "DELETE FROM \"transaction\" WHERE id_account IN \
             (SELECT id_account FROM account WHERE account_number = ?)",
        )?)
        .bind(number.get())
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn count<'e, E: SqliteExecutor<'e>>(db: E) -> PersistenceResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(checked("SELECT COUNT(*) FROM \"transaction\"")?)
            .fetch_one(db)
            .await?;
        Ok(count)
    }
}

// ============================================================================
// Report Repository
// ============================================================================

/// Read-only projections for reporting
pub struct ReportRepo;

impl ReportRepo {
    /// Every ledger entry with its account and holder, oldest first
    pub async fn all_transactions<'e, E: SqliteExecutor<'e>>(
        db: E,
    ) -> PersistenceResult<Vec<ReportRow>> {
        let rows = sqlx::query_as::<_, ReportRow>(checked(
            "SELECT t.id_transaction, a.account_number, a.account_type, t.transaction_type, \
                    t.amount, t.transaction_date, u.name, u.cpf \
             FROM \"transaction\" t \
             JOIN account a ON a.id_account = t.id_account \
             JOIN customer c ON c.id_customer = a.id_customer \
             JOIN user u ON u.id_user = c.id_user \
             ORDER BY t.transaction_date ASC, t.id_transaction ASC",
        )?)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
