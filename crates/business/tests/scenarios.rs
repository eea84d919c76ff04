//! End-to-end scenarios through the public services

mod common;

use common::{bank, checking, credential, onboard, profile, savings};
use rust_decimal_macros::dec;
use tellerbank_business::{
    AccountClosure, AccountFactory, BankError, IdentityRegistry, Ledger,
};
use tellerbank_core::{AccountKind, AccountNumber, TransactionKind};

/// Scenario: open savings, deposit 100.00, one DEPOSIT entry of +100.00
#[tokio::test]
async fn test_savings_deposit_statement() {
    let bank = bank().await;
    let account = onboard(&bank.ctx, "11111111111", savings()).await.account;
    let ledger = Ledger::new(&bank.ctx);

    assert_eq!(ledger.get_balance(account.id, &credential()).await.unwrap(), dec!(0));

    ledger.deposit(account.id, dec!(100.00)).await.unwrap();
    assert_eq!(
        ledger.get_balance(account.id, &credential()).await.unwrap(),
        dec!(100.00)
    );

    let statement = ledger.get_statement(account.id, &credential()).await.unwrap();
    assert_eq!(statement.len(), 1);
    assert_eq!(statement[0].kind, TransactionKind::Deposit);
    assert_eq!(statement[0].amount.to_decimal(), dec!(100.00));
}

/// Scenario: withdrawing more than the balance fails and changes nothing
#[tokio::test]
async fn test_overdraw_is_rejected() {
    let bank = bank().await;
    let account = onboard(&bank.ctx, "11111111111", checking()).await.account;
    let ledger = Ledger::new(&bank.ctx);
    ledger.deposit(account.id, dec!(100.00)).await.unwrap();

    let err = ledger
        .withdraw(account.id, dec!(150.00), &credential())
        .await
        .unwrap_err();

    assert_eq!(err, BankError::insufficient_funds(dec!(150.00), dec!(100.00)));
    assert_eq!(
        ledger.get_balance(account.id, &credential()).await.unwrap(),
        dec!(100.00)
    );
    assert_eq!(
        ledger.get_statement(account.id, &credential()).await.unwrap().len(),
        1
    );
}

/// Scenario: the same national id cannot register twice
#[tokio::test]
async fn test_duplicate_national_id() {
    let bank = bank().await;
    let registry = IdentityRegistry::new(&bank.ctx);

    registry.register_customer(&profile("11111111111")).await.unwrap();
    let err = registry
        .register_customer(&profile("11111111111"))
        .await
        .unwrap_err();

    assert!(matches!(err, BankError::DuplicateIdentity(_)));
}

/// Scenario: first account is 10000, second is 10001
#[tokio::test]
async fn test_first_account_numbers() {
    let bank = bank().await;
    let registry = IdentityRegistry::new(&bank.ctx);
    let factory = AccountFactory::new(&bank.ctx);
    let (_, customer) = registry.register_customer(&profile("11111111111")).await.unwrap();

    let first = factory.open_account(customer, "0001", &savings()).await.unwrap();
    let second = factory.open_account(customer, "0001", &checking()).await.unwrap();

    assert_eq!(first.number, AccountNumber(10000));
    assert_eq!(second.number, AccountNumber(10001));
}

/// Scenario: savings accounts have no credit limit
#[tokio::test]
async fn test_credit_limit_on_savings() {
    let bank = bank().await;
    let ledger = Ledger::new(&bank.ctx);
    let saver = onboard(&bank.ctx, "11111111111", savings()).await.account;
    let spender = onboard(&bank.ctx, "22222222222", checking()).await.account;

    assert!(matches!(
        ledger.get_credit_limit(saver.id, &credential()).await,
        Err(BankError::NotApplicable(_))
    ));
    assert_eq!(
        ledger.get_credit_limit(spender.id, &credential()).await.unwrap(),
        dec!(500.00)
    );
}

/// Scenario: close an account resolved from a national id
#[tokio::test]
async fn test_close_resolved_account() {
    let bank = bank().await;
    let opened = onboard(&bank.ctx, "11111111111", checking()).await.account;
    let closure = AccountClosure::new(&bank.ctx);

    let target = closure.resolve_closure_target("11111111111").await.unwrap();
    assert_eq!(target.account_number, opened.number);

    assert!(closure.close_account(target.account_number).await.unwrap());

    assert!(matches!(
        Ledger::new(&bank.ctx).get_account_type(opened.id).await,
        Err(BankError::NotFound(_))
    ));
    assert!(matches!(
        AccountFactory::new(&bank.ctx)
            .resolve_account(target.account_number)
            .await,
        Err(BankError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_account_type_needs_no_credential() {
    let bank = bank().await;
    let saver = onboard(&bank.ctx, "11111111111", savings()).await.account;
    let spender = onboard(&bank.ctx, "22222222222", checking()).await.account;
    let ledger = Ledger::new(&bank.ctx);

    assert_eq!(ledger.get_account_type(saver.id).await.unwrap(), AccountKind::Savings);
    assert_eq!(ledger.get_account_type(spender.id).await.unwrap(), AccountKind::Checking);
}
