//! Shared fixtures for the business integration tests
#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tellerbank_business::{AccountFactory, Onboarding, ServiceContext};
use tellerbank_core::{AccountDetails, Address, Credential, UserProfile};
use tellerbank_persistence::{Store, StoreConfig};
use tempfile::TempDir;

pub const SECRET: &str = "s3cret";

/// A service context over a fresh database; the temp dir lives as long as it
pub struct TestBank {
    dir: TempDir,
    pub ctx: ServiceContext,
}

impl TestBank {
    /// A second, independent store over the same database file
    pub async fn reopen(&self) -> ServiceContext {
        let store = Store::connect(&StoreConfig::for_path(self.dir.path().join("bank.db")))
            .await
            .unwrap();
        ServiceContext::new(store)
    }
}

pub async fn bank() -> TestBank {
    let dir = TempDir::new().unwrap();
    let store = Store::connect(&StoreConfig::for_path(dir.path().join("bank.db")))
        .await
        .unwrap();
    TestBank {
        dir,
        ctx: ServiceContext::new(store),
    }
}

pub fn credential() -> Credential {
    Credential::new(SECRET)
}

pub fn address() -> Address {
    Address {
        zip_code: Some("01310-100".to_string()),
        street: Some("Av. Paulista".to_string()),
        house_number: Some("1578".to_string()),
        neighborhood: Some("Bela Vista".to_string()),
        city: Some("São Paulo".to_string()),
        state: Some("SP".to_string()),
    }
}

pub fn profile(national_id: &str) -> UserProfile {
    UserProfile::new("Ana Souza", national_id, credential())
        .with_birth_date(NaiveDate::from_ymd_opt(1990, 4, 12).unwrap())
        .with_phone("11 99999-0000")
        .with_address(address())
}

pub fn savings() -> AccountDetails {
    AccountDetails::savings(dec!(0.005))
}

pub fn checking() -> AccountDetails {
    AccountDetails::checking(dec!(500.00), NaiveDate::from_ymd_opt(2026, 12, 10).unwrap())
}

pub async fn onboard(ctx: &ServiceContext, national_id: &str, details: AccountDetails) -> Onboarding {
    AccountFactory::new(ctx)
        .onboard(&profile(national_id), "0001", &details)
        .await
        .unwrap()
}
