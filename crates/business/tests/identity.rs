//! Identity registry: profiles, employees and logins

mod common;

use common::{address, bank, credential, onboard, profile, savings};
use tellerbank_business::{BankError, IdentityRegistry};
use tellerbank_core::{Address, Credential, NewEmployee, UserProfile};

fn teller(code: &str, national_id: &str) -> NewEmployee {
    let profile = UserProfile::new("Bruno Lima", national_id, Credential::new("teller-pw"))
        .with_address(address());
    NewEmployee::new(profile, code, "Teller")
}

#[tokio::test]
async fn test_lookups_chain() {
    let bank = bank().await;
    let registry = IdentityRegistry::new(&bank.ctx);
    let (user_id, customer_id) = registry
        .register_customer(&profile("11111111111"))
        .await
        .unwrap();

    assert_eq!(
        registry.lookup_user_id_by_national_id("11111111111").await.unwrap(),
        user_id
    );
    assert_eq!(
        registry.lookup_customer_id_by_user_id(user_id).await.unwrap(),
        customer_id
    );
    assert!(matches!(
        registry.lookup_user_id_by_national_id("99999999999").await,
        Err(BankError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_fetch_profile_formats_address() {
    let bank = bank().await;
    let registry = IdentityRegistry::new(&bank.ctx);
    registry.register_customer(&profile("11111111111")).await.unwrap();

    let view = registry.fetch_profile("11111111111").await.unwrap();
    assert_eq!(view.full_name, "Ana Souza");
    assert_eq!(view.phone.as_deref(), Some("11 99999-0000"));
    assert_eq!(
        view.address,
        "Av. Paulista, 1578, Bela Vista, São Paulo, SP, 01310-100"
    );

    let bare = UserProfile::new("Caio", "33333333333", credential());
    registry.register_customer(&bare).await.unwrap();
    assert_eq!(registry.fetch_profile("33333333333").await.unwrap().address, "");
}

#[tokio::test]
async fn test_fetch_profile_requires_customer() {
    let bank = bank().await;
    let registry = IdentityRegistry::new(&bank.ctx);
    registry
        .register_employee(&teller("E-001", "22222222222"))
        .await
        .unwrap();

    // An employee is a user but not a customer.
    assert!(matches!(
        registry.fetch_profile("22222222222").await,
        Err(BankError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_employee_registration_and_login() {
    let bank = bank().await;
    let registry = IdentityRegistry::new(&bank.ctx);
    registry
        .register_employee(&teller("E-001", "22222222222"))
        .await
        .unwrap();

    assert_eq!(registry.employee_name("E-001").await.unwrap(), "Bruno Lima");
    let view = registry.fetch_employee_profile("E-001").await.unwrap();
    assert_eq!(view.job_title, "Teller");
    assert_eq!(view.profile.national_id, "22222222222");

    assert!(registry
        .validate_employee_login("E-001", &Credential::new("teller-pw"))
        .await
        .unwrap());
    assert!(!registry
        .validate_employee_login("E-001", &Credential::new("wrong"))
        .await
        .unwrap());
    assert!(!registry
        .validate_employee_login("E-404", &Credential::new("teller-pw"))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_employee_validation_and_duplicates() {
    let bank = bank().await;
    let registry = IdentityRegistry::new(&bank.ctx);

    let mut no_city = teller("E-001", "22222222222");
    no_city.profile.address = Some(Address {
        city: None,
        ..address()
    });
    assert!(matches!(
        registry.register_employee(&no_city).await,
        Err(BankError::InvalidProfile(_))
    ));

    registry
        .register_employee(&teller("E-001", "22222222222"))
        .await
        .unwrap();
    let err = registry
        .register_employee(&teller("E-001", "44444444444"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        BankError::DuplicateIdentity("employee code already registered".to_string())
    );
    // The second user row was rolled back with the employee row.
    assert!(matches!(
        registry.lookup_user_id_by_national_id("44444444444").await,
        Err(BankError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_customer_login_by_branch() {
    let bank = bank().await;
    let onboarding = onboard(&bank.ctx, "11111111111", savings()).await;
    let registry = IdentityRegistry::new(&bank.ctx);

    let account = registry
        .login_customer("11111111111", &credential(), "0001")
        .await
        .unwrap();
    assert_eq!(account, onboarding.account.id);

    assert_eq!(
        registry
            .login_customer("11111111111", &credential(), "0002")
            .await,
        Err(BankError::AuthenticationFailed)
    );
    assert_eq!(
        registry
            .login_customer("11111111111", &Credential::new("nope"), "0001")
            .await,
        Err(BankError::AuthenticationFailed)
    );
}

#[tokio::test]
async fn test_missing_profile_fields() {
    let bank = bank().await;
    let registry = IdentityRegistry::new(&bank.ctx);

    let nameless = UserProfile::new("", "11111111111", credential());
    assert!(matches!(
        registry.register_customer(&nameless).await,
        Err(BankError::InvalidProfile(_))
    ));
}
