//! # Person Module
//!
//! Roles, profiles and addresses of the people known to the bank.
//! - Customer: owns accounts, authenticates per account
//! - Employee: staff member identified by an employee code

use crate::credential::Credential;
use crate::error::{CoreError, CoreResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Customer,
    Employee,
}

impl Role {
    /// Code string stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "CUSTOMER",
            Role::Employee => "EMPLOYEE",
        }
    }

    /// Parse the stored code
    pub fn parse(s: &str) -> CoreResult<Self> {
        match s.to_uppercase().as_str() {
            "CUSTOMER" => Ok(Role::Customer),
            "EMPLOYEE" => Ok(Role::Employee),
            _ => Err(CoreError::invalid_enum("user_type", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Postal address of a user. Every field is optional in storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub zip_code: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl Address {
    /// Single-line rendering:
    /// `street, house number, neighborhood, city, state, zip code`.
    /// Missing fields render as empty strings.
    pub fn formatted(&self) -> String {
        [
            &self.street,
            &self.house_number,
            &self.neighborhood,
            &self.city,
            &self.state,
            &self.zip_code,
        ]
        .iter()
        .map(|field| field.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Data needed to register a user.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub full_name: String,
    pub national_id: String,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub credential: Credential,
    pub address: Option<Address>,
}

impl UserProfile {
    pub fn new(full_name: &str, national_id: &str, credential: Credential) -> Self {
        Self {
            full_name: full_name.to_string(),
            national_id: national_id.to_string(),
            birth_date: None,
            phone: None,
            credential,
            address: None,
        }
    }

    pub fn with_birth_date(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = Some(birth_date);
        self
    }

    pub fn with_phone(mut self, phone: &str) -> Self {
        self.phone = Some(phone.to_string());
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// Identity fields every registration needs
    pub fn validate(&self) -> CoreResult<()> {
        if self.full_name.trim().is_empty() {
            return Err(CoreError::InvalidProfile("name is required".to_string()));
        }
        if self.national_id.trim().is_empty() {
            return Err(CoreError::InvalidProfile("national id is required".to_string()));
        }
        if self.credential.is_empty() {
            return Err(CoreError::InvalidProfile("credential is required".to_string()));
        }
        Ok(())
    }
}

/// Data needed to register an employee.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub profile: UserProfile,
    pub employee_code: String,
    pub job_title: String,
}

impl NewEmployee {
    pub fn new(profile: UserProfile, employee_code: &str, job_title: &str) -> Self {
        Self {
            profile,
            employee_code: employee_code.to_string(),
            job_title: job_title.to_string(),
        }
    }

    /// Staff records need an address with zip code and city, and a code and
    /// job title, on top of the base profile.
    pub fn validate(&self) -> CoreResult<()> {
        self.profile.validate()?;

        let complete_address = self
            .profile
            .address
            .as_ref()
            .map(|a| is_present(&a.zip_code) && is_present(&a.city))
            .unwrap_or(false);
        if !complete_address {
            return Err(CoreError::InvalidProfile(
                "address with zip code and city is required".to_string(),
            ));
        }

        if self.employee_code.trim().is_empty() || self.job_title.trim().is_empty() {
            return Err(CoreError::InvalidProfile(
                "employee code and job title are required".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_present(field: &Option<String>) -> bool {
    field.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
}

/// Read model of a registered person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileView {
    pub full_name: String,
    pub national_id: String,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    /// See [`Address::formatted`]; empty when the user has no address
    pub address: String,
}

/// Read model of an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeView {
    pub employee_code: String,
    pub job_title: String,
    pub profile: ProfileView,
}
