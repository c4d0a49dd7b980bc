/// Account management system
///
/// Handles registration, login and the user CRUD operations. Accounts are the
/// credential store: the e-mail is the login identifier and only a bcrypt
/// hash of the password is ever persisted.

mod authenticator;
mod store;

pub use authenticator::Authenticator;
pub use store::{AccountChanges, AccountStore, SqliteAccountStore};

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(alias = "login_identifier")]
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[serde(alias = "secret")]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Self-service registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(alias = "login_identifier")]
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[serde(alias = "secret")]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[serde(alias = "display_name")]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub paternal_surname: Option<String>,
    pub maternal_surname: Option<String>,
}

/// Token returned by login and registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub auth: bool,
    pub token: String,
    /// Seconds until the token expires
    pub expires_in: i64,
}

/// Account creation through the protected users API
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub paternal_surname: Option<String>,
    pub maternal_surname: Option<String>,
    pub active: Option<bool>,
}

/// Partial account update; the e-mail cannot be changed
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "password cannot be empty"))]
    pub password: Option<String>,
    pub paternal_surname: Option<String>,
    pub maternal_surname: Option<String>,
    pub active: Option<bool>,
}

/// Row to insert into the credential store
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub paternal_surname: Option<String>,
    pub maternal_surname: Option<String>,
    pub active: bool,
    /// None for self-registration
    pub created_by: Option<i64>,
}
