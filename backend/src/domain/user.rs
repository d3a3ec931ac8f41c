//! Back-office user accounts.

use serde::{Deserialize, Serialize};

use super::auth::PasswordHash;
use super::validation::required_name;
use super::{Error, Role, UserId};

/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Stored user record. The password hash never leaves the store through
/// this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub role: Role,
}

/// A user together with the stored password hash, as needed by login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Validated fields for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    name: String,
    role: Role,
    password_hash: PasswordHash,
}

impl NewUser {
    /// Validate the fields and hash the password.
    pub fn try_new(name: &str, role: Role, password: &str) -> Result<Self, Error> {
        Ok(Self {
            name: required_name("name", name)?,
            role,
            password_hash: hash_password(password)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}

/// Validated fields for updating an account. A missing password keeps the
/// stored hash.
#[derive(Debug, Clone)]
pub struct UserChanges {
    name: String,
    role: Role,
    password_hash: Option<PasswordHash>,
}

impl UserChanges {
    /// Validate the fields and hash the replacement password, if any.
    pub fn try_new(name: &str, role: Role, password: Option<&str>) -> Result<Self, Error> {
        Ok(Self {
            name: required_name("name", name)?,
            role,
            password_hash: password.map(hash_password).transpose()?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn password_hash(&self) -> Option<&PasswordHash> {
        self.password_hash.as_ref()
    }
}

fn hash_password(password: &str) -> Result<PasswordHash, Error> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Error::validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(PasswordHash::derive(password))
}
