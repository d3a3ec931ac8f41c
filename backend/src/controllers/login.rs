//! The `login` command.
//!
//! Login is the only command without an acting user. Unknown names and
//! wrong passwords fail identically, and an unknown name still pays for one
//! hash verification.

use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::ports::UserRepository;
use crate::domain::{
    AuthenticatedUser, DomainResult, Envelope, Error, LoginCredentials, PasswordHash,
};

use super::run_blocking;

const REJECTED: &str = "incorrect user name or password";

static DUMMY_HASH: LazyLock<PasswordHash> =
    LazyLock::new(|| PasswordHash::derive("dummy password"));

/// `login` parameters.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The `login` command behind the command channel.
#[derive(Clone)]
pub struct LoginController {
    users: Arc<dyn UserRepository>,
}

impl LoginController {
    /// Controller that checks credentials against `users`.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Check the supplied credentials and return the matching account.
    pub async fn login(&self, request: LoginRequest) -> Envelope<AuthenticatedUser> {
        self.try_login(request).await.into()
    }

    async fn try_login(&self, request: LoginRequest) -> DomainResult<AuthenticatedUser> {
        let credentials = LoginCredentials::try_from_parts(&request.name, &request.password)
            .map_err(|err| Error::validation(err.to_string()))?;

        let Some(stored) = self.users.find_credentials(credentials.name()).await? else {
            run_blocking(move || Ok(DUMMY_HASH.verify(credentials.password()))).await?;
            warn!(name = %request.name.trim(), "login for unknown user");
            return Err(Error::incorrect_credentials(REJECTED));
        };

        let verified = match PasswordHash::parse(&stored.password_hash) {
            Ok(hash) => run_blocking(move || Ok(hash.verify(credentials.password()))).await?,
            Err(err) => {
                warn!(user_id = %stored.user.id, error = %err, "stored password hash unusable");
                false
            }
        };
        if !verified {
            warn!(user_id = %stored.user.id, "login rejected");
            return Err(Error::incorrect_credentials(REJECTED));
        }

        info!(user_id = %stored.user.id, role = %stored.user.role, "user logged in");
        Ok(AuthenticatedUser {
            id: stored.user.id,
            name: stored.user.name,
            role: stored.user.role,
        })
    }
}
