//! Resolve the acting user of a command and check their role.

use std::sync::Arc;

use tracing::warn;

use super::ports::UserRepository;
use super::{Action, Error, Resource, User, UserId};

/// Gatekeeper shared by every controller.
#[derive(Clone)]
pub struct Authorizer {
    users: Arc<dyn UserRepository>,
}

impl Authorizer {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Load `logged_user_id` and require its role to permit `action` on
    /// `resource`.
    ///
    /// Unknown users and insufficient roles both yield `UNAUTHORIZED`;
    /// store failures pass through unchanged.
    pub async fn authorize(
        &self,
        logged_user_id: UserId,
        resource: Resource,
        action: Action,
    ) -> Result<User, Error> {
        let Some(user) = self.users.find_by_id(logged_user_id).await? else {
            warn!(user_id = %logged_user_id, %resource, %action, "unknown acting user");
            return Err(Error::unauthorized("unknown user"));
        };
        if !user.role.permits(resource, action) {
            warn!(user_id = %user.id, role = %user.role, %resource, %action, "permission denied");
            return Err(Error::unauthorized(format!(
                "{} may not {action} {resource}",
                user.role
            )));
        }
        Ok(user)
    }
}
