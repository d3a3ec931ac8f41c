//! Port abstraction for user account persistence.
use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Error, ListQuery, NewUser, User, UserChanges, UserCredentials, UserId};

/// User account persistence operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Page through users ordered by name.
    async fn list(&self, query: &ListQuery) -> Result<Page<User>, Error>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, Error>;

    /// Fetch a user by login name.
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, Error>;

    /// Fetch a user with its stored password hash. Only login uses this.
    async fn find_credentials(&self, name: &str) -> Result<Option<UserCredentials>, Error>;

    async fn create(&self, user: &NewUser) -> Result<User, Error>;

    /// Replace name and role, and the password hash when one is supplied.
    async fn update(&self, id: UserId, changes: &UserChanges) -> Result<User, Error>;

    async fn delete(&self, id: UserId) -> Result<(), Error>;
}
