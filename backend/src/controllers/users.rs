//! User account commands.
//!
//! On top of the role matrix, an actor may only touch accounts whose role
//! it is allowed to manage, and nobody may delete their own account.

use std::sync::Arc;

use pagination::Page;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::ports::UserRepository;
use crate::domain::{
    Action, Authorizer, Deleted, DomainResult, Envelope, Error, NewUser, Resource, Role, User,
    UserChanges, UserId,
};

use super::{ListRequest, run_blocking};

/// `users:get` and `users:delete` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserIdRequest {
    pub logged_user_id: UserId,
    pub user_id: UserId,
}

/// `users:create` parameters.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserRequest {
    pub logged_user_id: UserId,
    pub name: String,
    pub role: Role,
    pub password: String,
}

/// `users:update` parameters. Omitting `password` keeps the current one.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub logged_user_id: UserId,
    pub user_id: UserId,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("logged_user_id", &self.logged_user_id)
            .field("name", &self.name)
            .field("role", &self.role)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Debug for UpdateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateUserRequest")
            .field("logged_user_id", &self.logged_user_id)
            .field("user_id", &self.user_id)
            .field("name", &self.name)
            .field("role", &self.role)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// User administration behind the command channel.
#[derive(Clone)]
pub struct UsersController {
    authorizer: Authorizer,
    users: Arc<dyn UserRepository>,
}

fn require_manageable(actor: &User, target: Role) -> DomainResult<()> {
    if actor.role.may_manage(target) {
        return Ok(());
    }
    warn!(user_id = %actor.id, role = %actor.role, %target, "account role out of reach");
    Err(Error::unauthorized(format!(
        "{} may not manage {target} accounts",
        actor.role
    )))
}

impl UsersController {
    /// Controller over `users`, gated by `authorizer`.
    pub fn new(authorizer: Authorizer, users: Arc<dyn UserRepository>) -> Self {
        Self { authorizer, users }
    }

    async fn existing(&self, id: UserId) -> DomainResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    /// Page through accounts, optionally filtered by name.
    pub async fn list(&self, request: ListRequest) -> Envelope<Page<User>> {
        self.try_list(request).await.into()
    }

    async fn try_list(&self, request: ListRequest) -> DomainResult<Page<User>> {
        self.authorizer
            .authorize(request.logged_user_id, Resource::Users, Action::Read)
            .await?;
        let query = request.to_query()?;
        self.users.list(&query).await
    }

    /// Fetch one account by id.
    pub async fn get(&self, request: UserIdRequest) -> Envelope<User> {
        self.try_get(request).await.into()
    }

    async fn try_get(&self, request: UserIdRequest) -> DomainResult<User> {
        self.authorizer
            .authorize(request.logged_user_id, Resource::Users, Action::Read)
            .await?;
        self.existing(request.user_id).await
    }

    /// Validate and store a new account.
    pub async fn create(&self, request: CreateUserRequest) -> Envelope<User> {
        self.try_create(request).await.into()
    }

    async fn try_create(&self, request: CreateUserRequest) -> DomainResult<User> {
        let actor = self
            .authorizer
            .authorize(request.logged_user_id, Resource::Users, Action::Create)
            .await?;
        require_manageable(&actor, request.role)?;
        let CreateUserRequest {
            name,
            role,
            password,
            ..
        } = request;
        let user = run_blocking(move || NewUser::try_new(&name, role, &password)).await?;
        self.users.create(&user).await
    }

    /// Replace the editable fields of an existing account.
    pub async fn update(&self, request: UpdateUserRequest) -> Envelope<User> {
        self.try_update(request).await.into()
    }

    async fn try_update(&self, request: UpdateUserRequest) -> DomainResult<User> {
        let actor = self
            .authorizer
            .authorize(request.logged_user_id, Resource::Users, Action::Update)
            .await?;
        let (name, role, password) = (request.name, request.role, request.password);
        let changes =
            run_blocking(move || UserChanges::try_new(&name, role, password.as_deref())).await?;
        let target = self.existing(request.user_id).await?;
        require_manageable(&actor, target.role)?;
        require_manageable(&actor, request.role)?;
        self.users.update(request.user_id, &changes).await
    }

    /// Remove one account other than the actor's own.
    pub async fn delete(&self, request: UserIdRequest) -> Envelope<Deleted<UserId>> {
        self.try_delete(request).await.into()
    }

    async fn try_delete(&self, request: UserIdRequest) -> DomainResult<Deleted<UserId>> {
        let actor = self
            .authorizer
            .authorize(request.logged_user_id, Resource::Users, Action::Delete)
            .await?;
        if actor.id == request.user_id {
            return Err(Error::validation("users may not delete their own account"));
        }
        let target = self.existing(request.user_id).await?;
        require_manageable(&actor, target.role)?;
        self.users.delete(request.user_id).await?;
        Ok(Deleted {
            id: request.user_id,
        })
    }
}
