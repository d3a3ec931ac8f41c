//! Typed client for the command channel.
//!
//! Purpose: give front ends one object that logs in, issues commands as the
//! logged-in user, caches query results and keeps that cache coherent after
//! writes.
//!
//! Public surface:
//! - BackofficeClient: a logged-in session with per-entity accessors.
//! - QueryClient / QueryCache: the cache-aware dispatch underneath.
//! - CommandTransport: in-process or loopback HTTP delivery.
//! - Entity: the invalidation graph between entities.

mod cache;
mod cache_key;
mod entities;
mod invalidation;
mod query_client;
mod transport;

use std::sync::Arc;

use tracing::info;

pub use self::cache::{Generation, QueryCache};
pub use self::cache_key::{CacheKey, CacheKeyError};
pub use self::entities::{
    BrandFields, Brands, Categories, CategoryFields, CrudClient, CrudEntity, CustomerFields,
    Customers, ListParams, OrderLineInput, OrdersClient, ProductFields, Products, ReportsClient,
    UserFields, Users,
};
pub use self::invalidation::Entity;
pub use self::query_client::{ClientError, QueryClient};
pub use self::transport::{CommandTransport, HttpTransport, InProcessTransport, TransportError};

use crate::controllers::LoginRequest;
use crate::domain::AuthenticatedUser;
use crate::inbound::ipc::commands;

/// A logged-in session.
///
/// Every command issued through the accessors carries the session user as
/// `loggedUserId`; the server still authorizes each one.
#[derive(Clone)]
pub struct BackofficeClient {
    queries: QueryClient,
    user: AuthenticatedUser,
}

impl BackofficeClient {
    /// Log in with `name` and `password`.
    ///
    /// Login is never cached. The cache is cleared on success so a new
    /// session never sees results fetched for another user.
    ///
    /// # Errors
    /// Returns `INCORRECT_CREDENTIALS` or `VALIDATION` from the server, or a
    /// transport failure.
    pub async fn login(
        transport: Arc<dyn CommandTransport>,
        cache: Arc<QueryCache>,
        name: &str,
        password: &str,
    ) -> Result<Self, ClientError> {
        let queries = QueryClient::new(transport, cache);
        let request = LoginRequest {
            name: name.to_owned(),
            password: password.to_owned(),
        };
        let user: AuthenticatedUser = queries.call(commands::LOGIN, &request).await?;
        queries.cache().clear();
        info!(user_id = %user.id, role = %user.role, "session started");
        Ok(Self { queries, user })
    }

    /// The logged-in user.
    pub fn user(&self) -> &AuthenticatedUser {
        &self.user
    }

    /// Cache shared by every entity client of this session.
    pub fn cache(&self) -> &QueryCache {
        self.queries.cache()
    }

    /// Brand commands.
    pub fn brands(&self) -> CrudClient<Brands> {
        CrudClient::new(self.queries.clone(), self.user.id)
    }

    /// Category commands.
    pub fn categories(&self) -> CrudClient<Categories> {
        CrudClient::new(self.queries.clone(), self.user.id)
    }

    /// Customer commands.
    pub fn customers(&self) -> CrudClient<Customers> {
        CrudClient::new(self.queries.clone(), self.user.id)
    }

    /// Product commands.
    pub fn products(&self) -> CrudClient<Products> {
        CrudClient::new(self.queries.clone(), self.user.id)
    }

    /// Account commands.
    pub fn users(&self) -> CrudClient<Users> {
        CrudClient::new(self.queries.clone(), self.user.id)
    }

    /// Order commands.
    pub fn orders(&self) -> OrdersClient {
        OrdersClient::new(self.queries.clone(), self.user.id)
    }

    /// Reporting commands.
    pub fn reports(&self) -> ReportsClient {
        ReportsClient::new(self.queries.clone(), self.user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use crate::test_support::{MutableClock, ScriptedTransport};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::json;

    fn cache() -> Arc<QueryCache> {
        let clock = Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0)
                .single()
                .expect("valid timestamp"),
        ));
        Arc::new(QueryCache::new(clock))
    }

    #[rstest]
    #[tokio::test]
    async fn login_stamps_the_session_user_on_commands() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            commands::LOGIN,
            json!({"data": {"id": 5, "name": "ada", "role": "admin"}, "err": null}),
        );
        transport.respond(
            commands::USERS_LIST,
            json!({"data": {"items": [], "total": 0}, "err": null}),
        );

        let client = BackofficeClient::login(transport.clone(), cache(), "ada", "analytical")
            .await
            .expect("logged in");
        client.users().list(ListParams::default()).await.expect("list");

        assert_eq!(client.user().name, "ada");
        assert_eq!(
            transport.payloads(commands::USERS_LIST),
            vec![json!({"loggedUserId": 5})]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn rejected_logins_surface_the_error_kind() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            commands::LOGIN,
            json!({"data": null, "err": {
                "kind": "INCORRECT_CREDENTIALS",
                "message": "incorrect user name or password"
            }}),
        );

        let Err(err) = BackofficeClient::login(transport, cache(), "ada", "wrong").await else {
            panic!("login should fail");
        };
        assert_eq!(
            err.domain().map(crate::domain::Error::kind),
            Some(ErrorKind::IncorrectCredentials)
        );
    }
}
