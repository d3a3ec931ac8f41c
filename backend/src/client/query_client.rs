//! Cached queries and invalidating mutations over a [`CommandTransport`].
//!
//! Queries consult the [`QueryCache`] first and only dispatch on a miss.
//! Mutations always dispatch and, once they succeed, drop every cached
//! query of the entities that depend on what was mutated.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::cache::QueryCache;
use super::cache_key::{CacheKey, CacheKeyError};
use super::invalidation::Entity;
use super::transport::{CommandTransport, TransportError};
use crate::domain::{Envelope, Error};

/// Why a client call produced no value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The command ran and resolved to a domain error.
    #[error("command failed: {0}")]
    Command(Error),
    /// The command never reached the channel, or its answer never came back.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The request or response did not have the expected shape.
    #[error("unexpected payload: {message}")]
    Payload { message: String },
    /// The query could not be keyed.
    #[error(transparent)]
    CacheKey(#[from] CacheKeyError),
}

impl ClientError {
    pub(crate) fn payload(err: impl std::fmt::Display) -> Self {
        Self::Payload {
            message: err.to_string(),
        }
    }

    /// The domain error carried by a failed command, if that is what this is.
    pub fn domain(&self) -> Option<&Error> {
        match self {
            Self::Command(error) => Some(error),
            _ => None,
        }
    }
}

fn unwrap_envelope(raw: Value) -> Result<Value, ClientError> {
    let envelope: Envelope<Value> = serde_json::from_value(raw).map_err(ClientError::payload)?;
    envelope.into_result().map_err(ClientError::Command)
}

/// Cache-aware command issuer shared by the typed clients.
#[derive(Clone)]
pub struct QueryClient {
    transport: Arc<dyn CommandTransport>,
    cache: Arc<QueryCache>,
}

impl QueryClient {
    /// Client sending over `transport` and caching into `cache`.
    pub fn new(transport: Arc<dyn CommandTransport>, cache: Arc<QueryCache>) -> Self {
        Self { transport, cache }
    }

    /// The cache queries read from.
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Run a read-only command, answering from the cache when possible.
    ///
    /// The fetch runs on its own task: if the caller stops waiting, the
    /// command still completes and a successful result is still cached.
    /// Failures are never cached.
    ///
    /// # Errors
    /// Returns the command's domain error, or a transport or payload
    /// failure.
    pub async fn query<P, T>(&self, command: &'static str, params: &P) -> Result<T, ClientError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let params = serde_json::to_value(params).map_err(ClientError::payload)?;
        let key = CacheKey::for_command(command, &params)?;
        if let Some(hit) = self.cache.get(&key) {
            debug!(command, %key, "query answered from cache");
            return serde_json::from_value(hit).map_err(ClientError::payload);
        }

        let seen = self.cache.generation(key.entity());
        let transport = Arc::clone(&self.transport);
        let cache = Arc::clone(&self.cache);
        let fetch = tokio::spawn(async move {
            let data = unwrap_envelope(transport.send(command, params).await?)?;
            cache.store(key, data.clone(), seen);
            Ok::<_, ClientError>(data)
        });
        let data = fetch.await.map_err(|err| {
            warn!(command, error = %err, "query task failed");
            ClientError::Transport(TransportError::Transport {
                message: err.to_string(),
            })
        })??;
        serde_json::from_value(data).map_err(ClientError::payload)
    }

    /// Run a command that changes `entity`, then invalidate its dependents.
    ///
    /// Nothing is invalidated when the command fails.
    ///
    /// # Errors
    /// Returns the command's domain error, or a transport or payload
    /// failure.
    pub async fn mutate<P, T>(
        &self,
        entity: Entity,
        command: &'static str,
        params: &P,
    ) -> Result<T, ClientError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let data = self.send(command, params).await?;
        let removed = self.cache.invalidate(entity.dependents());
        debug!(command, %entity, removed, "mutation invalidated cached queries");
        serde_json::from_value(data).map_err(ClientError::payload)
    }

    /// Run a command without touching the cache.
    ///
    /// # Errors
    /// Returns the command's domain error, or a transport or payload
    /// failure.
    pub async fn call<P, T>(&self, command: &'static str, params: &P) -> Result<T, ClientError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let data = self.send(command, params).await?;
        serde_json::from_value(data).map_err(ClientError::payload)
    }

    async fn send<P>(&self, command: &'static str, params: &P) -> Result<Value, ClientError>
    where
        P: Serialize + ?Sized,
    {
        let params = serde_json::to_value(params).map_err(ClientError::payload)?;
        unwrap_envelope(self.transport.send(command, params).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use crate::test_support::{MutableClock, ScriptedTransport};
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn transport() -> Arc<ScriptedTransport> {
        Arc::new(ScriptedTransport::new())
    }

    fn client(transport: &Arc<ScriptedTransport>) -> QueryClient {
        let clock = Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
                .single()
                .expect("valid timestamp"),
        ));
        let transport: Arc<dyn CommandTransport> = transport.clone();
        QueryClient::new(transport, Arc::new(QueryCache::new(clock)))
    }

    #[rstest]
    #[tokio::test]
    async fn repeated_queries_dispatch_once(transport: Arc<ScriptedTransport>) {
        transport.respond("brands:list", json!({"data": {"items": [], "total": 0}, "err": null}));
        let client = client(&transport);
        let params = json!({"loggedUserId": 1});

        for _ in 0..3 {
            let page: Value = client.query("brands:list", &params).await.expect("page");
            assert_eq!(page["total"], 0);
        }
        assert_eq!(transport.calls("brands:list"), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn failures_are_not_cached(transport: Arc<ScriptedTransport>) {
        transport.respond(
            "users:list",
            json!({"data": null, "err": {"kind": "UNAUTHORIZED", "message": "no"}}),
        );
        let client = client(&transport);
        let params = json!({"loggedUserId": 1});

        for _ in 0..2 {
            let err = client
                .query::<_, Value>("users:list", &params)
                .await
                .expect_err("unauthorized");
            assert_eq!(err.domain().map(Error::kind), Some(ErrorKind::Unauthorized));
        }
        assert_eq!(transport.calls("users:list"), 2);
        assert!(client.cache().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn successful_mutations_invalidate_dependents(transport: Arc<ScriptedTransport>) {
        transport.respond("brands:list", json!({"data": [], "err": null}));
        transport.respond("products:list", json!({"data": [], "err": null}));
        transport.respond("customers:list", json!({"data": [], "err": null}));
        transport.respond("brands:update", json!({"data": {"id": 1, "name": "B"}, "err": null}));
        let client = client(&transport);
        let params = json!({"loggedUserId": 1});
        for command in ["brands:list", "products:list", "customers:list"] {
            let _: Value = client.query(command, &params).await.expect("query");
        }

        let _: Value = client
            .mutate(Entity::Brands, "brands:update", &json!({"brandId": 1}))
            .await
            .expect("update");
        for command in ["brands:list", "products:list", "customers:list"] {
            let _: Value = client.query(command, &params).await.expect("query");
        }

        assert_eq!(transport.calls("brands:list"), 2);
        assert_eq!(transport.calls("products:list"), 2);
        assert_eq!(transport.calls("customers:list"), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_mutations_invalidate_nothing(transport: Arc<ScriptedTransport>) {
        transport.respond("brands:list", json!({"data": [], "err": null}));
        transport.respond(
            "brands:delete",
            json!({"data": null, "err": {"kind": "FOREIGN_KEY_VIOLATION", "message": "in use"}}),
        );
        let client = client(&transport);
        let params = json!({"loggedUserId": 1});
        let _: Value = client.query("brands:list", &params).await.expect("query");

        let err = client
            .mutate::<_, Value>(Entity::Brands, "brands:delete", &json!({"brandId": 1}))
            .await
            .expect_err("in use");
        assert_eq!(
            err.domain().map(Error::kind),
            Some(ErrorKind::ForeignKeyViolation)
        );
        let _: Value = client.query("brands:list", &params).await.expect("query");
        assert_eq!(transport.calls("brands:list"), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn transport_failures_surface_as_transport_errors(transport: Arc<ScriptedTransport>) {
        let client = client(&transport);
        let err = client
            .query::<_, Value>("orders:list", &json!({"loggedUserId": 1}))
            .await
            .expect_err("nothing scripted");
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
