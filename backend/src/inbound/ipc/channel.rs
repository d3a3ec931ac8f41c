//! Named command registry and dispatcher.
//!
//! A [`CommandChannel`] maps fixed command names onto handlers that take a
//! typed request and resolve to an [`Envelope`]. Dispatch owns the JSON
//! boundary: payloads are decoded strictly into the handler's request type
//! and every outcome, including unknown names and malformed payloads, comes
//! back as a serialized envelope.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, ready};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{Instrument, debug, info_span, warn};

use super::trace::TraceId;
use crate::domain::{Envelope, Error};

type Handler = Arc<dyn Fn(Value) -> BoxFuture<'static, Value> + Send + Sync>;

/// Raised while building a channel; aborts startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// The command name is already bound.
    #[error("command `{0}` is registered twice")]
    Duplicate(String),
}

/// Registry of command handlers keyed by command name.
#[derive(Clone, Default)]
pub struct CommandChannel {
    handlers: BTreeMap<&'static str, Handler>,
}

fn encode<T: Serialize>(envelope: &Envelope<T>) -> Value {
    serde_json::to_value(envelope).unwrap_or_else(|err| {
        let error = Error::unknown("response could not be encoded").with_cause(err.to_string());
        let fallback: Envelope<()> = Envelope::err(error);
        serde_json::to_value(&fallback).unwrap_or(Value::Null)
    })
}

fn failure(error: Error) -> Value {
    encode(&Envelope::<()>::err(error))
}

impl CommandChannel {
    /// Channel with no commands bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `handler`.
    ///
    /// # Errors
    /// Returns [`RegistrationError::Duplicate`] when `name` is already bound.
    pub fn register<Req, Res, F, Fut>(
        &mut self,
        name: &'static str,
        handler: F,
    ) -> Result<(), RegistrationError>
    where
        Req: DeserializeOwned + Send + 'static,
        Res: Serialize + 'static,
        F: Fn(Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Envelope<Res>> + Send + 'static,
    {
        if self.handlers.contains_key(name) {
            return Err(RegistrationError::Duplicate(name.to_owned()));
        }
        let erased: Handler = Arc::new(move |payload: Value| {
            // Derived request structs also accept sequences as positional fields.
            if !payload.is_object() {
                warn!("command payload is not an object");
                return ready(failure(Error::validation("payload must be a JSON object"))).boxed();
            }
            match serde_json::from_value::<Req>(payload) {
                Ok(request) => handler(request).map(|envelope| encode(&envelope)).boxed(),
                Err(err) => {
                    warn!(error = %err, "command payload rejected");
                    ready(failure(Error::validation(format!("invalid payload: {err}")))).boxed()
                }
            }
        });
        self.handlers.insert(name, erased);
        Ok(())
    }

    /// Whether `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Bound command names in lexical order.
    pub fn commands(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    /// Run the command `name` with `payload` and return the serialized
    /// envelope.
    ///
    /// Never fails: unknown names resolve to an `UNKNOWN` envelope and
    /// undecodable payloads to a `VALIDATION` envelope.
    pub async fn dispatch(&self, name: &str, payload: Value) -> Value {
        let trace_id = TraceId::generate();
        let span = info_span!("command", command = name, %trace_id);
        let handler = self.handlers.get(name).cloned();
        TraceId::scope(
            trace_id,
            async move {
                let Some(handler) = handler else {
                    warn!("unknown command");
                    return failure(Error::unknown(format!("unknown command: {name}")));
                };
                let response = handler(payload).await;
                let failed = !response.get("err").is_none_or(serde_json::Value::is_null);
                debug!(failed, "command completed");
                response
            }
            .instrument(span),
        )
        .await
    }
}
