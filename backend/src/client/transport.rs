//! How the client reaches the command channel.
//!
//! A transport moves one command and its JSON payload to the channel and
//! brings the serialized envelope back. It never interprets the envelope.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::inbound::ipc::CommandChannel;

/// Failure to deliver a command or read its envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request could not be built or sent.
    #[error("transport failed: {message}")]
    Transport { message: String },
    /// The request timed out.
    #[error("transport timed out: {message}")]
    Timeout { message: String },
    /// The server answered with a non-success status.
    #[error("unexpected status {status}")]
    Status { status: u16 },
    /// The response body was not JSON.
    #[error("invalid response body: {message}")]
    Decode { message: String },
}

/// Delivers commands to a [`CommandChannel`], wherever it lives.
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Send `command` with `payload` and return the raw envelope.
    async fn send(&self, command: &str, payload: Value) -> Result<Value, TransportError>;
}

/// Calls a channel in the same process.
#[derive(Clone)]
pub struct InProcessTransport {
    channel: Arc<CommandChannel>,
}

impl InProcessTransport {
    /// Transport that dispatches straight into `channel`.
    pub fn new(channel: Arc<CommandChannel>) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl CommandTransport for InProcessTransport {
    async fn send(&self, command: &str, payload: Value) -> Result<Value, TransportError> {
        Ok(self.channel.dispatch(command, payload).await)
    }
}

/// Posts commands to a loopback server's `/ipc/{command}` endpoint.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Build a transport for the server at `base_url` with a per-request
    /// timeout.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(map_transport_error)?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, command: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(&format!("ipc/{command}"))
            .map_err(|err| TransportError::Transport {
                message: err.to_string(),
            })
    }
}

#[async_trait]
impl CommandTransport for HttpTransport {
    async fn send(&self, command: &str, payload: Value) -> Result<Value, TransportError> {
        let response = self
            .client
            .post(self.endpoint(command)?)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        serde_json::from_slice(&body).map_err(|err| TransportError::Decode {
            message: err.to_string(),
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            message: error.to_string(),
        }
    } else {
        TransportError::Transport {
            message: error.to_string(),
        }
    }
}
