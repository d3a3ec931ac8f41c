//! `POST /ipc/{command}`: run one command and return its envelope.
//!
//! The status is always 200; success and failure travel inside the
//! envelope exactly as the in-process channel produces them.

use actix_web::http::header;
use actix_web::{HttpResponse, post, web};
use tracing::warn;

use crate::domain::{Envelope, Error};
use crate::inbound::ipc::CommandChannel;

/// Dispatch the JSON body to the named command.
///
/// A body that is not JSON at all yields an `UNKNOWN` envelope; a JSON body
/// of the wrong shape is the channel's `VALIDATION` failure.
#[post("/ipc/{command}")]
pub async fn invoke(
    channel: web::Data<CommandChannel>,
    command: web::Path<String>,
    body: web::Bytes,
) -> HttpResponse {
    let mut response = HttpResponse::Ok();
    response.insert_header((header::CACHE_CONTROL, "no-store"));

    let payload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(command = %command, error = %err, "unparsable command body");
            let error = Error::unknown("request body is not valid JSON").with_cause(err.to_string());
            return response.json(Envelope::<()>::err(error));
        }
    };
    response.json(channel.dispatch(&command, payload).await)
}
