//! Loopback HTTP transport for the command channel.

use actix_web::web;

pub mod health;
pub mod invoke;

/// Mount the command and probe endpoints.
///
/// Callers provide `web::Data<CommandChannel>` and `web::Data<HealthState>`
/// as app data.
///
/// [`CommandChannel`]: crate::inbound::ipc::CommandChannel
/// [`HealthState`]: health::HealthState
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(invoke::invoke)
        .service(health::ready)
        .service(health::live);
}
