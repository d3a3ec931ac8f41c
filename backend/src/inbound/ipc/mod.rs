//! Command channel: the single entry point through which the UI talks to the
//! back office.
//!
//! Commands are addressed by fixed names such as `brands:list` and carry a
//! JSON payload. See [`commands`] for the vocabulary.

mod channel;
pub mod commands;
mod trace;

pub use channel::{CommandChannel, RegistrationError};
pub use commands::register_commands;
pub use trace::TraceId;
