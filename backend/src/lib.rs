//! Back-office command core.
//!
//! A fixed set of named commands over brands, categories, customers,
//! products, users, orders and reports. Each command is authorized,
//! validated and answered with a `{data, err}` envelope. The typed
//! [`client`] caches query results and invalidates them after writes.

pub mod client;
pub mod config;
pub mod context;
pub mod controllers;
pub mod domain;
pub mod inbound;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use context::AppContext;
