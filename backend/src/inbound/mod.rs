//! Inbound adapters that translate external calls into controller calls
//! while keeping framework details at the edge.
//!
//! The [`ipc`] command channel is the core entry point; [`http`] exposes it
//! over a loopback HTTP server for out-of-process shells.

pub mod http;
pub mod ipc;
