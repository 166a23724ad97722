//! webstats server library entry.
//!
//! Wires the settings store, host collaborators, page composer and the axum
//! router into a [`server::StatusServer`] with an explicit start/stop
//! lifecycle. Consumed by the binary (`main.rs`), by embedding hosts and by
//! integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod app_state;
pub mod composer;
pub mod config;
pub mod handler;
pub mod host;
pub mod router;
pub mod server;

pub use server::{ServerState, StartGate, StatusServer};
