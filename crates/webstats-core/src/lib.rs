//! webstats core: snapshot model, template engine, fragment and page rendering.
//!
//! Everything here is pure and transport-agnostic. The HTTP side lives in
//! `webstats-server`, which pulls a snapshot per request and feeds it through
//! [`render::compose_page`].
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. A malformed template
//! or bad collaborator data must surface as `WebStatsError`, never as a crash
//! of the serving process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod render;
pub mod snapshot;
pub mod template;

/// Shared result type.
pub use error::{Result, WebStatsError};
pub use snapshot::{ProcessUsage, RoomInfo, StatsCounts, StatsSnapshot};
pub use template::Template;
