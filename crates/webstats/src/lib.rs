//! Top-level facade crate for webstats.
//!
//! Re-exports the core rendering types and the server library so hosts can
//! depend on a single crate.

pub mod core {
    pub use webstats_core::*;
}

pub mod server {
    pub use webstats_server::*;
}
