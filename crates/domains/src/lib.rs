//! # domains
//!
//! The central domain models, error taxonomy, and port definitions for
//! Inkpress. Everything here is pure data and contracts; adapters live in
//! their own crates and plug into the traits defined in [`ports`].

pub mod error;
pub mod models;
pub mod ports;
pub mod query;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use ports::*;
pub use query::*;
