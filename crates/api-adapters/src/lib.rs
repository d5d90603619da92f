//! # api-adapters
//!
//! The REST boundary for Inkpress. Thin glue only: handlers deserialize the
//! request, resolve the acting identity, call one service operation, and
//! re-shape the result. Every domain error kind maps to a distinct status
//! code plus a machine-checkable `error.kind` in the body.
//!
//! The whole surface sits behind the `web-axum` feature so headless tools
//! (seeders, migration runners) can depend on the workspace without the web
//! stack.

#[cfg(feature = "web-axum")]
pub mod dto;
#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod extract;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod routes;
#[cfg(feature = "web-axum")]
pub mod state;

#[cfg(feature = "web-axum")]
pub use routes::router;
#[cfg(feature = "web-axum")]
pub use state::AppState;
