//! # storage-adapters
//!
//! Backend implementations of the repository ports in `domains`.
//!
//! The in-memory store is always compiled: it backs the test suites and
//! small single-process deployments. The Postgres store lives behind the
//! `db-postgres` feature and is the production backend.

pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::MemoryStore;

#[cfg(feature = "db-postgres")]
pub use postgres::PgStore;
