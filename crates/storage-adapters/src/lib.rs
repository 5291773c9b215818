//! # storage-adapters
//!
//! Implementations of the `ThreadRepository` port.
//! The in-memory store is always compiled; PostgreSQL sits behind `db-postgres`.

pub mod memory;
#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::InMemoryThreadRepository;
#[cfg(feature = "db-postgres")]
pub use postgres::PgThreadRepository;
