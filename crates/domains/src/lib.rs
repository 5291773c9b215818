//! anonboard/crates/domains/src/lib.rs
//!
//! Entities, client-facing views and the store port for the anonymous board.

pub mod error;
pub mod models;
pub mod traits;
pub mod views;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;
pub use views::*;
