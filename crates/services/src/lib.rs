//! # services
//!
//! The eight board operations, written against the [`ThreadRepository`] port.
//! Callers hand in already-validated commands; identifiers arrive as raw
//! strings and are resolved here.

pub mod threads;

pub use threads::ThreadService;
