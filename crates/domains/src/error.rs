//! # BoardError
//!
//! Centralized error handling for the board operations.
//! Every variant is terminal for its request; nothing is retried.

use thiserror::Error;

/// Failure reported by a [`ThreadRepository`](crate::ThreadRepository) adapter.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Infrastructure failure (e.g., DB down, connection reset) or a stored
    /// document the adapter could not decode.
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// The error type for all thread and reply operations.
#[derive(Error, Debug)]
pub enum BoardError {
    /// A required field is absent or empty. Carries the client-facing reason.
    #[error("{0}")]
    Validation(&'static str),

    /// No thread or reply matches the given board and identifier.
    #[error("{0}")]
    NotFound(&'static str),

    /// Wrong delete password. Delete operations also report unknown
    /// threads and replies this way so existence cannot be probed.
    #[error("incorrect password")]
    IncorrectPassword,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BoardError {
    pub const MISSING_FIELDS: Self = Self::Validation("missing fields");
    pub const MISSING_THREAD_ID: Self = Self::Validation("missing thread_id");
    pub const THREAD_NOT_FOUND: Self = Self::NotFound("thread not found");
    pub const REPLY_NOT_FOUND: Self = Self::NotFound("reply not found");
}

/// A specialized Result type for board logic.
pub type Result<T> = std::result::Result<T, BoardError>;
