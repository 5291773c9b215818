//! # Core Traits (Ports)
//!
//! Any store adapter must implement these traits to be used by the binary.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Reply, ReplyPatch, Thread};

/// Document persistence contract for threads and their embedded replies.
///
/// Every mutating method is a single conditional write keyed by
/// `(board, id)`; adapters must not implement them as read-modify-write of
/// the whole document.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ThreadRepository: Send + Sync {
    async fn insert_thread(&self, thread: &Thread) -> Result<(), StoreError>;

    async fn find_thread(&self, board: &str, id: Uuid) -> Result<Option<Thread>, StoreError>;

    /// Threads of `board`, most recently bumped first, at most `limit`.
    async fn list_threads(&self, board: &str, limit: usize) -> Result<Vec<Thread>, StoreError>;

    /// Returns `false` when nothing matched.
    async fn delete_thread(&self, board: &str, id: Uuid) -> Result<bool, StoreError>;

    /// Returns `false` when nothing matched.
    async fn mark_thread_reported(&self, board: &str, id: Uuid) -> Result<bool, StoreError>;

    /// Appends `reply` and sets `bumped_on = reply.created_on` in one write.
    /// Returns the updated thread, or `None` when the thread does not exist.
    async fn append_reply(
        &self,
        board: &str,
        thread_id: Uuid,
        reply: &Reply,
    ) -> Result<Option<Thread>, StoreError>;

    /// Applies `patch` to one embedded reply. Returns `false` when either the
    /// thread or the reply is missing.
    async fn patch_reply(
        &self,
        board: &str,
        thread_id: Uuid,
        reply_id: Uuid,
        patch: ReplyPatch,
    ) -> Result<bool, StoreError>;
}
