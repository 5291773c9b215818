//! # Domain Models
//!
//! A Thread is a single document: the opening post plus its embedded,
//! append-only sequence of Replies. Boards are not stored entities, only the
//! `board` filter value carried by each Thread.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text a reply is blanked to once its author deletes it.
pub const DELETED_TEXT: &str = "[deleted]";

/// Number of most recent replies shown per thread in a board listing.
pub const PREVIEW_REPLIES: usize = 3;

/// Maximum number of threads returned by a board listing.
pub const LIST_LIMIT: usize = 10;

/// A top-level post on a board, owning its replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: Uuid,
    /// Board name (e.g. "general"). A filter, not part of the identity.
    pub board: String,
    pub text: String,
    /// Compared verbatim on delete. Never leaves the server.
    pub delete_password: String,
    pub reported: bool,
    pub created_on: DateTime<Utc>,
    /// Moves forward on every reply; drives listing order.
    pub bumped_on: DateTime<Utc>,
    /// Insertion-ordered. Deleted replies stay in place with blanked text.
    pub replies: Vec<Reply>,
}

impl Thread {
    /// Builds a fresh, unreported thread with no replies.
    pub fn new(board: impl Into<String>, text: String, delete_password: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            board: board.into(),
            text,
            delete_password,
            reported: false,
            created_on: now,
            bumped_on: now,
            replies: Vec::new(),
        }
    }

    pub fn reply(&self, reply_id: Uuid) -> Option<&Reply> {
        self.replies.iter().find(|r| r.id == reply_id)
    }

    pub fn reply_mut(&mut self, reply_id: Uuid) -> Option<&mut Reply> {
        self.replies.iter_mut().find(|r| r.id == reply_id)
    }

    /// Appends `reply` and bumps the thread to the reply's creation time.
    pub fn push_reply(&mut self, reply: Reply) {
        self.bumped_on = reply.created_on;
        self.replies.push(reply);
    }

    pub fn password_matches(&self, candidate: &str) -> bool {
        self.delete_password == candidate
    }
}

/// A child post embedded in a [`Thread`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub id: Uuid,
    pub text: String,
    pub delete_password: String,
    pub reported: bool,
    pub created_on: DateTime<Utc>,
}

impl Reply {
    pub fn new(text: String, delete_password: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            delete_password,
            reported: false,
            created_on: now,
        }
    }

    pub fn password_matches(&self, candidate: &str) -> bool {
        self.delete_password == candidate
    }

    pub fn apply(&mut self, patch: ReplyPatch) {
        match patch {
            ReplyPatch::Redact => self.text = DELETED_TEXT.to_string(),
            ReplyPatch::Report => self.reported = true,
        }
    }
}

/// The two in-place mutations a reply can undergo after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyPatch {
    /// Replace the text with [`DELETED_TEXT`].
    Redact,
    /// Flag for moderation.
    Report,
}

/// Validated input for creating a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewThread {
    pub text: String,
    pub delete_password: String,
}

/// Validated input for replying to a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReply {
    pub thread_id: String,
    pub text: String,
    pub delete_password: String,
}

/// Parses a client-supplied identifier. Anything that is not a UUID can
/// never match a stored document, so callers treat `None` as "no such thing".
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}
