//! # Client-facing views
//!
//! Every response body is built from these whitelisting constructors, so a
//! field added to [`Thread`] or [`Reply`] stays private until it is listed here.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Reply, Thread, PREVIEW_REPLIES};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub text: String,
    pub created_on: DateTime<Utc>,
}

impl From<&Reply> for ReplyView {
    fn from(reply: &Reply) -> Self {
        Self {
            id: reply.id,
            text: reply.text.clone(),
            created_on: reply.created_on,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub text: String,
    pub created_on: DateTime<Utc>,
    pub bumped_on: DateTime<Utc>,
    pub replies: Vec<ReplyView>,
    /// Always the true length of the stored sequence, whatever `replies` holds.
    pub replycount: usize,
}

impl ThreadView {
    /// View with every reply, as returned by create, reply and view-thread.
    pub fn full(thread: &Thread) -> Self {
        Self::with_replies(thread, &thread.replies)
    }

    /// Board-listing view: only the most recent [`PREVIEW_REPLIES`] replies,
    /// still in chronological order.
    pub fn preview(thread: &Thread) -> Self {
        let skip = thread.replies.len().saturating_sub(PREVIEW_REPLIES);
        Self::with_replies(thread, &thread.replies[skip..])
    }

    fn with_replies(thread: &Thread, replies: &[Reply]) -> Self {
        Self {
            id: thread.id,
            text: thread.text.clone(),
            created_on: thread.created_on,
            bumped_on: thread.bumped_on,
            replies: replies.iter().map(ReplyView::from).collect(),
            replycount: thread.replies.len(),
        }
    }
}
