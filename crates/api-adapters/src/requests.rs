//! Request bodies and query strings, plus the required-field checks that turn
//! them into service commands.
//!
//! Every field is optional at the wire level so a missing field becomes a
//! `400` with the right reason instead of a decoding error.

use domains::{BoardError, NewReply, NewThread};
use serde::Deserialize;

/// An absent field and an empty one are the same thing.
fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateThreadRequest {
    pub text: Option<String>,
    pub delete_password: Option<String>,
}

impl CreateThreadRequest {
    pub fn validate(self) -> Result<NewThread, BoardError> {
        match (present(self.text), present(self.delete_password)) {
            (Some(text), Some(delete_password)) => Ok(NewThread { text, delete_password }),
            _ => Err(BoardError::MISSING_FIELDS),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteThreadRequest {
    pub thread_id: Option<String>,
    pub delete_password: Option<String>,
}

impl DeleteThreadRequest {
    /// `(thread_id, delete_password)`
    pub fn validate(self) -> Result<(String, String), BoardError> {
        match (present(self.thread_id), present(self.delete_password)) {
            (Some(thread_id), Some(password)) => Ok((thread_id, password)),
            _ => Err(BoardError::MISSING_FIELDS),
        }
    }
}

/// Body of `PUT /api/threads/{board}`, and query of `GET /api/replies/{board}`.
#[derive(Debug, Default, Deserialize)]
pub struct ThreadIdRequest {
    pub thread_id: Option<String>,
}

impl ThreadIdRequest {
    pub fn validate(self) -> Result<String, BoardError> {
        present(self.thread_id).ok_or(BoardError::MISSING_THREAD_ID)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateReplyRequest {
    pub thread_id: Option<String>,
    pub text: Option<String>,
    pub delete_password: Option<String>,
}

impl CreateReplyRequest {
    pub fn validate(self) -> Result<NewReply, BoardError> {
        match (
            present(self.thread_id),
            present(self.text),
            present(self.delete_password),
        ) {
            (Some(thread_id), Some(text), Some(delete_password)) => Ok(NewReply {
                thread_id,
                text,
                delete_password,
            }),
            _ => Err(BoardError::MISSING_FIELDS),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteReplyRequest {
    pub thread_id: Option<String>,
    pub reply_id: Option<String>,
    pub delete_password: Option<String>,
}

impl DeleteReplyRequest {
    /// `(thread_id, reply_id, delete_password)`
    pub fn validate(self) -> Result<(String, String, String), BoardError> {
        match (
            present(self.thread_id),
            present(self.reply_id),
            present(self.delete_password),
        ) {
            (Some(thread_id), Some(reply_id), Some(password)) => Ok((thread_id, reply_id, password)),
            _ => Err(BoardError::MISSING_FIELDS),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportReplyRequest {
    pub thread_id: Option<String>,
    pub reply_id: Option<String>,
}

impl ReportReplyRequest {
    /// `(thread_id, reply_id)`
    pub fn validate(self) -> Result<(String, String), BoardError> {
        match (present(self.thread_id), present(self.reply_id)) {
            (Some(thread_id), Some(reply_id)) => Ok((thread_id, reply_id)),
            _ => Err(BoardError::MISSING_FIELDS),
        }
    }
}
