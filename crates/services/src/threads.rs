use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use domains::{
    parse_id, BoardError, NewReply, NewThread, Reply, ReplyPatch, Result, Thread, ThreadRepository,
    LIST_LIMIT,
};
use tracing::{debug, info};

/// Thread and reply use cases. Cheap to clone; the store handle is shared.
#[derive(Clone)]
pub struct ThreadService {
    repo: Arc<dyn ThreadRepository>,
}

/// Microsecond precision: the finest a timestamp survives in any store.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

impl ThreadService {
    pub fn new(repo: Arc<dyn ThreadRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_thread(&self, board: &str, cmd: NewThread) -> Result<Thread> {
        let thread = Thread::new(board, cmd.text, cmd.delete_password, now());
        self.repo.insert_thread(&thread).await?;
        info!(board, thread_id = %thread.id, "thread created");
        Ok(thread)
    }

    /// The [`LIST_LIMIT`] most recently bumped threads of `board`.
    pub async fn list_threads(&self, board: &str) -> Result<Vec<Thread>> {
        Ok(self.repo.list_threads(board, LIST_LIMIT).await?)
    }

    pub async fn view_thread(&self, board: &str, thread_id: &str) -> Result<Thread> {
        self.find(board, thread_id)
            .await?
            .ok_or(BoardError::THREAD_NOT_FOUND)
    }

    /// Unknown thread and wrong password are indistinguishable to the caller.
    pub async fn delete_thread(&self, board: &str, thread_id: &str, password: &str) -> Result<()> {
        let thread = match self.find(board, thread_id).await? {
            Some(thread) => thread,
            None => {
                debug!(board, thread_id, "delete of unknown thread");
                return Err(BoardError::IncorrectPassword);
            }
        };
        if !thread.password_matches(password) {
            debug!(board, thread_id, "thread delete password mismatch");
            return Err(BoardError::IncorrectPassword);
        }

        // A concurrent delete may have won; the outcome is the same.
        self.repo.delete_thread(board, thread.id).await?;
        info!(board, thread_id = %thread.id, "thread deleted");
        Ok(())
    }

    /// Open to anyone; repeated reports are harmless.
    pub async fn report_thread(&self, board: &str, thread_id: &str) -> Result<()> {
        let id = parse_id(thread_id).ok_or(BoardError::THREAD_NOT_FOUND)?;
        if !self.repo.mark_thread_reported(board, id).await? {
            return Err(BoardError::THREAD_NOT_FOUND);
        }
        info!(board, thread_id = %id, "thread reported");
        Ok(())
    }

    /// Appends a reply and bumps the thread in a single store write.
    pub async fn create_reply(&self, board: &str, cmd: NewReply) -> Result<Thread> {
        let id = parse_id(&cmd.thread_id).ok_or(BoardError::THREAD_NOT_FOUND)?;
        let reply = Reply::new(cmd.text, cmd.delete_password, now());
        let thread = self
            .repo
            .append_reply(board, id, &reply)
            .await?
            .ok_or(BoardError::THREAD_NOT_FOUND)?;
        info!(board, thread_id = %id, reply_id = %reply.id, "reply created");
        Ok(thread)
    }

    /// Blanks the reply's text. Unknown thread, unknown reply and wrong
    /// password all come back as [`BoardError::IncorrectPassword`].
    pub async fn delete_reply(
        &self,
        board: &str,
        thread_id: &str,
        reply_id: &str,
        password: &str,
    ) -> Result<()> {
        let Some(thread) = self.find(board, thread_id).await? else {
            debug!(board, thread_id, "reply delete on unknown thread");
            return Err(BoardError::IncorrectPassword);
        };
        let Some(reply) = parse_id(reply_id).and_then(|id| thread.reply(id)) else {
            debug!(board, thread_id, reply_id, "delete of unknown reply");
            return Err(BoardError::IncorrectPassword);
        };
        if !reply.password_matches(password) {
            debug!(board, thread_id, reply_id, "reply delete password mismatch");
            return Err(BoardError::IncorrectPassword);
        }

        // Thread deleted in between: treat like any other miss.
        if !self
            .repo
            .patch_reply(board, thread.id, reply.id, ReplyPatch::Redact)
            .await?
        {
            return Err(BoardError::IncorrectPassword);
        }
        info!(board, thread_id = %thread.id, reply_id = %reply.id, "reply deleted");
        Ok(())
    }

    /// Unlike deletes, reports tell missing threads and missing replies apart.
    pub async fn report_reply(&self, board: &str, thread_id: &str, reply_id: &str) -> Result<()> {
        let thread = self
            .find(board, thread_id)
            .await?
            .ok_or(BoardError::THREAD_NOT_FOUND)?;
        let reply_id = parse_id(reply_id)
            .filter(|id| thread.reply(*id).is_some())
            .ok_or(BoardError::REPLY_NOT_FOUND)?;

        if !self
            .repo
            .patch_reply(board, thread.id, reply_id, ReplyPatch::Report)
            .await?
        {
            return Err(BoardError::THREAD_NOT_FOUND);
        }
        info!(board, thread_id = %thread.id, reply_id = %reply_id, "reply reported");
        Ok(())
    }

    async fn find(&self, board: &str, thread_id: &str) -> Result<Option<Thread>> {
        let Some(id) = parse_id(thread_id) else {
            return Ok(None);
        };
        Ok(self.repo.find_thread(board, id).await?)
    }
}
