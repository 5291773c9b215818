//! In-process implementation of `ThreadRepository`.
//!
//! Each thread document lives in one `DashMap` entry, so every mutation runs
//! under that entry's write guard and is atomic per document.

use async_trait::async_trait;
use dashmap::DashMap;
use domains::{Reply, ReplyPatch, StoreError, Thread, ThreadRepository};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryThreadRepository {
    threads: DashMap<Uuid, Thread>,
}

impl InMemoryThreadRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }
}

#[async_trait]
impl ThreadRepository for InMemoryThreadRepository {
    async fn insert_thread(&self, thread: &Thread) -> Result<(), StoreError> {
        self.threads.insert(thread.id, thread.clone());
        Ok(())
    }

    async fn find_thread(&self, board: &str, id: Uuid) -> Result<Option<Thread>, StoreError> {
        Ok(self
            .threads
            .get(&id)
            .filter(|t| t.board == board)
            .map(|t| t.value().clone()))
    }

    async fn list_threads(&self, board: &str, limit: usize) -> Result<Vec<Thread>, StoreError> {
        let mut threads: Vec<Thread> = self
            .threads
            .iter()
            .filter(|t| t.board == board)
            .map(|t| t.value().clone())
            .collect();
        threads.sort_by(|a, b| b.bumped_on.cmp(&a.bumped_on));
        threads.truncate(limit);
        Ok(threads)
    }

    async fn delete_thread(&self, board: &str, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.threads.remove_if(&id, |_, t| t.board == board).is_some())
    }

    async fn mark_thread_reported(&self, board: &str, id: Uuid) -> Result<bool, StoreError> {
        match self.threads.get_mut(&id) {
            Some(mut thread) if thread.board == board => {
                thread.reported = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn append_reply(
        &self,
        board: &str,
        thread_id: Uuid,
        reply: &Reply,
    ) -> Result<Option<Thread>, StoreError> {
        match self.threads.get_mut(&thread_id) {
            Some(mut thread) if thread.board == board => {
                thread.push_reply(reply.clone());
                Ok(Some(thread.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn patch_reply(
        &self,
        board: &str,
        thread_id: Uuid,
        reply_id: Uuid,
        patch: ReplyPatch,
    ) -> Result<bool, StoreError> {
        let Some(mut thread) = self.threads.get_mut(&thread_id) else {
            return Ok(false);
        };
        if thread.board != board {
            return Ok(false);
        }
        match thread.reply_mut(reply_id) {
            Some(reply) => {
                reply.apply(patch);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
