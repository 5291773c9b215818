//! # PostgreSQL document store
//!
//! Threads are rows; their replies stay embedded as a JSONB array so a thread
//! is still read and written as one document. Reply insertion and reply
//! patches are single `UPDATE` statements, never read-modify-write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{Reply, ReplyPatch, StoreError, Thread, ThreadRepository, DELETED_TEXT};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use uuid::Uuid;

const THREAD_COLUMNS: &str =
    "id, board, text, delete_password, reported, created_on, bumped_on, replies";

pub struct PgThreadRepository {
    pool: PgPool,
}

/// Row shape of the `threads` table.
#[derive(sqlx::FromRow)]
struct ThreadRow {
    id: Uuid,
    board: String,
    text: String,
    delete_password: String,
    reported: bool,
    created_on: DateTime<Utc>,
    bumped_on: DateTime<Utc>,
    replies: Json<Vec<Reply>>,
}

impl From<ThreadRow> for Thread {
    fn from(row: ThreadRow) -> Self {
        Thread {
            id: row.id,
            board: row.board,
            text: row.text,
            delete_password: row.delete_password,
            reported: row.reported,
            created_on: row.created_on,
            bumped_on: row.bumped_on,
            replies: row.replies.0,
        }
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

impl PgThreadRepository {
    /// Opens a pool against `url`. Nothing is queried until first use.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(backend)?;
        Ok(Self { pool })
    }

    /// Applies the embedded migrations in `migrations/`.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    /// Waits for checked-out connections and closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Rewrites one element of `replies` in place, matched by its `id`.
    /// `WITH ORDINALITY` keeps the array order intact.
    async fn set_reply_field(
        &self,
        board: &str,
        thread_id: Uuid,
        reply_id: Uuid,
        field: &str,
        value: serde_json::Value,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE threads SET replies = (
                 SELECT jsonb_agg(
                     CASE WHEN elem->>'id' = $3 THEN jsonb_set(elem, ARRAY[$4], $5) ELSE elem END
                     ORDER BY pos)
                 FROM jsonb_array_elements(replies) WITH ORDINALITY AS e(elem, pos))
             WHERE id = $1 AND board = $2
               AND replies @> jsonb_build_array(jsonb_build_object('id', $3::text))",
        )
        .bind(thread_id)
        .bind(board)
        .bind(reply_id.to_string())
        .bind(field)
        .bind(Json(value))
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl ThreadRepository for PgThreadRepository {
    async fn insert_thread(&self, thread: &Thread) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO threads (id, board, text, delete_password, reported, created_on, bumped_on, replies)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(thread.id)
        .bind(&thread.board)
        .bind(&thread.text)
        .bind(&thread.delete_password)
        .bind(thread.reported)
        .bind(thread.created_on)
        .bind(thread.bumped_on)
        .bind(Json(&thread.replies))
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn find_thread(&self, board: &str, id: Uuid) -> Result<Option<Thread>, StoreError> {
        let row: Option<ThreadRow> = sqlx::query_as(&format!(
            "SELECT {THREAD_COLUMNS} FROM threads WHERE id = $1 AND board = $2"
        ))
        .bind(id)
        .bind(board)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.map(Thread::from))
    }

    async fn list_threads(&self, board: &str, limit: usize) -> Result<Vec<Thread>, StoreError> {
        let rows: Vec<ThreadRow> = sqlx::query_as(&format!(
            "SELECT {THREAD_COLUMNS} FROM threads WHERE board = $1 ORDER BY bumped_on DESC LIMIT $2"
        ))
        .bind(board)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows.into_iter().map(Thread::from).collect())
    }

    async fn delete_thread(&self, board: &str, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM threads WHERE id = $1 AND board = $2")
            .bind(id)
            .bind(board)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected() == 1)
    }

    async fn mark_thread_reported(&self, board: &str, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE threads SET reported = TRUE WHERE id = $1 AND board = $2")
            .bind(id)
            .bind(board)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected() == 1)
    }

    /// Push and bump in one statement; concurrent replies cannot overwrite
    /// each other.
    async fn append_reply(
        &self,
        board: &str,
        thread_id: Uuid,
        reply: &Reply,
    ) -> Result<Option<Thread>, StoreError> {
        let row: Option<ThreadRow> = sqlx::query_as(&format!(
            "UPDATE threads
             SET replies = replies || jsonb_build_array($3::jsonb), bumped_on = $4
             WHERE id = $1 AND board = $2
             RETURNING {THREAD_COLUMNS}"
        ))
        .bind(thread_id)
        .bind(board)
        .bind(Json(reply))
        .bind(reply.created_on)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.map(Thread::from))
    }

    async fn patch_reply(
        &self,
        board: &str,
        thread_id: Uuid,
        reply_id: Uuid,
        patch: ReplyPatch,
    ) -> Result<bool, StoreError> {
        let (field, value) = match patch {
            ReplyPatch::Redact => ("text", serde_json::Value::from(DELETED_TEXT)),
            ReplyPatch::Report => ("reported", serde_json::Value::Bool(true)),
        };
        self.set_reply_field(board, thread_id, reply_id, field, value).await
    }
}
