//! Populates a board with a few demo threads and replies.
//!
//! Usage: `seed [board]` (default board: `general`). Uses the same
//! configuration as the server; without a database URL it only exercises the
//! in-memory store and prints what it created.

use std::sync::Arc;

use anyhow::Context;
use configs::Settings;
use domains::{NewReply, NewThread, ThreadRepository};
use services::ThreadService;
use storage_adapters::InMemoryThreadRepository;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "db-postgres")]
use secrecy::ExposeSecret;

const DEMO_THREADS: &[(&str, &[&str])] = &[
    ("Welcome to the board. Be nice.", &["hello", "hi there"]),
    ("Post your setup", &["tiling wm", "stock everything", "a potato", "two potatoes"]),
    ("Quiet thread", &[]),
];

const DEMO_PASSWORD: &str = "seed";

#[cfg(feature = "db-postgres")]
async fn repository(settings: &Settings) -> anyhow::Result<Arc<dyn ThreadRepository>> {
    let Some(url) = &settings.database.url else {
        return Ok(in_memory());
    };
    let repo = storage_adapters::PgThreadRepository::connect(
        url.expose_secret(),
        settings.database.max_connections,
    )
    .await
    .context("connecting to the database")?;
    repo.migrate().await.context("running migrations")?;
    Ok(Arc::new(repo))
}

#[cfg(not(feature = "db-postgres"))]
async fn repository(_settings: &Settings) -> anyhow::Result<Arc<dyn ThreadRepository>> {
    Ok(in_memory())
}

fn in_memory() -> Arc<dyn ThreadRepository> {
    warn!("no database configured; seeding an in-memory store");
    Arc::new(InMemoryThreadRepository::new())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let board = std::env::args().nth(1).unwrap_or_else(|| "general".to_string());
    if let Err(err) = configs::load_dotenv() {
        warn!(error = %err, "ignoring unreadable .env file");
    }
    let settings = Settings::load().context("loading configuration")?;
    let service = ThreadService::new(repository(&settings).await?);

    for (text, replies) in DEMO_THREADS {
        let thread = service
            .create_thread(
                &board,
                NewThread {
                    text: text.to_string(),
                    delete_password: DEMO_PASSWORD.to_string(),
                },
            )
            .await?;

        for reply in replies.iter() {
            service
                .create_reply(
                    &board,
                    NewReply {
                        thread_id: thread.id.to_string(),
                        text: reply.to_string(),
                        delete_password: DEMO_PASSWORD.to_string(),
                    },
                )
                .await?;
        }
        info!(%board, thread_id = %thread.id, replies = replies.len(), "seeded thread");
    }

    let listed = service.list_threads(&board).await?;
    println!("/{board}/ now lists {} threads", listed.len());
    Ok(())
}
