//! # anonboard binary
//!
//! The entry point that assembles the server: configuration, logging, store,
//! router. The store is opened before the listener binds and closed after the
//! last in-flight request finishes.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::handlers::AppState;
use api_adapters::{app, Assets};
use configs::{LogSettings, Settings};
use domains::ThreadRepository;
use services::ThreadService;
use storage_adapters::InMemoryThreadRepository;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "db-postgres")]
use secrecy::ExposeSecret;
#[cfg(feature = "db-postgres")]
use storage_adapters::PgThreadRepository;

/// The concrete store behind the `ThreadRepository` handed to the service.
enum Store {
    Memory(Arc<InMemoryThreadRepository>),
    #[cfg(feature = "db-postgres")]
    Postgres(Arc<PgThreadRepository>),
}

impl Store {
    async fn open(settings: &Settings) -> anyhow::Result<Self> {
        if let Some(store) = open_postgres(settings).await? {
            return Ok(store);
        }
        warn!("no database configured; threads live in memory and vanish on restart");
        Ok(Store::Memory(Arc::new(InMemoryThreadRepository::new())))
    }

    fn repository(&self) -> Arc<dyn ThreadRepository> {
        match self {
            Store::Memory(repo) => repo.clone() as Arc<dyn ThreadRepository>,
            #[cfg(feature = "db-postgres")]
            Store::Postgres(repo) => repo.clone() as Arc<dyn ThreadRepository>,
        }
    }

    async fn close(&self) {
        match self {
            Store::Memory(repo) => info!(threads = repo.len(), "dropping in-memory store"),
            #[cfg(feature = "db-postgres")]
            Store::Postgres(repo) => repo.close().await,
        }
    }
}

#[cfg(feature = "db-postgres")]
async fn open_postgres(settings: &Settings) -> anyhow::Result<Option<Store>> {
    let Some(url) = &settings.database.url else {
        return Ok(None);
    };
    let repo = PgThreadRepository::connect(url.expose_secret(), settings.database.max_connections)
        .await
        .context("connecting to the database")?;
    repo.migrate().await.context("running migrations")?;
    info!("connected to PostgreSQL");
    Ok(Some(Store::Postgres(Arc::new(repo))))
}

#[cfg(not(feature = "db-postgres"))]
async fn open_postgres(settings: &Settings) -> anyhow::Result<Option<Store>> {
    if settings.database.url.is_some() {
        warn!("database.url is set but this build lacks db-postgres; ignoring it");
    }
    Ok(None)
}

fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = configs::load_dotenv();
    let settings = Settings::load().context("loading configuration")?;
    init_tracing(&settings.log);
    if let Err(err) = dotenv {
        warn!(error = %err, "ignoring unreadable .env file");
    }

    let store = Store::open(&settings).await?;
    let state = AppState::new(ThreadService::new(store.repository()));
    let assets = Assets {
        public_dir: settings.assets.public_dir.clone(),
        index_file: settings.assets.index_file.clone(),
    };

    let addr = settings.listen_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "anonboard listening");

    axum::serve(listener, app(state, &assets))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    info!("shutdown complete");
    Ok(())
}
