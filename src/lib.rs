pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod exercises;
pub mod middleware;
pub mod models;
pub mod redis_client;
pub mod services;
pub mod sessions;
pub mod store;
pub mod views;

use anyhow::Context;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use config::{Config, StorageBackend};
use sessions::{MemorySessionStore, RedisSessionStore, SessionStore};
use store::{MemoryRepository, PgRepository, Repository};

// Shared state for every request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Repository>,
    pub sessions: Arc<dyn SessionStore>,
    pub config: Config,
}

impl AppState {
    /// Connects the configured backends, running migrations on Postgres.
    pub async fn new(config: Config) -> anyhow::Result<Arc<Self>> {
        match config.storage.backend {
            StorageBackend::Memory => Ok(Self::in_memory(config)),
            StorageBackend::Postgres => {
                let database_url = config
                    .database
                    .url
                    .as_deref()
                    .context("DATABASE_URL is required for the postgres backend")?;
                let db = database::Database::new(database_url, config.database.pool_size)
                    .await
                    .context("failed to connect to database")?;
                info!("Database connected");
                db.run_migrations().await.context("failed to run migrations")?;

                let redis_url = config
                    .redis
                    .url
                    .as_deref()
                    .context("REDIS_URL is required for the postgres backend")?;
                let redis = redis_client::RedisClient::new(redis_url)
                    .await
                    .context("failed to connect to Redis")?;
                info!("Redis connected");

                let ttl = config.auth.session_ttl_seconds;
                Ok(Arc::new(Self {
                    store: Arc::new(PgRepository::new(db)),
                    sessions: Arc::new(RedisSessionStore::new(redis, ttl)),
                    config,
                }))
            }
        }
    }

    /// Process-local state; records and sessions vanish with the process.
    pub fn in_memory(config: Config) -> Arc<Self> {
        let ttl = config.auth.session_ttl_seconds;
        Arc::new(Self {
            store: Arc::new(MemoryRepository::new()),
            sessions: Arc::new(MemorySessionStore::new(ttl)),
            config,
        })
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
