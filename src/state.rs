use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::accounts::memory::MemoryUserRepo;
use crate::accounts::repo::{PgUserRepo, UserRepo};
use crate::config::{AppConfig, StoreBackend};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepo>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let users: Arc<dyn UserRepo> = match (config.store, &config.database) {
            (StoreBackend::Postgres, Some(database)) => {
                let db = PgPoolOptions::new()
                    .max_connections(database.max_connections)
                    .connect(&database.url)
                    .await
                    .context("connect to database")?;

                sqlx::migrate!("./migrations")
                    .run(&db)
                    .await
                    .context("run migrations")?;

                tracing::info!(max_connections = database.max_connections, "postgres store ready");
                Arc::new(PgUserRepo::new(db))
            }
            (StoreBackend::Postgres, None) => {
                anyhow::bail!("postgres store selected without database settings")
            }
            (StoreBackend::Memory, _) => {
                tracing::warn!("using in-memory store; accounts are lost on restart");
                Arc::new(MemoryUserRepo::new())
            }
        };

        Ok(Self::from_parts(users, Arc::new(config)))
    }

    pub fn from_parts(users: Arc<dyn UserRepo>, config: Arc<AppConfig>) -> Self {
        Self { users, config }
    }

    /// State over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::from_parts(
            Arc::new(MemoryUserRepo::new()),
            Arc::new(AppConfig::in_memory()),
        )
    }
}
