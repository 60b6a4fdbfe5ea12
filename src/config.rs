use std::str::FromStr;

use anyhow::Context;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::simulator::countdown::DEFAULT_TARGET;

/// Which `UserRepo` implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => anyhow::bail!("unknown STORE_BACKEND `{other}` (expected postgres or memory)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    /// Only present when `store` is `Postgres`.
    pub database: Option<DatabaseConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let store = match std::env::var("STORE_BACKEND") {
            Ok(v) => v.parse()?,
            Err(_) => StoreBackend::Postgres,
        };

        let database = match store {
            StoreBackend::Postgres => Some(DatabaseConfig {
                url: std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse::<u32>().ok())
                    .unwrap_or(10),
            }),
            StoreBackend::Memory => None,
        };

        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);

        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            store,
            database,
        })
    }

    /// Config for tests and local demos: in-memory store, ephemeral port.
    pub fn in_memory() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            store: StoreBackend::Memory,
            database: None,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Settings for the `miner` terminal client.
#[derive(Debug, Clone)]
pub struct MinerConfig {
    pub countdown_target: OffsetDateTime,
}

impl MinerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let countdown_target = match std::env::var("MINER_COUNTDOWN_TARGET") {
            Ok(raw) => parse_target(&raw)?,
            Err(_) => DEFAULT_TARGET,
        };
        Ok(Self { countdown_target })
    }
}

fn parse_target(raw: &str) -> anyhow::Result<OffsetDateTime> {
    OffsetDateTime::parse(raw.trim(), &Rfc3339)
        .with_context(|| format!("MINER_COUNTDOWN_TARGET `{raw}` is not an RFC 3339 timestamp"))
}
