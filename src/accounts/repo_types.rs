use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub mined_tokens: f64,
    pub mining_speed: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub last_active: OffsetDateTime,
}

/// Progress values reported by the client and stored as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MiningProgress {
    pub mined_tokens: f64,
    pub mining_speed: f64,
}

/// Row of the admin listing.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUser {
    pub email: String,
    pub mined_tokens: f64,
    pub mining_speed: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub last_active: OffsetDateTime,
}

impl From<&User> for ActiveUser {
    fn from(u: &User) -> Self {
        Self {
            email: u.email.clone(),
            mined_tokens: u.mined_tokens,
            mining_speed: u.mining_speed,
            last_active: u.last_active,
        }
    }
}

impl From<&User> for MiningProgress {
    fn from(u: &User) -> Self {
        Self {
            mined_tokens: u.mined_tokens,
            mining_speed: u.mining_speed,
        }
    }
}
