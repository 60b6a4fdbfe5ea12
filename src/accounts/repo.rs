use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::accounts::repo_types::{ActiveUser, MiningProgress, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("duplicate key value violates unique constraint: email `{0}` already exists")]
    DuplicateEmail(String),
}

/// Persistence seam for user accounts and their mining progress.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Insert a new account. The email must not already exist.
    async fn create(&self, email: &str, password_hash: &str) -> Result<(), StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Overwrite progress and bump `last_active`. Unknown ids are a no-op.
    async fn save_progress(&self, user_id: i64, progress: MiningProgress)
        -> Result<(), StoreError>;

    async fn progress(&self, user_id: i64) -> Result<Option<MiningProgress>, StoreError>;

    /// Every account, most recently active first.
    async fn active_users(&self) -> Result<Vec<ActiveUser>, StoreError>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn create(&self, email: &str, password_hash: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, mined_tokens, mining_speed, last_active
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn save_progress(
        &self,
        user_id: i64,
        progress: MiningProgress,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE users
            SET mined_tokens = $1, mining_speed = $2, last_active = NOW()
            WHERE id = $3
            "#,
        )
        .bind(progress.mined_tokens)
        .bind(progress.mining_speed)
        .bind(user_id)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn progress(&self, user_id: i64) -> Result<Option<MiningProgress>, StoreError> {
        let row = sqlx::query_as::<_, MiningProgress>(
            r#"
            SELECT mined_tokens, mining_speed
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn active_users(&self) -> Result<Vec<ActiveUser>, StoreError> {
        let rows = sqlx::query_as::<_, ActiveUser>(
            r#"
            SELECT email, mined_tokens, mining_speed, last_active
            FROM users
            ORDER BY last_active DESC, id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
