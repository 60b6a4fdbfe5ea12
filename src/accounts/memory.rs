use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::accounts::repo::{StoreError, UserRepo};
use crate::accounts::repo_types::{ActiveUser, MiningProgress, User};

/// Volatile `UserRepo` with the same semantics as the `users` table.
#[derive(Default)]
pub struct MemoryUserRepo {
    users: RwLock<Vec<User>>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn create(&self, email: &str, password_hash: &str) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail(email.to_string()));
        }
        let id = users.last().map_or(1, |u| u.id + 1);
        users.push(User {
            id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            mined_tokens: 0.0,
            mining_speed: 1.0,
            last_active: OffsetDateTime::now_utc(),
        });
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn save_progress(
        &self,
        user_id: i64,
        progress: MiningProgress,
    ) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.mined_tokens = progress.mined_tokens;
            user.mining_speed = progress.mining_speed;
            user.last_active = OffsetDateTime::now_utc();
        }
        Ok(())
    }

    async fn progress(&self, user_id: i64) -> Result<Option<MiningProgress>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.id == user_id)
            .map(MiningProgress::from))
    }

    async fn active_users(&self) -> Result<Vec<ActiveUser>, StoreError> {
        let users = self.users.read().await;
        let mut sorted: Vec<&User> = users.iter().collect();
        sorted.sort_by(|a, b| {
            b.last_active
                .cmp(&a.last_active)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(sorted.into_iter().map(ActiveUser::from).collect())
    }
}
