use axum::{extract::State, routing::get, Router};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    accounts::repo_types::ActiveUser,
    error::{ApiResult, Envelope},
    state::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUsers {
    pub total_users: usize,
    pub users: Vec<ActiveUser>,
}

// No authentication gate: any caller may list accounts.
pub fn router() -> Router<AppState> {
    Router::new().route("/admin/activeUsers", get(active_users))
}

#[instrument(skip(state))]
pub async fn active_users(State(state): State<AppState>) -> ApiResult<Envelope<ActiveUsers>> {
    let users = state.users.active_users().await?;
    debug!(total = users.len(), "listed active users");
    Ok(Envelope::success(ActiveUsers {
        total_users: users.len(),
        users,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn active_users_serialization() {
        let payload = ActiveUsers {
            total_users: 1,
            users: vec![ActiveUser {
                email: "miner@example.com".into(),
                mined_tokens: 12.0,
                mining_speed: 2.0,
                last_active: datetime!(2026-01-02 03:04:05 UTC),
            }],
        };
        let json = serde_json::to_value(Envelope::success(payload)).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["totalUsers"], 1);
        assert_eq!(json["users"][0]["email"], "miner@example.com");
        assert_eq!(json["users"][0]["minedTokens"], 12.0);
        assert_eq!(json["users"][0]["miningSpeed"], 2.0);
        assert_eq!(json["users"][0]["lastActive"], "2026-01-02T03:04:05Z");
    }
}
