use serde::{Deserialize, Serialize};

use crate::accounts::repo_types::MiningProgress;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMiningRequest {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub mined_tokens: Option<f64>,
    #[serde(default)]
    pub mining_speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMiningRequest {
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// `data` is `null` when the id matches no account.
#[derive(Debug, Serialize)]
pub struct MiningData {
    pub data: Option<MiningProgress>,
}
