use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{debug, info, instrument};

use crate::{
    accounts::repo_types::MiningProgress,
    error::{ApiError, ApiResult, Envelope},
    mining::dto::{GetMiningRequest, MiningData, SaveMiningRequest},
    state::AppState,
};

pub fn mining_routes() -> Router<AppState> {
    Router::new()
        .route("/saveMining", post(save_mining))
        .route("/getMining", post(get_mining))
}

/// Token counts and speeds must be finite and non-negative. There is no
/// monotonicity check against the stored value.
fn validated_progress(req: &SaveMiningRequest) -> ApiResult<(i64, MiningProgress)> {
    let (Some(user_id), Some(mined_tokens), Some(mining_speed)) =
        (req.user_id, req.mined_tokens, req.mining_speed)
    else {
        return Err(ApiError::validation(
            "userId, minedTokens and miningSpeed are required",
        ));
    };
    if !mined_tokens.is_finite() || mined_tokens < 0.0 {
        return Err(ApiError::validation("minedTokens must be a non-negative number"));
    }
    if !mining_speed.is_finite() || mining_speed < 0.0 {
        return Err(ApiError::validation("miningSpeed must be a non-negative number"));
    }
    Ok((
        user_id,
        MiningProgress {
            mined_tokens,
            mining_speed,
        },
    ))
}

#[instrument(skip(state, payload))]
pub async fn save_mining(
    State(state): State<AppState>,
    payload: Result<Json<SaveMiningRequest>, JsonRejection>,
) -> ApiResult<Envelope> {
    let Json(payload) = payload?;
    let (user_id, progress) = validated_progress(&payload)?;

    // last write wins; concurrent saves for one user are not serialized
    state.users.save_progress(user_id, progress).await?;

    info!(
        user_id,
        mined_tokens = progress.mined_tokens,
        mining_speed = progress.mining_speed,
        "mining progress saved"
    );
    Ok(Envelope::message("Mining data saved"))
}

#[instrument(skip(state, payload))]
pub async fn get_mining(
    State(state): State<AppState>,
    payload: Result<Json<GetMiningRequest>, JsonRejection>,
) -> ApiResult<Envelope<MiningData>> {
    let Json(payload) = payload?;
    let user_id = payload
        .user_id
        .ok_or_else(|| ApiError::validation("userId is required"))?;

    let data = state.users.progress(user_id).await?;
    debug!(user_id, found = data.is_some(), "mining progress fetched");
    Ok(Envelope::success(MiningData { data }))
}
