use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    accounts::{
        dto::{CredentialsRequest, LoginResponse},
        password::{hash_password, verify_password},
    },
    error::{ApiError, ApiResult, Envelope},
    state::AppState,
};

const MISSING_CREDENTIALS: &str = "Email and password are required";

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<Envelope> {
    let Json(payload) = payload?;
    let (email, password) = payload
        .into_parts()
        .ok_or_else(|| ApiError::validation(MISSING_CREDENTIALS))?;

    let hash = hash_password(&password)?;
    state.users.create(&email, &hash).await?;

    info!(email = %email, "user registered");
    Ok(Envelope::message("User registered successfully"))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<Envelope<LoginResponse>> {
    let Json(payload) = payload?;
    let (email, password) = payload
        .into_parts()
        .ok_or_else(|| ApiError::validation(MISSING_CREDENTIALS))?;

    let user = match state.users.find_by_email(&email).await? {
        Some(u) => u,
        None => {
            warn!(email = %email, "login unknown email");
            return Err(ApiError::UserNotFound);
        }
    };

    if !verify_password(&password, &user.password_hash)? {
        warn!(email = %email, user_id = user.id, "login invalid password");
        return Err(ApiError::WrongPassword);
    }

    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(Envelope::success(LoginResponse { user_id: user.id }).with_message("Login successful"))
}
