use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::accounts::{password::PasswordError, repo::StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Payload for envelopes that carry nothing besides status and message.
#[derive(Debug, Default, Serialize)]
pub struct Empty {}

/// Uniform response wrapper shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize = Empty> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub payload: T,
}

impl Envelope<Empty> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: Some(message.into()),
            payload: Empty {},
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: Some(message.into()),
            payload: Empty {},
        }
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn success(payload: T) -> Self {
        Self {
            status: Status::Success,
            message: None,
            payload,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("User not found")]
    UserNotFound,
    #[error("Wrong password")]
    WrongPassword,
    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

// Failures still answer 200; clients read `status` instead of the HTTP code.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Validation(msg) => warn!(reason = %msg, "request rejected"),
            ApiError::UserNotFound | ApiError::WrongPassword => {
                warn!(reason = %self, "request rejected")
            }
            ApiError::Store(e) => error!(error = %e, "store error"),
            ApiError::Password(e) => error!(error = %e, "password hashing error"),
        }
        Envelope::error(self.to_string()).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
