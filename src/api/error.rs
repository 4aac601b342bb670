use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use crate::services::{AuthError, IngestError, UserError};

/// Error envelope: `{code, message}` with the taxonomy code in the body.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub code: u16,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    Auth(AuthError),

    User(UserError),

    Ingest(IngestError),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Auth(err) => write!(f, "{}", err),
            ApiError::User(err) => write!(f, "{}", err),
            ApiError::Ingest(err) => write!(f, "{}", err),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        Self::User(err)
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        Self::Ingest(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Auth(err) => match err {
                AuthError::CredentialsMissing => {
                    (StatusCode::BAD_REQUEST, err.code(), err.to_string())
                }
                AuthError::UserNotFound
                | AuthError::TokenInvalid
                | AuthError::UserInactive
                | AuthError::AccountExpired => {
                    (StatusCode::UNAUTHORIZED, err.code(), err.to_string())
                }
                AuthError::Database(detail) | AuthError::Internal(detail) => {
                    tracing::error!("Unhandled auth failure: {}", detail);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        err.code(),
                        "Internal Server Error".to_string(),
                    )
                }
            },
            ApiError::User(err) => match err {
                UserError::NotFound => (StatusCode::NOT_FOUND, err.code(), err.to_string()),
                UserError::UsernameDuplicate | UserError::UniqueConflict => {
                    (StatusCode::CONFLICT, err.code(), err.to_string())
                }
                UserError::RankTooLong | UserError::NameTooLong | UserError::UsernameTooLong => {
                    (StatusCode::BAD_REQUEST, err.code(), err.to_string())
                }
                UserError::CreateFailed(detail) => {
                    tracing::error!("User create failed: {}", detail);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        err.code(),
                        "用户添加失败".to_string(),
                    )
                }
                UserError::Database(detail) => {
                    tracing::error!("Unhandled store failure: {}", detail);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        err.code(),
                        "Internal Server Error".to_string(),
                    )
                }
            },
            ApiError::Ingest(err) => match err {
                IngestError::VectorDisabled | IngestError::LlmDisabled => {
                    (StatusCode::SERVICE_UNAVAILABLE, err.code(), err.to_string())
                }
                other => {
                    tracing::error!("Ingestion failure: {}", other);
                    (StatusCode::BAD_GATEWAY, other.code(), other.to_string())
                }
            },
            ApiError::InternalError(detail) => {
                tracing::error!("Unhandled error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    999,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = ErrorEnvelope { code, message };
        (status, Json(body)).into_response()
    }
}
