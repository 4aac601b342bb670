//! Domain service for authentication and session resolution.
//!
//! Owns the login transaction and the bearer-token identity resolution used
//! by the authenticated-route middleware.

use serde::Serialize;
use thiserror::Error;

use crate::entities::users;

/// Errors specific to authentication operations. Each kind carries the
/// numeric code surfaced in the error envelope.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password empty; raised before any store access.
    #[error("用户账号或者密码为空，请检查填写内容")]
    CredentialsMissing,

    /// No active record matched username + digest, or no record matched the
    /// token subject. Wrong password and unknown user are indistinguishable.
    #[error("没有找到用户信息")]
    UserNotFound,

    /// Signature, format or expiry failure on decode, or missing subject.
    #[error("Token中包含的用户信息异常，请检查token生成流程")]
    TokenInvalid,

    /// The resolved record's status is not active.
    #[error("当前用户账户状态处于未启用状态")]
    UserInactive,

    /// The account's expiry timestamp has passed.
    #[error("用户账号已过期")]
    AccountExpired,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Taxonomy code carried in the error envelope.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::CredentialsMissing => 601,
            Self::UserNotFound => 602,
            Self::TokenInvalid => 603,
            Self::UserInactive => 604,
            Self::AccountExpired => 605,
            Self::Database(_) | Self::Internal(_) => 999,
        }
    }
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Outcome of a successful login. `refresh_token` is a reserved field and is
/// always empty; refresh-token issuance is unimplemented.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Runs the end-to-end login transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::CredentialsMissing`], [`AuthError::UserNotFound`]
    /// or [`AuthError::AccountExpired`] on rejection.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Maps a bearer token back to a live, active credential record.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::TokenInvalid`], [`AuthError::UserNotFound`] or
    /// [`AuthError::UserInactive`]; any failure means "unauthenticated".
    async fn resolve_active_user(&self, token: &str) -> Result<users::Model, AuthError>;
}
