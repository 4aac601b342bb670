//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info};

use crate::auth::token::TokenError;
use crate::auth::{TokenService, digest};
use crate::db::Store;
use crate::entities::users;
use crate::services::auth_service::{AuthError, AuthService, LoginResult};

pub struct SeaOrmAuthService {
    store: Store,
    tokens: TokenService,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, tokens: TokenService) -> Self {
        Self { store, tokens }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        if username.is_empty() || password.is_empty() {
            error!("[login] username or password is empty");
            return Err(AuthError::CredentialsMissing);
        }

        let password_digest = digest(password);

        // Username, digest and status are matched in one predicate; a wrong
        // password and an unknown username produce the same rejection.
        let user = self
            .store
            .find_user_for_login(username, &password_digest)
            .await?
            .ok_or_else(|| {
                error!("[login] no active account for username {}", username);
                AuthError::UserNotFound
            })?;

        if let Some(expired) = user.expired_date
            && expired < Utc::now()
        {
            error!("[login] account {} expired at {}", username, expired);
            return Err(AuthError::AccountExpired);
        }

        let access_token = self
            .tokens
            .issue(&user.username)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        self.store.touch_last_login(user.id).await?;

        info!(
            "[login] user {} logged in, account valid until {}",
            username,
            user.expired_date
                .map_or_else(|| "无期限".to_string(), |d| d.to_rfc3339())
        );

        Ok(LoginResult {
            username: user.username,
            access_token,
            refresh_token: String::new(),
        })
    }

    async fn resolve_active_user(&self, token: &str) -> Result<users::Model, AuthError> {
        let username = self.tokens.verify(token).map_err(|e| match e {
            TokenError::Invalid(reason) => {
                error!("[auth] token rejected: {}", reason);
                AuthError::TokenInvalid
            }
            TokenError::Signing(reason) => AuthError::Internal(reason),
        })?;

        let user = self
            .store
            .get_user_by_username(&username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // Account expiry is a login-time gate only; an issued token stays
        // usable until it expires itself.
        if user.status != 1 {
            error!("[auth] user {} is not active", username);
            return Err(AuthError::UserInactive);
        }

        Ok(user)
    }
}
