use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::{ApiError, BaseResponse, LoginRequest};
use crate::entities::users;
use crate::services::{AuthError, LoginResult};
use crate::state::SharedState;

/// POST /v1/auth/login
/// Authenticate with username and password, returns a bearer token on success
pub async fn login(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<BaseResponse<LoginResult>>, ApiError> {
    let result = state.auth.login(&payload.username, &payload.password).await?;

    Ok(Json(BaseResponse::ok_with_msg("登录成功", Some(result))))
}

/// Authentication middleware: extracts the `Authorization: Bearer` token,
/// resolves it to an active credential record and injects that record for
/// downstream handlers. Any failure short-circuits as unauthenticated.
pub async fn auth_middleware(
    State(state): State<Arc<SharedState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&request).ok_or(ApiError::Auth(AuthError::TokenInvalid))?;

    let user = state.auth.resolve_active_user(&token).await?;

    tracing::Span::current().record("user_id", user.username.as_str());
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

fn extract_bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

/// The resolved credential record of the requesting user, taken from the
/// request extensions populated by [`auth_middleware`].
pub struct CurrentUser(pub users::Model);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<users::Model>()
            .cloned()
            .map(CurrentUser)
            .ok_or(ApiError::Auth(AuthError::TokenInvalid))
    }
}
