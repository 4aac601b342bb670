use axum::{
    Json,
    extract::State,
};
use sea_orm::SqlErr;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, BaseResponse, CreateRoleRequest, RoleDto};
use crate::services::UserError;
use crate::state::SharedState;

/// GET /v1/role/all
pub async fn list_roles(
    State(state): State<Arc<SharedState>>,
) -> Result<Json<BaseResponse<Vec<RoleDto>>>, ApiError> {
    let all = state
        .store
        .list_roles()
        .await
        .map_err(|e| ApiError::User(UserError::Database(e.to_string())))?;

    Ok(Json(BaseResponse::ok(
        all.into_iter().map(RoleDto::from).collect(),
    )))
}

/// POST /v1/role/add
pub async fn create_role(
    State(state): State<Arc<SharedState>>,
    CurrentUser(operator): CurrentUser,
    Json(payload): Json<CreateRoleRequest>,
) -> Result<Json<BaseResponse<RoleDto>>, ApiError> {
    let created = state
        .store
        .create_role(
            &payload.role_id,
            &payload.name,
            payload.remark,
            Some(operator.username),
        )
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ApiError::User(UserError::UniqueConflict),
            _ => ApiError::User(UserError::Database(e.to_string())),
        })?;

    Ok(Json(BaseResponse::ok(created.into())))
}
