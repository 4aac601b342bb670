use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, BaseResponse, CreateUserRequest, UpdateUserRequest, UserDto};
use crate::services::{CreateUser, UpdateUser};
use crate::state::SharedState;

/// POST /v1/user/add
pub async fn create_user(
    State(state): State<Arc<SharedState>>,
    CurrentUser(operator): CurrentUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<BaseResponse<UserDto>>, ApiError> {
    let created = state
        .users
        .create(CreateUser {
            name: payload.name,
            username: payload.username,
            password: payload.password,
            department: payload.department,
            position: payload.position,
            role_id: payload.role_id,
            rank: payload.rank,
            expired_date: payload.expired_date,
            create_by: Some(operator.username),
        })
        .await?;

    Ok(Json(BaseResponse::ok(created.into())))
}

/// GET /v1/user/info/{id}
pub async fn get_user(
    State(state): State<Arc<SharedState>>,
    Path(id): Path<i64>,
) -> Result<Json<BaseResponse<UserDto>>, ApiError> {
    let user = state.users.get(id).await?;
    Ok(Json(BaseResponse::ok(user.into())))
}

/// GET /v1/user/all
pub async fn list_users(
    State(state): State<Arc<SharedState>>,
) -> Result<Json<BaseResponse<Vec<UserDto>>>, ApiError> {
    let all = state.users.list().await?;
    Ok(Json(BaseResponse::ok(
        all.into_iter().map(UserDto::from).collect(),
    )))
}

/// PUT /v1/user/update/{id}
pub async fn update_user(
    State(state): State<Arc<SharedState>>,
    CurrentUser(operator): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<BaseResponse<UserDto>>, ApiError> {
    let updated = state
        .users
        .update(
            id,
            UpdateUser {
                name: payload.name,
                password: payload.password,
                department: payload.department,
                position: payload.position,
                role_id: payload.role_id,
                rank: payload.rank,
                status: payload.status,
                expired_date: payload.expired_date,
                update_by: Some(operator.username),
            },
        )
        .await?;

    Ok(Json(BaseResponse::ok(updated.into())))
}

/// DELETE /v1/user/del/{id}
pub async fn delete_user(
    State(state): State<Arc<SharedState>>,
    Path(id): Path<i64>,
) -> Result<Json<BaseResponse<()>>, ApiError> {
    state.users.delete(id).await?;
    Ok(Json(BaseResponse::ok_with_msg("User deleted", None)))
}
