use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{roles, users};

/// Unified success envelope: `{code, msg, data}`.
#[derive(Debug, Serialize)]
pub struct BaseResponse<T> {
    pub code: u16,
    pub msg: String,
    pub data: Option<T>,
}

impl<T> BaseResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: 200,
            msg: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn ok_with_msg(msg: impl Into<String>, data: Option<T>) -> Self {
        Self {
            code: 200,
            msg: msg.into(),
            data,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub username: String,
    pub password: String,
    pub department: Option<String>,
    pub position: Option<String>,
    pub role_id: Option<String>,
    pub rank: Option<i32>,
    pub expired_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub role_id: Option<String>,
    pub rank: Option<i32>,
    pub status: Option<i32>,
    pub expired_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub role_id: String,
    pub name: String,
    pub remark: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct IngestResultDto {
    pub inserted: usize,
}

/// Credential record as exposed over the API; the password digest never
/// leaves the service.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i64,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub username: String,
    pub department: Option<String>,
    pub position: Option<String>,
    pub role_id: Option<String>,
    pub rank: Option<i32>,
    pub status: i32,
    pub create_time: DateTime<Utc>,
    pub create_by: Option<String>,
    pub update_time: DateTime<Utc>,
    pub update_by: Option<String>,
    pub expired_date: Option<DateTime<Utc>>,
    pub last_login_time: Option<DateTime<Utc>>,
}

impl From<users::Model> for UserDto {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            username: model.username,
            department: model.department,
            position: model.position,
            role_id: model.role_id,
            rank: model.rank,
            status: model.status,
            create_time: model.create_time,
            create_by: model.create_by,
            update_time: model.update_time,
            update_by: model.update_by,
            expired_date: model.expired_date,
            last_login_time: model.last_login_time,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoleDto {
    pub id: i64,
    pub role_id: String,
    pub name: String,
    pub remark: Option<String>,
    pub status: i32,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl From<roles::Model> for RoleDto {
    fn from(model: roles::Model) -> Self {
        Self {
            id: model.id,
            role_id: model.role_id,
            name: model.name,
            remark: model.remark,
            status: model.status,
            create_time: model.create_time,
            update_time: model.update_time,
        }
    }
}
