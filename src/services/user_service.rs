//! Domain service for credential record management.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::entities::users;

pub const MAX_NAME_LEN: usize = 20;
pub const MAX_USERNAME_LEN: usize = 20;
/// Rank is limited to six decimal digits.
pub const MAX_RANK: i32 = 999_999;

/// Errors specific to user management. Each kind carries the numeric code
/// surfaced in the error envelope.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("用户不存在")]
    NotFound,

    /// Uniqueness conflict on the username column at insert time.
    #[error("用户名重复，请检查")]
    UsernameDuplicate,

    #[error("排序字段输入长度超出限制")]
    RankTooLong,

    #[error("姓名字段输入长度超出限制")]
    NameTooLong,

    #[error("用户名字段输入长度超出限制")]
    UsernameTooLong,

    /// A uniqueness conflict on a column other than username.
    #[error("数据库唯一性冲突")]
    UniqueConflict,

    #[error("用户添加失败: {0}")]
    CreateFailed(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl UserError {
    /// Taxonomy code carried in the error envelope.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::UsernameDuplicate => 610,
            Self::RankTooLong => 611,
            Self::NameTooLong => 612,
            Self::UsernameTooLong => 613,
            Self::UniqueConflict => 620,
            Self::CreateFailed(_) => 630,
            Self::Database(_) => 999,
        }
    }
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Fields accepted by the administrative add-user operation.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub username: String,
    pub password: String,
    pub department: Option<String>,
    pub position: Option<String>,
    pub role_id: Option<String>,
    pub rank: Option<i32>,
    pub expired_date: Option<DateTime<Utc>>,
    pub create_by: Option<String>,
}

/// Partial patch for an existing record; unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub password: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub role_id: Option<String>,
    pub rank: Option<i32>,
    pub status: Option<i32>,
    pub expired_date: Option<DateTime<Utc>>,
    pub update_by: Option<String>,
}

/// Domain service trait for user management.
#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Validates field lengths, digests the initial password and inserts.
    /// Uniqueness is left to the store's constraint; a conflict surfaces as
    /// [`UserError::UsernameDuplicate`].
    async fn create(&self, req: CreateUser) -> Result<users::Model, UserError>;

    async fn get(&self, id: i64) -> Result<users::Model, UserError>;

    async fn list(&self) -> Result<Vec<users::Model>, UserError>;

    async fn update(&self, id: i64, patch: UpdateUser) -> Result<users::Model, UserError>;

    async fn delete(&self, id: i64) -> Result<(), UserError>;
}
