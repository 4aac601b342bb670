use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "system_user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// External opaque identity (uuid v4, assigned at creation)
    pub user_id: Option<String>,

    pub name: Option<String>,

    #[sea_orm(unique)]
    pub username: String,

    /// Hex password digest, never plaintext
    pub password: String,

    pub department: Option<String>,

    pub position: Option<String>,

    pub role_id: Option<String>,

    pub rank: Option<i32>,

    /// 0 = disabled, 1 = active
    pub status: i32,

    pub create_time: DateTimeUtc,

    pub create_by: Option<String>,

    pub update_time: DateTimeUtc,

    pub update_by: Option<String>,

    /// Absent means the account never expires
    pub expired_date: Option<DateTimeUtc>,

    pub last_login_time: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
