use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "system_role")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique)]
    pub role_id: String,

    pub name: String,

    pub remark: Option<String>,

    /// 0 = disabled, 1 = active
    pub status: i32,

    pub create_time: DateTimeUtc,

    pub create_by: Option<String>,

    pub update_time: DateTimeUtc,

    pub update_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
