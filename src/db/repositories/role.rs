use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{prelude::*, roles};

/// Repository for role records
pub struct RoleRepository {
    conn: DatabaseConnection,
}

impl RoleRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_role_id(&self, role_id: &str) -> Result<Option<roles::Model>, DbErr> {
        Roles::find()
            .filter(roles::Column::RoleId.eq(role_id))
            .one(&self.conn)
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<roles::Model>, DbErr> {
        Roles::find()
            .order_by_asc(roles::Column::Id)
            .all(&self.conn)
            .await
    }

    /// `role_id` uniqueness is enforced by the store's UNIQUE constraint.
    pub async fn create(
        &self,
        role_id: &str,
        name: &str,
        remark: Option<String>,
        create_by: Option<String>,
    ) -> Result<roles::Model, DbErr> {
        let now = Utc::now();

        let active_model = roles::ActiveModel {
            role_id: Set(role_id.to_string()),
            name: Set(name.to_string()),
            remark: Set(remark),
            status: Set(1),
            create_time: Set(now),
            create_by: Set(create_by),
            update_time: Set(now),
            ..Default::default()
        };

        active_model.insert(&self.conn).await
    }
}
