use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use crate::entities::{prelude::*, users};

/// Fields accepted by the administrative add-user operation. The password is
/// already digested by the caller; this layer never sees plaintext.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_id: String,
    pub name: Option<String>,
    pub username: String,
    pub password_digest: String,
    pub department: Option<String>,
    pub position: Option<String>,
    pub role_id: Option<String>,
    pub rank: Option<i32>,
    pub expired_date: Option<chrono::DateTime<Utc>>,
    pub create_by: Option<String>,
}

/// Repository for credential record operations
pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// The login lookup: username, digest and active status are matched in a
    /// single predicate so a wrong password and an unknown username are
    /// indistinguishable to the caller.
    pub async fn find_for_login(
        &self,
        username: &str,
        password_digest: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        Users::find()
            .filter(users::Column::Username.eq(username))
            .filter(users::Column::Password.eq(password_digest))
            .filter(users::Column::Status.eq(1))
            .one(&self.conn)
            .await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>, DbErr> {
        Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<users::Model>, DbErr> {
        Users::find_by_id(id).one(&self.conn).await
    }

    pub async fn list_all(&self) -> Result<Vec<users::Model>, DbErr> {
        Users::find()
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
    }

    /// Inserts a new record. Username uniqueness is enforced by the store's
    /// UNIQUE constraint; callers inspect the returned `DbErr` for a
    /// constraint violation rather than pre-checking.
    pub async fn create(&self, new_user: NewUser) -> Result<users::Model, DbErr> {
        let now = Utc::now();

        let active_model = users::ActiveModel {
            user_id: Set(Some(new_user.user_id)),
            name: Set(new_user.name),
            username: Set(new_user.username.clone()),
            password: Set(new_user.password_digest),
            department: Set(new_user.department),
            position: Set(new_user.position),
            role_id: Set(new_user.role_id),
            rank: Set(new_user.rank),
            status: Set(1),
            create_time: Set(now),
            create_by: Set(new_user.create_by),
            update_time: Set(now),
            expired_date: Set(new_user.expired_date),
            ..Default::default()
        };

        let model = active_model.insert(&self.conn).await?;
        info!("Created user {} (id {})", new_user.username, model.id);
        Ok(model)
    }

    /// Applies a pre-built patch. The caller sets only the changed columns
    /// plus `update_time`.
    pub async fn update(&self, patch: users::ActiveModel) -> Result<users::Model, DbErr> {
        patch.update(&self.conn).await
    }

    /// Stamps `last_login_time` on the given record. Scoped to one row, so
    /// last-writer-wins is acceptable without cross-request locking.
    pub async fn touch_last_login(&self, id: i64) -> Result<(), DbErr> {
        Users::update_many()
            .col_expr(
                users::Column::LastLoginTime,
                sea_orm::sea_query::Expr::value(Utc::now()),
            )
            .filter(users::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<bool, DbErr> {
        let result = Users::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
