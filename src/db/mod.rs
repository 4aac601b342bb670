use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{roles, users};

pub mod migrator;
pub mod repositories;

pub use repositories::user::NewUser;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        // A pooled in-memory sqlite gives every connection its own database;
        // clamp to a single connection so migrations and queries share one.
        let (max_connections, min_connections) = if db_url.contains(":memory:") {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn role_repo(&self) -> repositories::role::RoleRepository {
        repositories::role::RoleRepository::new(self.conn.clone())
    }

    pub async fn find_user_for_login(
        &self,
        username: &str,
        password_digest: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        self.user_repo()
            .find_for_login(username, password_digest)
            .await
    }

    pub async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        self.user_repo().find_by_username(username).await
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<users::Model>, DbErr> {
        self.user_repo().find_by_id(id).await
    }

    pub async fn list_users(&self) -> Result<Vec<users::Model>, DbErr> {
        self.user_repo().list_all().await
    }

    pub async fn create_user(&self, new_user: NewUser) -> Result<users::Model, DbErr> {
        self.user_repo().create(new_user).await
    }

    pub async fn update_user(&self, patch: users::ActiveModel) -> Result<users::Model, DbErr> {
        self.user_repo().update(patch).await
    }

    pub async fn touch_last_login(&self, id: i64) -> Result<(), DbErr> {
        self.user_repo().touch_last_login(id).await
    }

    pub async fn delete_user(&self, id: i64) -> Result<bool, DbErr> {
        self.user_repo().delete_by_id(id).await
    }

    pub async fn list_roles(&self) -> Result<Vec<roles::Model>, DbErr> {
        self.role_repo().list_all().await
    }

    pub async fn get_role(&self, role_id: &str) -> Result<Option<roles::Model>, DbErr> {
        self.role_repo().find_by_role_id(role_id).await
    }

    pub async fn create_role(
        &self,
        role_id: &str,
        name: &str,
        remark: Option<String>,
        create_by: Option<String>,
    ) -> Result<roles::Model, DbErr> {
        self.role_repo()
            .create(role_id, name, remark, create_by)
            .await
    }
}
