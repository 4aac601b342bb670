//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{SqlErr, Set};
use tracing::info;

use crate::auth::digest;
use crate::db::{NewUser, Store};
use crate::entities::users;
use crate::services::user_service::{
    CreateUser, MAX_NAME_LEN, MAX_RANK, MAX_USERNAME_LEN, UpdateUser, UserError, UserService,
};

pub struct SeaOrmUserService {
    store: Store,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn validate(req: &CreateUser) -> Result<(), UserError> {
        if let Some(rank) = req.rank
            && !(0..=MAX_RANK).contains(&rank)
        {
            return Err(UserError::RankTooLong);
        }
        if req.name.chars().count() > MAX_NAME_LEN {
            return Err(UserError::NameTooLong);
        }
        if req.username.chars().count() > MAX_USERNAME_LEN {
            return Err(UserError::UsernameTooLong);
        }
        Ok(())
    }

    fn map_insert_error(err: sea_orm::DbErr) -> UserError {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                if detail.contains("username") {
                    UserError::UsernameDuplicate
                } else {
                    UserError::UniqueConflict
                }
            }
            _ => UserError::CreateFailed(err.to_string()),
        }
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn create(&self, req: CreateUser) -> Result<users::Model, UserError> {
        Self::validate(&req)?;

        let new_user = NewUser {
            user_id: uuid::Uuid::new_v4().to_string(),
            name: Some(req.name),
            username: req.username,
            password_digest: digest(&req.password),
            department: req.department,
            position: req.position,
            role_id: req.role_id,
            rank: req.rank,
            expired_date: req.expired_date,
            create_by: req.create_by,
        };

        // No pre-check on username; the UNIQUE constraint is the authority
        // and a conflict from concurrent creates maps to the same error.
        self.store
            .create_user(new_user)
            .await
            .map_err(Self::map_insert_error)
    }

    async fn get(&self, id: i64) -> Result<users::Model, UserError> {
        self.store
            .get_user_by_id(id)
            .await?
            .ok_or(UserError::NotFound)
    }

    async fn list(&self) -> Result<Vec<users::Model>, UserError> {
        Ok(self.store.list_users().await?)
    }

    async fn update(&self, id: i64, patch: UpdateUser) -> Result<users::Model, UserError> {
        if let Some(rank) = patch.rank
            && !(0..=MAX_RANK).contains(&rank)
        {
            return Err(UserError::RankTooLong);
        }
        if let Some(name) = &patch.name
            && name.chars().count() > MAX_NAME_LEN
        {
            return Err(UserError::NameTooLong);
        }

        let existing = self
            .store
            .get_user_by_id(id)
            .await?
            .ok_or(UserError::NotFound)?;

        let mut active: users::ActiveModel = existing.into();

        if let Some(name) = patch.name {
            active.name = Set(Some(name));
        }
        if let Some(password) = patch.password {
            active.password = Set(digest(&password));
        }
        if let Some(department) = patch.department {
            active.department = Set(Some(department));
        }
        if let Some(position) = patch.position {
            active.position = Set(Some(position));
        }
        if let Some(role_id) = patch.role_id {
            active.role_id = Set(Some(role_id));
        }
        if let Some(rank) = patch.rank {
            active.rank = Set(Some(rank));
        }
        if let Some(status) = patch.status {
            active.status = Set(status);
        }
        if let Some(expired_date) = patch.expired_date {
            active.expired_date = Set(Some(expired_date));
        }
        active.update_by = Set(patch.update_by);
        active.update_time = Set(Utc::now());

        Ok(self.store.update_user(active).await?)
    }

    async fn delete(&self, id: i64) -> Result<(), UserError> {
        let removed = self.store.delete_user(id).await?;
        if !removed {
            return Err(UserError::NotFound);
        }
        info!("Deleted user {}", id);
        Ok(())
    }
}
