use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::users::{InsertUserEntity, UpdateUserEntity, UserEntity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertUserOutcome {
    Inserted(i64),
    DuplicateEmail,
}

#[async_trait]
#[automock]
pub trait UserRepository {
    async fn insert(&self, user: InsertUserEntity) -> Result<InsertUserOutcome>;

    async fn find_by_email(&self, email: String) -> Result<Option<UserEntity>>;

    async fn find_by_id(&self, user_id: i64) -> Result<Option<UserEntity>>;

    async fn update_profile(&self, user_id: i64, changes: UpdateUserEntity) -> Result<UserEntity>;
}
