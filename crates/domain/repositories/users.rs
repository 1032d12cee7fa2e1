use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::users::{EditUserEntity, RegisterUserEntity, UserEntity};

#[async_trait]
#[automock]
pub trait UserRepository {
    async fn register(&self, register_user_entity: RegisterUserEntity) -> Result<Uuid>;
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>>;
    async fn list(&self) -> Result<Vec<UserEntity>>;
    async fn update(&self, user_id: Uuid, edit_user_entity: EditUserEntity) -> Result<()>;
    async fn delete(&self, user_id: Uuid) -> Result<bool>;
    async fn set_plan(&self, user_id: Uuid, plan_id: Option<Uuid>) -> Result<()>;

    /// Atomically resets the skip counter when the stored day differs from
    /// `today`, then returns the current count. `None` when the user row is
    /// missing.
    async fn roll_skip_counter(&self, user_id: Uuid, today: NaiveDate) -> Result<Option<i32>>;

    /// Atomically rolls the day boundary and bumps the counter in one
    /// statement, returning the post-increment count.
    async fn increment_skip_counter(&self, user_id: Uuid, today: NaiveDate)
    -> Result<Option<i32>>;
}
