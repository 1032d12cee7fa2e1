use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::media::{EditMediaEntity, MediaEntity, NewMediaEntity};

#[async_trait]
#[automock]
pub trait MediaRepository {
    async fn create(&self, new_media_entity: NewMediaEntity) -> Result<Uuid>;
    async fn find_by_id(&self, media_id: Uuid) -> Result<Option<MediaEntity>>;
    async fn list(&self) -> Result<Vec<MediaEntity>>;
    async fn list_by_creator(&self, creator_id: Uuid) -> Result<Vec<MediaEntity>>;
    async fn update(&self, media_id: Uuid, edit_media_entity: EditMediaEntity) -> Result<()>;
    async fn delete(&self, media_id: Uuid) -> Result<bool>;
}
