use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::media},
};
use domain::{
    entities::media::{EditMediaEntity, MediaEntity, NewMediaEntity},
    repositories::media::MediaRepository,
};

pub struct MediaPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl MediaPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MediaRepository for MediaPostgres {
    async fn create(&self, new_media_entity: NewMediaEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(media::table)
            .values(&new_media_entity)
            .returning(media::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, media_id: Uuid) -> Result<Option<MediaEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = media::table
            .filter(media::id.eq(media_id))
            .select(MediaEntity::as_select())
            .first::<MediaEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list(&self) -> Result<Vec<MediaEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = media::table
            .order(media::created_at.desc())
            .select(MediaEntity::as_select())
            .load::<MediaEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_by_creator(&self, creator_id: Uuid) -> Result<Vec<MediaEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = media::table
            .filter(media::creator_id.eq(creator_id))
            .order(media::created_at.desc())
            .select(MediaEntity::as_select())
            .load::<MediaEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update(&self, media_id: Uuid, edit_media_entity: EditMediaEntity) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(media::table)
            .filter(media::id.eq(media_id))
            .set(&edit_media_entity)
            .execute(&mut conn)?;

        Ok(())
    }

    async fn delete(&self, media_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = diesel::delete(media::table.filter(media::id.eq(media_id)))
            .execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
