use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{Connection, RunQueryDsl, dsl::max, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{media, playlist_media, playlists},
    },
};
use domain::{
    entities::{
        media::MediaEntity,
        playlists::{NewPlaylistEntity, PlaylistEntity, PlaylistMediaEntity},
    },
    repositories::playlists::PlaylistRepository,
    value_objects::enums::playlist_types::PlaylistType,
};

pub struct PlaylistPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PlaylistPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }

    fn membership_rows(playlist_id: Uuid, media_ids: &[Uuid]) -> Vec<PlaylistMediaEntity> {
        media_ids
            .iter()
            .enumerate()
            .map(|(position, media_id)| PlaylistMediaEntity {
                playlist_id,
                media_id: *media_id,
                position: position as i32,
            })
            .collect()
    }
}

#[async_trait]
impl PlaylistRepository for PlaylistPostgres {
    async fn create(
        &self,
        new_playlist_entity: NewPlaylistEntity,
        media_ids: Vec<Uuid>,
    ) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let playlist_id = new_playlist_entity.id;

        conn.transaction::<_, anyhow::Error, _>(|conn| {
            insert_into(playlists::table)
                .values(&new_playlist_entity)
                .execute(conn)?;

            let rows = Self::membership_rows(playlist_id, &media_ids);
            if !rows.is_empty() {
                insert_into(playlist_media::table).values(&rows).execute(conn)?;
            }

            Ok(())
        })?;

        Ok(playlist_id)
    }

    async fn find_by_id(&self, playlist_id: Uuid) -> Result<Option<PlaylistEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = playlists::table
            .filter(playlists::id.eq(playlist_id))
            .select(PlaylistEntity::as_select())
            .first::<PlaylistEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_with_media(
        &self,
        playlist_id: Uuid,
    ) -> Result<Option<(PlaylistEntity, Vec<MediaEntity>)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let playlist = playlists::table
            .filter(playlists::id.eq(playlist_id))
            .select(PlaylistEntity::as_select())
            .first::<PlaylistEntity>(&mut conn)
            .optional()?;

        let Some(playlist) = playlist else {
            return Ok(None);
        };

        let media_rows = playlist_media::table
            .inner_join(media::table)
            .filter(playlist_media::playlist_id.eq(playlist_id))
            .order(playlist_media::position.asc())
            .select(MediaEntity::as_select())
            .load::<MediaEntity>(&mut conn)?;

        Ok(Some((playlist, media_rows)))
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<PlaylistEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = playlists::table
            .filter(playlists::user_id.eq(user_id))
            .order(playlists::created_at.asc())
            .select(PlaylistEntity::as_select())
            .load::<PlaylistEntity>(&mut conn)?;

        Ok(results)
    }

    async fn rename(&self, playlist_id: Uuid, name: String) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(playlists::table)
            .filter(playlists::id.eq(playlist_id))
            .set(playlists::name.eq(name))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn delete(&self, playlist_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = conn.transaction::<_, anyhow::Error, _>(|conn| {
            diesel::delete(
                playlist_media::table.filter(playlist_media::playlist_id.eq(playlist_id)),
            )
            .execute(conn)?;

            let deleted = diesel::delete(playlists::table.filter(playlists::id.eq(playlist_id)))
                .execute(conn)?;

            Ok(deleted)
        })?;

        Ok(deleted > 0)
    }

    async fn get_or_create_liked(&self, user_id: Uuid) -> Result<PlaylistEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let new_liked = NewPlaylistEntity {
            id: Uuid::new_v4(),
            name: "Liked Music".to_string(),
            playlist_type: PlaylistType::LikedMusic.to_string(),
            is_default: true,
            user_id: Some(user_id),
            created_at: Utc::now(),
        };

        // The partial unique index on (user_id, playlist_type) makes a racing
        // insert a no-op; the re-select then observes the winner's row.
        insert_into(playlists::table)
            .values(&new_liked)
            .on_conflict_do_nothing()
            .execute(&mut conn)?;

        let row = playlists::table
            .filter(playlists::user_id.eq(user_id))
            .filter(playlists::playlist_type.eq(PlaylistType::LikedMusic.to_string()))
            .select(PlaylistEntity::as_select())
            .first::<PlaylistEntity>(&mut conn)?;

        Ok(row)
    }

    async fn contains_media(&self, playlist_id: Uuid, media_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let exists = diesel::select(diesel::dsl::exists(
            playlist_media::table
                .filter(playlist_media::playlist_id.eq(playlist_id))
                .filter(playlist_media::media_id.eq(media_id)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(exists)
    }

    async fn add_media(&self, playlist_id: Uuid, media_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<_, anyhow::Error, _>(|conn| {
            let already_member = diesel::select(diesel::dsl::exists(
                playlist_media::table
                    .filter(playlist_media::playlist_id.eq(playlist_id))
                    .filter(playlist_media::media_id.eq(media_id)),
            ))
            .get_result::<bool>(conn)?;

            if already_member {
                return Ok(());
            }

            let next_position = playlist_media::table
                .filter(playlist_media::playlist_id.eq(playlist_id))
                .select(max(playlist_media::position))
                .first::<Option<i32>>(conn)?
                .map_or(0, |position| position + 1);

            insert_into(playlist_media::table)
                .values(&PlaylistMediaEntity {
                    playlist_id,
                    media_id,
                    position: next_position,
                })
                .execute(conn)?;

            Ok(())
        })
    }

    async fn remove_media(&self, playlist_id: Uuid, media_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        diesel::delete(
            playlist_media::table
                .filter(playlist_media::playlist_id.eq(playlist_id))
                .filter(playlist_media::media_id.eq(media_id)),
        )
        .execute(&mut conn)?;

        Ok(())
    }

    async fn replace_media(&self, playlist_id: Uuid, media_ids: Vec<Uuid>) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // One transaction: a concurrent reader sees the old order or the new
        // one, never the emptied playlist in between.
        conn.transaction::<_, anyhow::Error, _>(|conn| {
            diesel::delete(
                playlist_media::table.filter(playlist_media::playlist_id.eq(playlist_id)),
            )
            .execute(conn)?;

            let rows = Self::membership_rows(playlist_id, &media_ids);
            if !rows.is_empty() {
                insert_into(playlist_media::table).values(&rows).execute(conn)?;
            }

            Ok(())
        })
    }
}
