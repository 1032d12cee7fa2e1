use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{
    media::MediaEntity,
    playlists::{NewPlaylistEntity, PlaylistEntity},
};

#[async_trait]
#[automock]
pub trait PlaylistRepository {
    /// Inserts the playlist and its ordered members in one transaction.
    async fn create(
        &self,
        new_playlist_entity: NewPlaylistEntity,
        media_ids: Vec<Uuid>,
    ) -> Result<Uuid>;

    async fn find_by_id(&self, playlist_id: Uuid) -> Result<Option<PlaylistEntity>>;

    /// Playlist plus its members ordered by position.
    async fn find_with_media(
        &self,
        playlist_id: Uuid,
    ) -> Result<Option<(PlaylistEntity, Vec<MediaEntity>)>>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<PlaylistEntity>>;
    async fn rename(&self, playlist_id: Uuid, name: String) -> Result<()>;
    async fn delete(&self, playlist_id: Uuid) -> Result<bool>;

    /// Idempotent upsert of the per-user Liked Music playlist: insert with
    /// ON CONFLICT DO NOTHING against the partial unique index, then
    /// re-select. Concurrent callers all observe the same row.
    async fn get_or_create_liked(&self, user_id: Uuid) -> Result<PlaylistEntity>;

    async fn contains_media(&self, playlist_id: Uuid, media_id: Uuid) -> Result<bool>;

    /// Appends at the tail position; no-op when already a member.
    async fn add_media(&self, playlist_id: Uuid, media_id: Uuid) -> Result<()>;

    async fn remove_media(&self, playlist_id: Uuid, media_id: Uuid) -> Result<()>;

    /// Destructive reorder: all membership rows replaced by `media_ids` in
    /// the given order, inside a single transaction.
    async fn replace_media(&self, playlist_id: Uuid, media_ids: Vec<Uuid>) -> Result<()>;
}
