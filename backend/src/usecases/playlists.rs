use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use tunedeck_core::domain::{
    entities::playlists::NewPlaylistEntity,
    repositories::{plans::PlanRepository, playlists::PlaylistRepository, users::UserRepository},
    value_objects::{
        enums::{playlist_types::PlaylistType, user_roles::UserRole},
        playlists::{CreatePlaylistModel, PlaylistDto, PlaylistSummaryDto},
    },
};

use crate::usecases::plan_resolver::PlanResolver;

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("playlist not found")]
    PlaylistNotFound,
    #[error("your plan does not allow creating playlists")]
    PlaylistsNotAllowed,
    #[error("playlist does not belong to you")]
    NotOwner,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PlaylistError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PlaylistError::PlaylistNotFound => StatusCode::NOT_FOUND,
            PlaylistError::PlaylistsNotAllowed | PlaylistError::NotOwner => StatusCode::FORBIDDEN,
            PlaylistError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type PlaylistResult<T> = std::result::Result<T, PlaylistError>;

pub struct PlaylistUseCase<PL, U, P>
where
    PL: PlaylistRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    playlist_repo: Arc<PL>,
    plan_resolver: Arc<PlanResolver<U, P>>,
}

impl<PL, U, P> PlaylistUseCase<PL, U, P>
where
    PL: PlaylistRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    pub fn new(playlist_repo: Arc<PL>, plan_resolver: Arc<PlanResolver<U, P>>) -> Self {
        Self {
            playlist_repo,
            plan_resolver,
        }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        create_playlist_model: CreatePlaylistModel,
    ) -> PlaylistResult<PlaylistDto> {
        let entitlements = self
            .plan_resolver
            .resolve_entitlements_for_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "playlists: failed to resolve entitlements");
                PlaylistError::Internal(err)
            })?;

        if !entitlements.playlists_allowed() {
            warn!(%user_id, "playlists: creation blocked by plan entitlements");
            return Err(PlaylistError::PlaylistsNotAllowed);
        }

        let entity = NewPlaylistEntity {
            id: Uuid::new_v4(),
            name: create_playlist_model.name,
            playlist_type: PlaylistType::Custom.to_string(),
            is_default: false,
            user_id: Some(user_id),
            created_at: Utc::now(),
        };

        let playlist_id = self
            .playlist_repo
            .create(entity, create_playlist_model.media_ids)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "playlists: failed to create playlist");
                PlaylistError::Internal(err)
            })?;

        info!(%user_id, %playlist_id, "playlists: playlist created");
        self.get(playlist_id).await
    }

    pub async fn get(&self, playlist_id: Uuid) -> PlaylistResult<PlaylistDto> {
        let (playlist, media) = self
            .playlist_repo
            .find_with_media(playlist_id)
            .await
            .map_err(PlaylistError::Internal)?
            .ok_or(PlaylistError::PlaylistNotFound)?;

        Ok(PlaylistDto::from_entity(playlist, media))
    }

    pub async fn my_playlists(&self, user_id: Uuid) -> PlaylistResult<Vec<PlaylistSummaryDto>> {
        let playlists = self
            .playlist_repo
            .list_by_user(user_id)
            .await
            .map_err(PlaylistError::Internal)?;

        Ok(playlists.into_iter().map(PlaylistSummaryDto::from).collect())
    }

    /// The distinguished Liked Music playlist, created on first access.
    pub async fn liked_music(&self, user_id: Uuid) -> PlaylistResult<PlaylistDto> {
        let liked = self
            .playlist_repo
            .get_or_create_liked(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "playlists: failed to get or create liked playlist");
                PlaylistError::Internal(err)
            })?;

        self.get(liked.id).await
    }

    /// Idempotent: liking an already-liked track is a no-op.
    pub async fn like(&self, user_id: Uuid, media_id: Uuid) -> PlaylistResult<()> {
        let liked = self
            .playlist_repo
            .get_or_create_liked(user_id)
            .await
            .map_err(PlaylistError::Internal)?;

        self.playlist_repo
            .add_media(liked.id, media_id)
            .await
            .map_err(|err| {
                error!(%user_id, %media_id, db_error = ?err, "playlists: failed to like media");
                PlaylistError::Internal(err)
            })?;

        info!(%user_id, %media_id, "playlists: media liked");
        Ok(())
    }

    /// Idempotent: unliking a track that is not liked is a no-op.
    pub async fn unlike(&self, user_id: Uuid, media_id: Uuid) -> PlaylistResult<()> {
        let liked = self
            .playlist_repo
            .get_or_create_liked(user_id)
            .await
            .map_err(PlaylistError::Internal)?;

        self.playlist_repo
            .remove_media(liked.id, media_id)
            .await
            .map_err(|err| {
                error!(%user_id, %media_id, db_error = ?err, "playlists: failed to unlike media");
                PlaylistError::Internal(err)
            })?;

        info!(%user_id, %media_id, "playlists: media unliked");
        Ok(())
    }

    pub async fn add_media(&self, playlist_id: Uuid, media_id: Uuid) -> PlaylistResult<()> {
        self.ensure_exists(playlist_id).await?;

        self.playlist_repo
            .add_media(playlist_id, media_id)
            .await
            .map_err(|err| {
                error!(%playlist_id, %media_id, db_error = ?err, "playlists: failed to add media");
                PlaylistError::Internal(err)
            })?;

        Ok(())
    }

    /// Destructive rewrite of the playlist order; duplicates in the input are
    /// preserved positionally.
    pub async fn reorder(&self, playlist_id: Uuid, media_ids: Vec<Uuid>) -> PlaylistResult<()> {
        self.ensure_exists(playlist_id).await?;

        let count = media_ids.len();
        self.playlist_repo
            .replace_media(playlist_id, media_ids)
            .await
            .map_err(|err| {
                error!(%playlist_id, db_error = ?err, "playlists: failed to reorder playlist");
                PlaylistError::Internal(err)
            })?;

        info!(%playlist_id, count, "playlists: playlist reordered");
        Ok(())
    }

    pub async fn rename(
        &self,
        user_id: Uuid,
        role: UserRole,
        playlist_id: Uuid,
        name: String,
    ) -> PlaylistResult<()> {
        self.ensure_owner(user_id, role, playlist_id).await?;

        self.playlist_repo
            .rename(playlist_id, name)
            .await
            .map_err(PlaylistError::Internal)?;

        Ok(())
    }

    pub async fn delete(
        &self,
        user_id: Uuid,
        role: UserRole,
        playlist_id: Uuid,
    ) -> PlaylistResult<()> {
        self.ensure_owner(user_id, role, playlist_id).await?;

        let deleted = self
            .playlist_repo
            .delete(playlist_id)
            .await
            .map_err(PlaylistError::Internal)?;

        if !deleted {
            return Err(PlaylistError::PlaylistNotFound);
        }

        info!(%user_id, %playlist_id, "playlists: playlist deleted");
        Ok(())
    }

    async fn ensure_exists(&self, playlist_id: Uuid) -> PlaylistResult<()> {
        self.playlist_repo
            .find_by_id(playlist_id)
            .await
            .map_err(PlaylistError::Internal)?
            .ok_or(PlaylistError::PlaylistNotFound)?;
        Ok(())
    }

    async fn ensure_owner(
        &self,
        user_id: Uuid,
        role: UserRole,
        playlist_id: Uuid,
    ) -> PlaylistResult<()> {
        let playlist = self
            .playlist_repo
            .find_by_id(playlist_id)
            .await
            .map_err(PlaylistError::Internal)?
            .ok_or(PlaylistError::PlaylistNotFound)?;

        if playlist.user_id != Some(user_id) && !role.is_admin() {
            warn!(%user_id, %playlist_id, "playlists: access to foreign playlist denied");
            return Err(PlaylistError::NotOwner);
        }

        Ok(())
    }
}
