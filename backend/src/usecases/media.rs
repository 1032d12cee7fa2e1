use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use tunedeck_core::domain::{
    entities::media::{EditMediaEntity, NewMediaEntity},
    repositories::media::MediaRepository,
    value_objects::{
        enums::user_roles::UserRole,
        media::{EditMediaModel, InsertMediaModel, MediaDto},
    },
};

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media not found")]
    MediaNotFound,
    #[error("media has no thumbnail")]
    NoThumbnail,
    #[error("only creators can upload media")]
    UploadNotAllowed,
    #[error("media does not belong to you")]
    NotOwner,
    #[error("invalid media url: {0}")]
    InvalidUrl(String),
    #[error("invalid thumbnail encoding")]
    InvalidThumbnail,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl MediaError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            MediaError::MediaNotFound | MediaError::NoThumbnail => StatusCode::NOT_FOUND,
            MediaError::UploadNotAllowed | MediaError::NotOwner => StatusCode::FORBIDDEN,
            MediaError::InvalidUrl(_) | MediaError::InvalidThumbnail => StatusCode::BAD_REQUEST,
            MediaError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type MediaResult<T> = std::result::Result<T, MediaError>;

pub struct MediaUseCase<M>
where
    M: MediaRepository + Send + Sync + 'static,
{
    media_repo: Arc<M>,
}

impl<M> MediaUseCase<M>
where
    M: MediaRepository + Send + Sync + 'static,
{
    pub fn new(media_repo: Arc<M>) -> Self {
        Self { media_repo }
    }

    pub async fn create(
        &self,
        creator_id: Uuid,
        role: UserRole,
        insert_media_model: InsertMediaModel,
    ) -> MediaResult<MediaDto> {
        if !role.can_upload_media() {
            warn!(%creator_id, "media: upload blocked for role");
            return Err(MediaError::UploadNotAllowed);
        }

        url::Url::parse(&insert_media_model.url)
            .map_err(|_| MediaError::InvalidUrl(insert_media_model.url.clone()))?;

        let thumbnail = Self::decode_thumbnail(insert_media_model.thumbnail_base64)?;

        let entity = NewMediaEntity {
            id: Uuid::new_v4(),
            title: insert_media_model.title,
            media_type: insert_media_model.media_type.to_string(),
            url: insert_media_model.url,
            duration_minutes: insert_media_model.duration_minutes,
            genre: insert_media_model.genre,
            composer: insert_media_model.composer,
            album: insert_media_model.album,
            description: insert_media_model.description,
            language: insert_media_model.language,
            thumbnail,
            release_date: insert_media_model.release_date,
            creator_id: Some(creator_id),
            created_at: Utc::now(),
        };

        let media_id = self.media_repo.create(entity).await.map_err(|err| {
            error!(%creator_id, db_error = ?err, "media: failed to insert media");
            MediaError::Internal(err)
        })?;

        info!(%creator_id, %media_id, "media: media created");
        self.get(media_id).await
    }

    pub async fn get(&self, media_id: Uuid) -> MediaResult<MediaDto> {
        let media = self
            .media_repo
            .find_by_id(media_id)
            .await
            .map_err(MediaError::Internal)?
            .ok_or(MediaError::MediaNotFound)?;

        Ok(MediaDto::from(media))
    }

    pub async fn list(&self) -> MediaResult<Vec<MediaDto>> {
        let media = self.media_repo.list().await.map_err(|err| {
            error!(db_error = ?err, "media: failed to list catalog");
            MediaError::Internal(err)
        })?;

        Ok(media.into_iter().map(MediaDto::from).collect())
    }

    pub async fn my_uploads(&self, creator_id: Uuid) -> MediaResult<Vec<MediaDto>> {
        let media = self
            .media_repo
            .list_by_creator(creator_id)
            .await
            .map_err(MediaError::Internal)?;

        Ok(media.into_iter().map(MediaDto::from).collect())
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        role: UserRole,
        media_id: Uuid,
        edit_media_model: EditMediaModel,
    ) -> MediaResult<MediaDto> {
        self.ensure_owner(user_id, role, media_id).await?;

        if let Some(url) = edit_media_model.url.as_deref() {
            url::Url::parse(url).map_err(|_| MediaError::InvalidUrl(url.to_string()))?;
        }

        let thumbnail = Self::decode_thumbnail(edit_media_model.thumbnail_base64)?;

        let entity = EditMediaEntity {
            title: edit_media_model.title,
            media_type: edit_media_model.media_type.map(|t| t.to_string()),
            url: edit_media_model.url,
            duration_minutes: edit_media_model.duration_minutes,
            genre: edit_media_model.genre,
            composer: edit_media_model.composer,
            album: edit_media_model.album,
            description: edit_media_model.description,
            language: edit_media_model.language,
            thumbnail,
            release_date: edit_media_model.release_date,
        };

        self.media_repo
            .update(media_id, entity)
            .await
            .map_err(|err| {
                error!(%media_id, db_error = ?err, "media: failed to update media");
                MediaError::Internal(err)
            })?;

        self.get(media_id).await
    }

    pub async fn delete(&self, user_id: Uuid, role: UserRole, media_id: Uuid) -> MediaResult<()> {
        self.ensure_owner(user_id, role, media_id).await?;

        self.media_repo.delete(media_id).await.map_err(|err| {
            error!(%media_id, db_error = ?err, "media: failed to delete media");
            MediaError::Internal(err)
        })?;

        info!(%user_id, %media_id, "media: media deleted");
        Ok(())
    }

    pub async fn thumbnail(&self, media_id: Uuid) -> MediaResult<Vec<u8>> {
        let media = self
            .media_repo
            .find_by_id(media_id)
            .await
            .map_err(MediaError::Internal)?
            .ok_or(MediaError::MediaNotFound)?;

        media.thumbnail.ok_or(MediaError::NoThumbnail)
    }

    async fn ensure_owner(&self, user_id: Uuid, role: UserRole, media_id: Uuid) -> MediaResult<()> {
        let media = self
            .media_repo
            .find_by_id(media_id)
            .await
            .map_err(MediaError::Internal)?
            .ok_or(MediaError::MediaNotFound)?;

        if media.creator_id != Some(user_id) && !role.is_admin() {
            warn!(%user_id, %media_id, "media: mutation of foreign media denied");
            return Err(MediaError::NotOwner);
        }

        Ok(())
    }

    fn decode_thumbnail(encoded: Option<String>) -> MediaResult<Option<Vec<u8>>> {
        match encoded {
            Some(value) => general_purpose::STANDARD
                .decode(value.as_bytes())
                .map(Some)
                .map_err(|_| MediaError::InvalidThumbnail),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockall::predicate::eq;
    use tunedeck_core::domain::{
        entities::media::MediaEntity, repositories::media::MockMediaRepository,
        value_objects::enums::media_types::MediaType,
    };

    fn sample_media(id: Uuid, creator_id: Option<Uuid>) -> MediaEntity {
        MediaEntity {
            id,
            title: "Track".to_string(),
            media_type: MediaType::Music.to_string(),
            url: "https://cdn.example.com/track.mp3".to_string(),
            duration_minutes: 4,
            genre: Some("pop".to_string()),
            composer: None,
            album: None,
            description: None,
            language: None,
            thumbnail: None,
            release_date: None,
            creator_id,
            created_at: Utc::now(),
        }
    }

    fn insert_model(url: &str) -> InsertMediaModel {
        InsertMediaModel {
            title: "Track".to_string(),
            media_type: MediaType::Music,
            url: url.to_string(),
            duration_minutes: 4,
            genre: None,
            composer: None,
            album: None,
            description: None,
            language: None,
            thumbnail_base64: None,
            release_date: None,
        }
    }

    #[tokio::test]
    async fn plain_listeners_cannot_upload() {
        let usecase = MediaUseCase::new(Arc::new(MockMediaRepository::new()));

        let result = usecase
            .create(
                Uuid::new_v4(),
                UserRole::User,
                insert_model("https://cdn.example.com/a.mp3"),
            )
            .await;

        assert!(matches!(result, Err(MediaError::UploadNotAllowed)));
    }

    #[tokio::test]
    async fn create_rejects_a_malformed_url() {
        let usecase = MediaUseCase::new(Arc::new(MockMediaRepository::new()));

        let result = usecase
            .create(Uuid::new_v4(), UserRole::Creator, insert_model("not a url"))
            .await;

        assert!(matches!(result, Err(MediaError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn create_rejects_bad_thumbnail_encoding() {
        let usecase = MediaUseCase::new(Arc::new(MockMediaRepository::new()));

        let mut model = insert_model("https://cdn.example.com/a.mp3");
        model.thumbnail_base64 = Some("!!! not base64 !!!".to_string());

        let result = usecase.create(Uuid::new_v4(), UserRole::Creator, model).await;
        assert!(matches!(result, Err(MediaError::InvalidThumbnail)));
    }

    #[tokio::test]
    async fn delete_requires_ownership_unless_admin() {
        let owner_id = Uuid::new_v4();
        let intruder_id = Uuid::new_v4();
        let media_id = Uuid::new_v4();

        let mut media_repo = MockMediaRepository::new();
        let media = sample_media(media_id, Some(owner_id));
        media_repo
            .expect_find_by_id()
            .with(eq(media_id))
            .returning(move |_| {
                let media = media.clone();
                Box::pin(async move { Ok(Some(media)) })
            });
        media_repo
            .expect_delete()
            .with(eq(media_id))
            .times(1)
            .returning(|_| Box::pin(async { Ok(true) }));

        let usecase = MediaUseCase::new(Arc::new(media_repo));

        let denied = usecase.delete(intruder_id, UserRole::User, media_id).await;
        assert!(matches!(denied, Err(MediaError::NotOwner)));

        // Admins may delete anything.
        usecase
            .delete(intruder_id, UserRole::Admin, media_id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn thumbnail_distinguishes_missing_media_from_missing_bytes() {
        let media_id = Uuid::new_v4();

        let mut media_repo = MockMediaRepository::new();
        let media = sample_media(media_id, None);
        media_repo
            .expect_find_by_id()
            .with(eq(media_id))
            .returning(move |_| {
                let media = media.clone();
                Box::pin(async move { Ok(Some(media)) })
            });

        let usecase = MediaUseCase::new(Arc::new(media_repo));
        let result = usecase.thumbnail(media_id).await;
        assert!(matches!(result, Err(MediaError::NoThumbnail)));
    }
}
