use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::media::MediaEntity, value_objects::enums::media_types::MediaType,
};

#[derive(Debug, Clone, Deserialize)]
pub struct InsertMediaModel {
    pub title: String,
    pub media_type: MediaType,
    pub url: String,
    pub duration_minutes: i32,
    pub genre: Option<String>,
    pub composer: Option<String>,
    pub album: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    /// Base64-encoded image bytes, decoded before storage.
    pub thumbnail_base64: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditMediaModel {
    pub title: Option<String>,
    pub media_type: Option<MediaType>,
    pub url: Option<String>,
    pub duration_minutes: Option<i32>,
    pub genre: Option<String>,
    pub composer: Option<String>,
    pub album: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub thumbnail_base64: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
}

/// Catalog projection; thumbnail bytes are served by their own endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MediaDto {
    pub id: Uuid,
    pub title: String,
    pub media_type: MediaType,
    pub url: String,
    pub duration_minutes: i32,
    pub genre: Option<String>,
    pub composer: Option<String>,
    pub album: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub has_thumbnail: bool,
    pub release_date: Option<DateTime<Utc>>,
    pub creator_id: Option<Uuid>,
}

impl From<MediaEntity> for MediaDto {
    fn from(value: MediaEntity) -> Self {
        Self {
            id: value.id,
            title: value.title,
            media_type: MediaType::from_str(&value.media_type),
            url: value.url,
            duration_minutes: value.duration_minutes,
            genre: value.genre,
            composer: value.composer,
            album: value.album,
            description: value.description,
            language: value.language,
            has_thumbnail: value.thumbnail.is_some(),
            release_date: value.release_date,
            creator_id: value.creator_id,
        }
    }
}
