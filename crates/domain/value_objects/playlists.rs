use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{media::MediaEntity, playlists::PlaylistEntity},
    value_objects::{enums::playlist_types::PlaylistType, media::MediaDto},
};

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlaylistModel {
    pub name: String,
    #[serde(default)]
    pub media_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenamePlaylistModel {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReorderPlaylistModel {
    pub media_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaylistDto {
    pub id: Uuid,
    pub name: String,
    pub playlist_type: PlaylistType,
    pub is_default: bool,
    pub user_id: Option<Uuid>,
    pub media: Vec<MediaDto>,
}

impl PlaylistDto {
    pub fn from_entity(playlist: PlaylistEntity, media: Vec<MediaEntity>) -> Self {
        Self {
            id: playlist.id,
            name: playlist.name,
            playlist_type: PlaylistType::from_str(&playlist.playlist_type),
            is_default: playlist.is_default,
            user_id: playlist.user_id,
            media: media.into_iter().map(MediaDto::from).collect(),
        }
    }
}

/// Playlist listing without the member rows.
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistSummaryDto {
    pub id: Uuid,
    pub name: String,
    pub playlist_type: PlaylistType,
    pub is_default: bool,
}

impl From<PlaylistEntity> for PlaylistSummaryDto {
    fn from(value: PlaylistEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            playlist_type: PlaylistType::from_str(&value.playlist_type),
            is_default: value.is_default,
        }
    }
}
