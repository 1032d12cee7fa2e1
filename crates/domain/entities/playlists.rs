use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::{playlist_media, playlists};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = playlists)]
pub struct PlaylistEntity {
    pub id: Uuid,
    pub name: String,
    pub playlist_type: String,
    pub is_default: bool,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = playlists)]
pub struct NewPlaylistEntity {
    pub id: Uuid,
    pub name: String,
    pub playlist_type: String,
    pub is_default: bool,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Join row; `position` is the 0-based slot inside the playlist.
#[derive(Debug, Clone, Insertable, Selectable, Queryable)]
#[diesel(table_name = playlist_media)]
pub struct PlaylistMediaEntity {
    pub playlist_id: Uuid,
    pub media_id: Uuid,
    pub position: i32,
}
