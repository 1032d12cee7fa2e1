use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::media;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = media)]
pub struct MediaEntity {
    pub id: Uuid,
    pub title: String,
    pub media_type: String,
    pub url: String,
    pub duration_minutes: i32,
    pub genre: Option<String>,
    pub composer: Option<String>,
    pub album: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub thumbnail: Option<Vec<u8>>,
    pub release_date: Option<DateTime<Utc>>,
    pub creator_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = media)]
pub struct NewMediaEntity {
    pub id: Uuid,
    pub title: String,
    pub media_type: String,
    pub url: String,
    pub duration_minutes: i32,
    pub genre: Option<String>,
    pub composer: Option<String>,
    pub album: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub thumbnail: Option<Vec<u8>>,
    pub release_date: Option<DateTime<Utc>>,
    pub creator_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = media)]
pub struct EditMediaEntity {
    pub title: Option<String>,
    pub media_type: Option<String>,
    pub url: Option<String>,
    pub duration_minutes: Option<i32>,
    pub genre: Option<String>,
    pub composer: Option<String>,
    pub album: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub thumbnail: Option<Vec<u8>>,
    pub release_date: Option<DateTime<Utc>>,
}
