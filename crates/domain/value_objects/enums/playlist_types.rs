use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlaylistType {
    #[default]
    Custom,
    LikedMusic,
    RecentlyPlayed,
}

impl Display for PlaylistType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let playlist_type = match self {
            PlaylistType::Custom => "custom",
            PlaylistType::LikedMusic => "liked_music",
            PlaylistType::RecentlyPlayed => "recently_played",
        };
        write!(f, "{}", playlist_type)
    }
}

impl PlaylistType {
    pub fn from_str(value: &str) -> Self {
        match value {
            "liked_music" => PlaylistType::LikedMusic,
            "recently_played" => PlaylistType::RecentlyPlayed,
            _ => PlaylistType::Custom,
        }
    }
}
