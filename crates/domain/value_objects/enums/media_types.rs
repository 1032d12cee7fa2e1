use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MediaType {
    #[default]
    Music,
    Video,
    Podcast,
    AudioBook,
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let media_type = match self {
            MediaType::Music => "music",
            MediaType::Video => "video",
            MediaType::Podcast => "podcast",
            MediaType::AudioBook => "audio_book",
        };
        write!(f, "{}", media_type)
    }
}

impl MediaType {
    pub fn from_str(value: &str) -> Self {
        match value {
            "video" => MediaType::Video,
            "podcast" => MediaType::Podcast,
            "audio_book" => MediaType::AudioBook,
            _ => MediaType::Music,
        }
    }
}
