use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::plans::PlanEntity, value_objects::enums::plan_kinds::PlanKind,
};

/// Fixed UUID representing the free plan.
pub const FREE_PLAN_ID: Uuid = Uuid::nil();

/// Capabilities granted by a plan. Stored as JSONB in the database.
///
/// `max_skips_per_day: None` means unlimited; provisioning data never uses a
/// large sentinel value, so the policy engine only ever sees `Option`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Entitlements {
    #[serde(default)]
    pub max_skips_per_day: Option<i32>,

    #[serde(default)]
    pub can_seek_in_songs: Option<bool>,

    #[serde(default)]
    pub audio_quality: Option<String>,

    #[serde(default)]
    pub can_create_playlists: Option<bool>,

    #[serde(default)]
    pub max_devices: Option<i32>,

    #[serde(default)]
    pub is_download_allowed: Option<bool>,

    #[serde(default)]
    pub ad_supported: Option<bool>,
}

impl Entitlements {
    pub fn unlimited_skips(&self) -> bool {
        self.max_skips_per_day.is_none()
    }

    pub fn can_seek(&self) -> bool {
        self.can_seek_in_songs.unwrap_or(false)
    }

    pub fn audio_quality_or_default(&self) -> &str {
        self.audio_quality.as_deref().unwrap_or("128kbps")
    }

    pub fn playlists_allowed(&self) -> bool {
        self.can_create_playlists.unwrap_or(false)
    }

    pub fn max_devices_or_default(&self) -> i32 {
        self.max_devices.unwrap_or(1)
    }

    pub fn downloads_allowed(&self) -> bool {
        self.is_download_allowed.unwrap_or(false)
    }

    /// Ad-supported tiers interpose an interstitial on every forward advance.
    /// An absent flag counts as ad-supported.
    pub fn is_ad_supported(&self) -> bool {
        self.ad_supported.unwrap_or(true)
    }

    /// Provisioning defaults per plan kind.
    pub fn for_kind(kind: PlanKind) -> Self {
        match kind {
            PlanKind::Free => Self {
                max_skips_per_day: Some(3),
                can_seek_in_songs: Some(false),
                audio_quality: Some("128kbps".to_string()),
                can_create_playlists: Some(false),
                max_devices: Some(1),
                is_download_allowed: Some(false),
                ad_supported: Some(true),
            },
            PlanKind::Premium => Self {
                max_skips_per_day: None,
                can_seek_in_songs: Some(true),
                audio_quality: Some("320kbps".to_string()),
                can_create_playlists: Some(true),
                max_devices: Some(3),
                is_download_allowed: Some(true),
                ad_supported: Some(false),
            },
            PlanKind::Family => Self {
                max_skips_per_day: None,
                can_seek_in_songs: Some(true),
                audio_quality: Some("FLAC".to_string()),
                can_create_playlists: Some(true),
                max_devices: Some(5),
                is_download_allowed: Some(true),
                ad_supported: Some(false),
            },
            PlanKind::Student => Self {
                max_skips_per_day: None,
                can_seek_in_songs: Some(true),
                audio_quality: Some("256kbps".to_string()),
                can_create_playlists: Some(true),
                max_devices: Some(1),
                is_download_allowed: Some(true),
                ad_supported: Some(false),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertPlanModel {
    pub kind: PlanKind,
    pub price_minor: i32,
    pub entitlements: Entitlements,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditPlanModel {
    pub kind: Option<PlanKind>,
    pub price_minor: Option<i32>,
    pub entitlements: Option<Entitlements>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanDto {
    pub id: Uuid,
    pub kind: PlanKind,
    pub price_minor: i32,
    pub entitlements: Entitlements,
    pub is_active: bool,
}

impl From<PlanEntity> for PlanDto {
    fn from(value: PlanEntity) -> Self {
        Self {
            id: value.id,
            kind: PlanKind::from_str(&value.kind),
            price_minor: value.price_minor,
            entitlements: value.entitlements,
            is_active: value.is_active,
        }
    }
}
