pub mod media_types;
pub mod payment_statuses;
pub mod plan_kinds;
pub mod playlist_types;
pub mod user_roles;
