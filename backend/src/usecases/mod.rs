pub mod auth;
pub mod media;
pub mod payments;
pub mod plan_resolver;
pub mod plans;
pub mod playback;
pub mod playlists;
pub mod skip_quota;
pub mod users;
