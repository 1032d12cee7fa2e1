pub mod enums;
pub mod media;
pub mod payments;
pub mod playback;
pub mod playlists;
pub mod plans;
pub mod users;
