mod entry;
mod ids;
mod page;
mod playlist;
mod track;
mod user;

pub use entry::PlaylistEntry;
pub use ids::{PlaylistId, TrackId, UserId};
pub use page::{Page, PageRequest, MAX_PAGE_LIMIT};
pub use playlist::{CreatePlaylist, Playlist, UpdatePlaylist, Visibility};
pub use track::{CreateTrack, Track, UpdateTrack};
pub use user::{UpdateUser, User, UserSummary};
