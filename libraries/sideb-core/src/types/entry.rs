/// Playlist membership types
use crate::types::{PlaylistId, Track, TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One track's membership in one playlist at one ordinal position.
///
/// Within a playlist the positions of all entries form the contiguous
/// zero-based sequence `0..N-1`: unique, no gaps. The entries module in
/// the storage crate is the only writer of `position`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistEntry {
    /// Playlist this entry belongs to
    pub playlist_id: PlaylistId,

    /// Member track
    pub track_id: TrackId,

    /// Zero-based rank within the playlist ordering
    pub position: u32,

    /// When the track was added
    pub added_at: DateTime<Utc>,

    /// Who added it
    pub added_by: UserId,

    /// Track details, attached on reads that join the track
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<Track>,
}
