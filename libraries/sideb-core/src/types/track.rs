/// Track domain types
use crate::types::TrackId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Track with descriptive metadata and optional external-platform links.
///
/// Tracks have an independent lifecycle: one track may belong to zero or
/// many playlists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// International Standard Recording Code, unique when present
    pub isrc: Option<String>,

    pub title: String,

    pub artist: String,

    pub album: Option<String>,

    /// Duration in milliseconds
    pub duration_ms: i64,

    pub cover_url: Option<String>,

    pub spotify_id: Option<String>,

    pub apple_music_id: Option<String>,

    pub youtube_music_id: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a track
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrack {
    pub isrc: Option<String>,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    /// Duration in milliseconds
    pub duration_ms: i64,
    pub cover_url: Option<String>,
    pub spotify_id: Option<String>,
    pub apple_music_id: Option<String>,
    pub youtube_music_id: Option<String>,
}

/// Partial update of a track; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrack {
    pub isrc: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_ms: Option<i64>,
    pub cover_url: Option<String>,
    pub spotify_id: Option<String>,
    pub apple_music_id: Option<String>,
    pub youtube_music_id: Option<String>,
}
