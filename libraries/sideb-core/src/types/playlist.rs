/// Playlist domain types
use crate::types::{PlaylistEntry, PlaylistId, UserId, UserSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Owner user ID
    pub user_id: UserId,

    /// Playlist name
    pub name: String,

    pub description: Option<String>,

    pub cover_image: Option<String>,

    /// Who can see this playlist
    pub visibility: Visibility,

    /// Whether other users may add tracks
    pub is_collaborative: bool,

    /// Denormalized member count, kept in sync by the membership service.
    /// Always equals the number of entry rows for this playlist.
    pub track_count: u32,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,

    /// Owner info, attached on reads that join the owner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserSummary>,

    /// Ordered entries, attached by `get_with_entries`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<PlaylistEntry>>,
}

/// Who can see a playlist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    /// Visible to everyone, shown in the discovery feed
    #[default]
    Public,
    /// Visible to the owner only
    Private,
    /// Visible to the owner's followers
    Followers,
}

impl Visibility {
    /// Convert visibility to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::Private => "PRIVATE",
            Visibility::Followers => "FOLLOWERS",
        }
    }

    /// Parse visibility from string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PUBLIC" => Some(Visibility::Public),
            "PRIVATE" => Some(Visibility::Private),
            "FOLLOWERS" => Some(Visibility::Followers),
            _ => None,
        }
    }
}

/// Payload for creating a playlist. The owner is supplied by the caller
/// (the auth collaborator), so this is not a wire type.
#[derive(Debug, Clone)]
pub struct CreatePlaylist {
    pub name: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub visibility: Visibility,
    pub is_collaborative: bool,
    pub user_id: UserId,
}

/// Partial update of a playlist; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaylist {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub visibility: Option<Visibility>,
    pub is_collaborative: Option<bool>,
}
