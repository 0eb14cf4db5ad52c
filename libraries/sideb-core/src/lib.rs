//! Sideb Core
//!
//! Domain types and error handling shared by the Sideb storage layer and
//! the HTTP server.
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Track`, `Playlist`, `PlaylistEntry`
//! - **ID Newtypes**: `UserId`, `TrackId`, `PlaylistId`
//! - **Error Handling**: Unified `SidebError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use sideb_core::types::{CreatePlaylist, UserId, Visibility};
//!
//! let owner = UserId::generate();
//! let create = CreatePlaylist {
//!     name: "Late Night Sides".to_string(),
//!     description: None,
//!     cover_image: None,
//!     visibility: Visibility::Public,
//!     is_collaborative: false,
//!     user_id: owner,
//! };
//! assert_eq!(create.visibility.as_str(), "PUBLIC");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SidebError};
pub use types::{
    CreatePlaylist, CreateTrack, Page, PageRequest, Playlist, PlaylistEntry, PlaylistId, Track,
    TrackId, UpdatePlaylist, UpdateTrack, UpdateUser, User, UserId, UserSummary, Visibility,
};
