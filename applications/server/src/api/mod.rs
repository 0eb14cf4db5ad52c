/// API route modules
pub mod health;
pub mod playlists;
pub mod tracks;
pub mod users;

use crate::state::AppState;
use axum::{
    routing::{delete, get, patch},
    Router,
};

/// Build the full API router. Layers (tracing, CORS) are applied by the
/// binary; tests drive this router directly.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health::health))
        // Users
        .route("/users", get(users::list_users))
        .route("/users/search", get(users::search_users))
        .route("/users/username/:username", get(users::get_user_by_username))
        .route("/users/:id", get(users::get_user))
        .route("/users/:id/playlists", get(users::get_user_playlists))
        // Tracks
        .route("/tracks", get(tracks::list_tracks).post(tracks::create_track))
        .route("/tracks/search", get(tracks::search_tracks))
        .route(
            "/tracks/:id",
            get(tracks::get_track)
                .patch(tracks::update_track)
                .delete(tracks::delete_track),
        )
        // Playlists
        .route(
            "/playlists",
            get(playlists::list_playlists).post(playlists::create_playlist),
        )
        .route(
            "/playlists/:id",
            get(playlists::get_playlist)
                .patch(playlists::update_playlist)
                .delete(playlists::delete_playlist),
        )
        // Playlist tracks (the ordering surface)
        .route(
            "/playlists/:id/tracks",
            get(playlists::list_playlist_tracks).post(playlists::add_track_to_playlist),
        )
        .route(
            "/playlists/:id/tracks/reorder",
            patch(playlists::reorder_playlist_track),
        )
        .route(
            "/playlists/:id/tracks/:track_id",
            delete(playlists::remove_track_from_playlist),
        );

    Router::new().nest("/api", api_routes).with_state(state)
}
