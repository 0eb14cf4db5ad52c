/// Playlists API routes
use crate::{
    error::{Result, ServerError},
    extract::Requester,
    pagination::PageQuery,
    response,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use sideb_core::{
    CreatePlaylist, PageRequest, PlaylistId, TrackId, UpdatePlaylist, Visibility,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_collaborative: bool,
}

#[derive(Debug, Deserialize)]
pub struct ListPlaylistsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub visibility: Option<Visibility>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTrackRequest {
    pub track_id: TrackId,
    pub position: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderTrackRequest {
    pub track_id: TrackId,
    pub new_position: u32,
}

/// GET /api/playlists
/// Discovery feed: playlists filtered by visibility, PUBLIC by default
pub async fn list_playlists(
    State(state): State<AppState>,
    Query(query): Query<ListPlaylistsQuery>,
) -> Result<Json<Value>> {
    let page = PageRequest::new(query.page.unwrap_or(1), query.limit.unwrap_or(20));
    let visibility = query.visibility.unwrap_or_default();

    let playlists = sideb_storage::playlists::list(&state.pool, Some(visibility), page).await?;
    Ok(response::paginated(playlists))
}

/// POST /api/playlists
/// Create a new playlist owned by the requester
pub async fn create_playlist(
    State(state): State<AppState>,
    requester: Requester,
    Json(req): Json<CreatePlaylistRequest>,
) -> Result<impl IntoResponse> {
    let playlist = sideb_storage::playlists::create(
        &state.pool,
        CreatePlaylist {
            name: req.name,
            description: req.description,
            cover_image: req.cover_image,
            visibility: req.visibility,
            is_collaborative: req.is_collaborative,
            user_id: requester.0,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, response::success(playlist)))
}

/// GET /api/playlists/:id
/// Playlist details with the full ordered track list
pub async fn get_playlist(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>> {
    let playlist = sideb_storage::playlists::get_with_entries(&state.pool, PlaylistId::new(id))
        .await?
        .ok_or_else(|| ServerError::NotFound("Playlist not found".to_string()))?;

    Ok(response::success(playlist))
}

/// PATCH /api/playlists/:id
/// Update playlist fields
pub async fn update_playlist(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<UpdatePlaylist>,
) -> Result<Json<Value>> {
    let playlist = sideb_storage::playlists::update(&state.pool, PlaylistId::new(id), req).await?;
    Ok(response::success(playlist))
}

/// DELETE /api/playlists/:id
pub async fn delete_playlist(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    sideb_storage::playlists::delete(&state.pool, PlaylistId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/playlists/:id/tracks
/// One page of the playlist's entries, ascending by position
pub async fn list_playlist_tracks(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>> {
    let entries =
        sideb_storage::entries::list_entries(&state.pool, PlaylistId::new(id), query.request())
            .await?;
    Ok(response::paginated(entries))
}

/// POST /api/playlists/:id/tracks
/// Add a track to the playlist, at `position` or appended to the end
pub async fn add_track_to_playlist(
    Path(id): Path<String>,
    State(state): State<AppState>,
    requester: Requester,
    Json(req): Json<AddTrackRequest>,
) -> Result<impl IntoResponse> {
    let entry = sideb_storage::entries::add_track(
        &state.pool,
        PlaylistId::new(id),
        req.track_id,
        req.position,
        requester.0,
    )
    .await?;

    Ok((StatusCode::CREATED, response::success(entry)))
}

/// PATCH /api/playlists/:id/tracks/reorder
/// Move a track to a new position within the playlist
pub async fn reorder_playlist_track(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<ReorderTrackRequest>,
) -> Result<Json<Value>> {
    let entry = sideb_storage::entries::reorder_track(
        &state.pool,
        PlaylistId::new(id),
        req.track_id,
        req.new_position,
    )
    .await?;

    Ok(response::success(entry))
}

/// DELETE /api/playlists/:id/tracks/:track_id
pub async fn remove_track_from_playlist(
    Path((id, track_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    sideb_storage::entries::remove_track(
        &state.pool,
        PlaylistId::new(id),
        TrackId::new(track_id),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
