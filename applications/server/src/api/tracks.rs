/// Tracks API routes
use crate::{
    error::{Result, ServerError},
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
use sideb_core::{CreateTrack, TrackId, UpdateTrack};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// GET /api/tracks
pub async fn list_tracks(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>> {
    let tracks = sideb_storage::tracks::list(&state.pool, query.request()).await?;
    Ok(response::paginated(tracks))
}

/// GET /api/tracks/search?q=
pub async fn search_tracks(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>> {
    if query.q.trim().is_empty() {
        return Err(ServerError::BadRequest("Search query is required".to_string()));
    }

    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let tracks = sideb_storage::tracks::search(&state.pool, &query.q, page.request()).await?;
    Ok(response::paginated(tracks))
}

/// POST /api/tracks
pub async fn create_track(
    State(state): State<AppState>,
    Json(req): Json<CreateTrack>,
) -> Result<impl IntoResponse> {
    if req.title.trim().is_empty() || req.artist.trim().is_empty() {
        return Err(ServerError::BadRequest("Title and artist are required".to_string()));
    }
    if req.duration_ms <= 0 {
        return Err(ServerError::BadRequest("Duration must be positive".to_string()));
    }

    let track = sideb_storage::tracks::create(&state.pool, req).await?;
    Ok((StatusCode::CREATED, response::success(track)))
}

/// GET /api/tracks/:id
pub async fn get_track(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>> {
    let track = sideb_storage::tracks::get_by_id(&state.pool, TrackId::new(id))
        .await?
        .ok_or_else(|| ServerError::NotFound("Track not found".to_string()))?;

    Ok(response::success(track))
}

/// PATCH /api/tracks/:id
pub async fn update_track(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<UpdateTrack>,
) -> Result<Json<Value>> {
    let track = sideb_storage::tracks::update(&state.pool, TrackId::new(id), req).await?;
    Ok(response::success(track))
}

/// DELETE /api/tracks/:id
/// Removes the track everywhere; playlists that contained it are
/// renumbered and their counts adjusted in the same transaction.
pub async fn delete_track(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    sideb_storage::tracks::delete(&state.pool, TrackId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
