/// Users API routes
use crate::{
    error::{Result, ServerError},
    extract::Requester,
    pagination::PageQuery,
    response,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use sideb_core::UserId;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>> {
    let users = sideb_storage::users::list(&state.pool, query.request()).await?;
    Ok(response::paginated(users))
}

/// GET /api/users/search?q=
pub async fn search_users(
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
    let users = sideb_storage::users::search(&state.pool, &query.q, page.request()).await?;
    Ok(response::paginated(users))
}

/// GET /api/users/:id
pub async fn get_user(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>> {
    let user = sideb_storage::users::get_by_id(&state.pool, UserId::new(id))
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    Ok(response::success(user))
}

/// GET /api/users/username/:username
pub async fn get_user_by_username(
    Path(username): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>> {
    let user = sideb_storage::users::get_by_username(&state.pool, &username)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    Ok(response::success(user))
}

/// GET /api/users/:id/playlists
/// A user's playlists; private ones are visible to the owner only
pub async fn get_user_playlists(
    Path(id): Path<String>,
    State(state): State<AppState>,
    requester: Option<Requester>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>> {
    let user_id = UserId::new(id);
    let is_own_profile = requester.is_some_and(|r| *r.user_id() == user_id);

    let playlists = sideb_storage::playlists::list_for_user(
        &state.pool,
        user_id,
        is_own_profile,
        query.request(),
    )
    .await?;

    Ok(response::paginated(playlists))
}
