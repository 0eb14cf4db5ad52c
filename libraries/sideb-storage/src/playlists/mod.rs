//! Playlist CRUD and listing.
//!
//! `track_count` on these rows is denormalized; only the [`crate::entries`]
//! module writes it.

use chrono::{DateTime, Utc};
use sideb_core::{
    CreatePlaylist, Page, PageRequest, Playlist, PlaylistId, Result, SidebError, UpdatePlaylist,
    UserId, UserSummary, Visibility,
};
use sqlx::{Row, SqlitePool};

const PLAYLIST_COLUMNS: &str = "p.id, p.user_id, p.name, p.description, p.cover_image, \
     p.visibility, p.is_collaborative, p.track_count, p.created_at, p.updated_at, \
     u.username AS owner_username, u.display_name AS owner_display_name, \
     u.profile_image AS owner_profile_image";

/// Create a new playlist owned by `create.user_id`
pub async fn create(pool: &SqlitePool, create: CreatePlaylist) -> Result<Playlist> {
    let owner_exists = sqlx::query("SELECT 1 FROM users WHERE id = ?")
        .bind(create.user_id.as_str())
        .fetch_optional(pool)
        .await?
        .is_some();
    if !owner_exists {
        return Err(SidebError::not_found("User", create.user_id.as_str()));
    }

    let id = PlaylistId::generate();
    let now = Utc::now().timestamp();

    sqlx::query(
        r#"
        INSERT INTO playlists
            (id, user_id, name, description, cover_image, visibility,
             is_collaborative, track_count, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
        "#,
    )
    .bind(id.as_str())
    .bind(create.user_id.as_str())
    .bind(&create.name)
    .bind(&create.description)
    .bind(&create.cover_image)
    .bind(create.visibility.as_str())
    .bind(i64::from(create.is_collaborative))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get_by_id(pool, id.clone())
        .await?
        .ok_or_else(|| SidebError::storage("Failed to retrieve created playlist"))
}

/// Get playlist by ID with owner info attached
pub async fn get_by_id(pool: &SqlitePool, id: PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query(&format!(
        "SELECT {PLAYLIST_COLUMNS} FROM playlists p \
         LEFT JOIN users u ON p.user_id = u.id WHERE p.id = ?"
    ))
    .bind(id.as_str())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(playlist_from_row).transpose()
}

/// Get playlist with its full ordered track list
pub async fn get_with_entries(pool: &SqlitePool, id: PlaylistId) -> Result<Option<Playlist>> {
    let Some(mut playlist) = get_by_id(pool, id.clone()).await? else {
        return Ok(None);
    };

    playlist.entries = Some(crate::entries::all_for_playlist(pool, &id).await?);
    Ok(Some(playlist))
}

/// List playlists, optionally filtered by visibility, newest first.
/// The discovery feed passes `Some(Visibility::Public)`.
pub async fn list(
    pool: &SqlitePool,
    visibility: Option<Visibility>,
    page: PageRequest,
) -> Result<Page<Playlist>> {
    let (total, rows) = match visibility {
        Some(v) => {
            let total: i64 = sqlx::query("SELECT COUNT(*) AS n FROM playlists WHERE visibility = ?")
                .bind(v.as_str())
                .fetch_one(pool)
                .await?
                .get("n");
            let rows = sqlx::query(&format!(
                "SELECT {PLAYLIST_COLUMNS} FROM playlists p \
                 LEFT JOIN users u ON p.user_id = u.id \
                 WHERE p.visibility = ? \
                 ORDER BY p.created_at DESC LIMIT ? OFFSET ?"
            ))
            .bind(v.as_str())
            .bind(i64::from(page.limit))
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
            (total, rows)
        }
        None => {
            let total: i64 = sqlx::query("SELECT COUNT(*) AS n FROM playlists")
                .fetch_one(pool)
                .await?
                .get("n");
            let rows = sqlx::query(&format!(
                "SELECT {PLAYLIST_COLUMNS} FROM playlists p \
                 LEFT JOIN users u ON p.user_id = u.id \
                 ORDER BY p.created_at DESC LIMIT ? OFFSET ?"
            ))
            .bind(i64::from(page.limit))
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
            (total, rows)
        }
    };

    let mut playlists = Vec::with_capacity(rows.len());
    for row in &rows {
        playlists.push(playlist_from_row(row)?);
    }

    Ok(Page::new(playlists, total as u64, page))
}

/// List one user's playlists, newest first. Private and followers-only
/// playlists are included only when `include_private` is set (the caller
/// decides based on who is asking).
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: UserId,
    include_private: bool,
    page: PageRequest,
) -> Result<Page<Playlist>> {
    let user_exists = sqlx::query("SELECT 1 FROM users WHERE id = ?")
        .bind(user_id.as_str())
        .fetch_optional(pool)
        .await?
        .is_some();
    if !user_exists {
        return Err(SidebError::not_found("User", user_id.as_str()));
    }

    let visibility_filter = if include_private {
        ""
    } else {
        " AND p.visibility = 'PUBLIC'"
    };

    let total: i64 = sqlx::query(&format!(
        "SELECT COUNT(*) AS n FROM playlists p WHERE p.user_id = ?{visibility_filter}"
    ))
    .bind(user_id.as_str())
    .fetch_one(pool)
    .await?
    .get("n");

    let rows = sqlx::query(&format!(
        "SELECT {PLAYLIST_COLUMNS} FROM playlists p \
         LEFT JOIN users u ON p.user_id = u.id \
         WHERE p.user_id = ?{visibility_filter} \
         ORDER BY p.created_at DESC LIMIT ? OFFSET ?"
    ))
    .bind(user_id.as_str())
    .bind(i64::from(page.limit))
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let mut playlists = Vec::with_capacity(rows.len());
    for row in &rows {
        playlists.push(playlist_from_row(row)?);
    }

    Ok(Page::new(playlists, total as u64, page))
}

/// Update playlist fields; `None` leaves a field unchanged
pub async fn update(pool: &SqlitePool, id: PlaylistId, update: UpdatePlaylist) -> Result<Playlist> {
    let existing = get_by_id(pool, id.clone())
        .await?
        .ok_or_else(|| SidebError::not_found("Playlist", id.as_str()))?;

    let name = update.name.unwrap_or(existing.name);
    let description = update.description.or(existing.description);
    let cover_image = update.cover_image.or(existing.cover_image);
    let visibility = update.visibility.unwrap_or(existing.visibility);
    let is_collaborative = update.is_collaborative.unwrap_or(existing.is_collaborative);

    sqlx::query(
        r#"
        UPDATE playlists
        SET name = ?, description = ?, cover_image = ?, visibility = ?,
            is_collaborative = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&name)
    .bind(&description)
    .bind(&cover_image)
    .bind(visibility.as_str())
    .bind(i64::from(is_collaborative))
    .bind(Utc::now().timestamp())
    .bind(id.as_str())
    .execute(pool)
    .await?;

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| SidebError::storage("Failed to retrieve updated playlist"))
}

/// Delete a playlist. Cascades to its membership rows.
pub async fn delete(pool: &SqlitePool, id: PlaylistId) -> Result<()> {
    let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id.as_str())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(SidebError::not_found("Playlist", id.as_str()));
    }
    Ok(())
}

// Helper functions

fn playlist_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Playlist> {
    let visibility: String = row.get("visibility");
    let owner_username: Option<String> = row.get("owner_username");

    Ok(Playlist {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        description: row.get("description"),
        cover_image: row.get("cover_image"),
        visibility: Visibility::parse(&visibility)
            .ok_or_else(|| SidebError::storage(format!("Invalid visibility: {visibility}")))?,
        is_collaborative: row.get::<i64, _>("is_collaborative") != 0,
        track_count: row.get::<i64, _>("track_count") as u32,
        created_at: datetime(row.get("created_at"))?,
        updated_at: datetime(row.get("updated_at"))?,
        owner: owner_username.map(|username| UserSummary {
            id: row.get("user_id"),
            username,
            display_name: row.get("owner_display_name"),
            profile_image: row.get("owner_profile_image"),
        }),
        entries: None,
    })
}

fn datetime(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| SidebError::storage("Invalid timestamp"))
}
