//! Track CRUD and search.

use chrono::{DateTime, Utc};
use sideb_core::{
    CreateTrack, Page, PageRequest, Result, SidebError, Track, TrackId, UpdateTrack,
};
use sqlx::{Row, SqlitePool};

const TRACK_COLUMNS: &str = "id, isrc, title, artist, album, duration_ms, cover_url, \
     spotify_id, apple_music_id, youtube_music_id, created_at, updated_at";

/// List tracks, newest first
pub async fn list(pool: &SqlitePool, page: PageRequest) -> Result<Page<Track>> {
    let total: i64 = sqlx::query("SELECT COUNT(*) AS n FROM tracks")
        .fetch_one(pool)
        .await?
        .get("n");

    let rows = sqlx::query(&format!(
        "SELECT {TRACK_COLUMNS} FROM tracks ORDER BY created_at DESC LIMIT ? OFFSET ?"
    ))
    .bind(i64::from(page.limit))
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let tracks = rows.iter().map(track_from_row).collect::<Result<_>>()?;
    Ok(Page::new(tracks, total as u64, page))
}

/// Case-insensitive substring search over title, artist and album
pub async fn search(pool: &SqlitePool, query: &str, page: PageRequest) -> Result<Page<Track>> {
    let pattern = format!("%{}%", query);

    let total: i64 = sqlx::query(
        "SELECT COUNT(*) AS n FROM tracks WHERE title LIKE ? OR artist LIKE ? OR album LIKE ?",
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .fetch_one(pool)
    .await?
    .get("n");

    let rows = sqlx::query(&format!(
        "SELECT {TRACK_COLUMNS} FROM tracks \
         WHERE title LIKE ? OR artist LIKE ? OR album LIKE ? \
         ORDER BY title LIMIT ? OFFSET ?"
    ))
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .bind(i64::from(page.limit))
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let tracks = rows.iter().map(track_from_row).collect::<Result<_>>()?;
    Ok(Page::new(tracks, total as u64, page))
}

/// Get track by ID
pub async fn get_by_id(pool: &SqlitePool, id: TrackId) -> Result<Option<Track>> {
    let row = sqlx::query(&format!("SELECT {TRACK_COLUMNS} FROM tracks WHERE id = ?"))
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(track_from_row).transpose()
}

/// Create a new track. An ISRC, when supplied, must not already be taken.
pub async fn create(pool: &SqlitePool, create: CreateTrack) -> Result<Track> {
    if let Some(isrc) = &create.isrc {
        let taken = sqlx::query("SELECT 1 FROM tracks WHERE isrc = ?")
            .bind(isrc)
            .fetch_optional(pool)
            .await?
            .is_some();
        if taken {
            return Err(SidebError::conflict("Track with this ISRC already exists"));
        }
    }

    let id = TrackId::generate();
    let now = Utc::now().timestamp();

    sqlx::query(
        r#"
        INSERT INTO tracks
            (id, isrc, title, artist, album, duration_ms, cover_url,
             spotify_id, apple_music_id, youtube_music_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.as_str())
    .bind(&create.isrc)
    .bind(&create.title)
    .bind(&create.artist)
    .bind(&create.album)
    .bind(create.duration_ms)
    .bind(&create.cover_url)
    .bind(&create.spotify_id)
    .bind(&create.apple_music_id)
    .bind(&create.youtube_music_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| SidebError::storage("Failed to retrieve created track"))
}

/// Update track fields; `None` leaves a field unchanged
pub async fn update(pool: &SqlitePool, id: TrackId, update: UpdateTrack) -> Result<Track> {
    let existing = get_by_id(pool, id.clone())
        .await?
        .ok_or_else(|| SidebError::not_found("Track", id.as_str()))?;

    let isrc = update.isrc.or(existing.isrc);
    let title = update.title.unwrap_or(existing.title);
    let artist = update.artist.unwrap_or(existing.artist);
    let album = update.album.or(existing.album);
    let duration_ms = update.duration_ms.unwrap_or(existing.duration_ms);
    let cover_url = update.cover_url.or(existing.cover_url);
    let spotify_id = update.spotify_id.or(existing.spotify_id);
    let apple_music_id = update.apple_music_id.or(existing.apple_music_id);
    let youtube_music_id = update.youtube_music_id.or(existing.youtube_music_id);

    sqlx::query(
        r#"
        UPDATE tracks
        SET isrc = ?, title = ?, artist = ?, album = ?, duration_ms = ?,
            cover_url = ?, spotify_id = ?, apple_music_id = ?,
            youtube_music_id = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&isrc)
    .bind(&title)
    .bind(&artist)
    .bind(&album)
    .bind(duration_ms)
    .bind(&cover_url)
    .bind(&spotify_id)
    .bind(&apple_music_id)
    .bind(&youtube_music_id)
    .bind(Utc::now().timestamp())
    .bind(id.as_str())
    .execute(pool)
    .await?;

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| SidebError::storage("Failed to retrieve updated track"))
}

/// Delete a track and its memberships everywhere.
///
/// Each playlist that contained the track is renumbered back to a
/// contiguous `0..N-1` and its `track_count` decremented, all in one
/// transaction with the delete.
pub async fn delete(pool: &SqlitePool, id: TrackId) -> Result<()> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query("SELECT 1 FROM tracks WHERE id = ?")
        .bind(id.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .is_some();
    if !exists {
        return Err(SidebError::not_found("Track", id.as_str()));
    }

    let affected = sqlx::query("SELECT playlist_id FROM playlist_entries WHERE track_id = ?")
        .bind(id.as_str())
        .fetch_all(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM playlist_entries WHERE track_id = ?")
        .bind(id.as_str())
        .execute(&mut *tx)
        .await?;

    for row in &affected {
        let playlist_id: sideb_core::PlaylistId = row.get("playlist_id");
        crate::entries::ledger::renumber(&mut tx, &playlist_id).await?;
        sqlx::query(
            "UPDATE playlists SET track_count = track_count - 1, updated_at = ? WHERE id = ?",
        )
        .bind(Utc::now().timestamp())
        .bind(playlist_id.as_str())
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("DELETE FROM tracks WHERE id = ?")
        .bind(id.as_str())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

// Helper functions

fn track_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Track> {
    Ok(Track {
        id: row.get("id"),
        isrc: row.get("isrc"),
        title: row.get("title"),
        artist: row.get("artist"),
        album: row.get("album"),
        duration_ms: row.get("duration_ms"),
        cover_url: row.get("cover_url"),
        spotify_id: row.get("spotify_id"),
        apple_music_id: row.get("apple_music_id"),
        youtube_music_id: row.get("youtube_music_id"),
        created_at: datetime(row.get("created_at"))?,
        updated_at: datetime(row.get("updated_at"))?,
    })
}

fn datetime(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| SidebError::storage("Invalid timestamp"))
}
