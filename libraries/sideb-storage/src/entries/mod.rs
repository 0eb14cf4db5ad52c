//! Playlist membership: the ordered association between playlists and
//! tracks.
//!
//! This module owns the two pieces of shared mutable state the rest of the
//! system must never write directly: `playlist_entries.position` and the
//! denormalized `playlists.track_count`. Every mutation checks its
//! preconditions, delegates the renumbering to [`ledger`], and keeps the
//! count in step, all inside one transaction. A failure at any step rolls
//! the whole operation back.
//!
//! Concurrent mutations of the same playlist are serialized by SQLite's
//! single-writer transaction model (WAL + busy timeout, see
//! [`crate::create_pool`]); mutations of different playlists only contend
//! on that writer lock.

pub mod ledger;

use chrono::{DateTime, Utc};
use sideb_core::{
    Page, PageRequest, PlaylistEntry, PlaylistId, Result, SidebError, TrackId, UserId,
};
use sqlx::{Row, SqliteConnection, SqlitePool};

/// Add a track to a playlist.
///
/// With `position = None` the track is appended at the end. An explicit
/// position must be in `0..=N`; rows at or above it shift up by one.
/// Returns the created entry with track details attached.
///
/// Fails with `NotFound` (playlist or track missing), `Conflict` (track
/// already a member), or `InvalidInput` (position out of range).
pub async fn add_track(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    track_id: TrackId,
    position: Option<u32>,
    added_by: UserId,
) -> Result<PlaylistEntry> {
    let mut tx = pool.begin().await?;

    ensure_playlist_exists(&mut tx, &playlist_id).await?;

    let track_exists = sqlx::query("SELECT 1 FROM tracks WHERE id = ?")
        .bind(track_id.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .is_some();
    if !track_exists {
        return Err(SidebError::not_found("Track", track_id.as_str()));
    }

    // A track may appear at most once per playlist
    if ledger::position_of(&mut tx, &playlist_id, &track_id)
        .await?
        .is_some()
    {
        return Err(SidebError::conflict("Track already in playlist"));
    }

    let count = ledger::member_count(&mut tx, &playlist_id).await?;
    let position = match position {
        None => count,
        Some(p) => {
            let p = i64::from(p);
            if p > count {
                return Err(SidebError::invalid_input(format!(
                    "position {p} out of range 0..={count}"
                )));
            }
            p
        }
    };

    ledger::insert_at(
        &mut tx,
        &playlist_id,
        &track_id,
        position,
        &added_by,
        Utc::now(),
    )
    .await?;
    bump_track_count(&mut tx, &playlist_id, 1).await?;

    tx.commit().await?;

    get_entry(pool, &playlist_id, &track_id)
        .await?
        .ok_or_else(|| SidebError::storage("Failed to read back created entry"))
}

/// Remove a track from a playlist and close the gap it leaves.
///
/// Fails with `NotFound` if the track is not a member.
pub async fn remove_track(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    track_id: TrackId,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    ledger::remove_at(&mut tx, &playlist_id, &track_id).await?;
    bump_track_count(&mut tx, &playlist_id, -1).await?;

    tx.commit().await?;
    Ok(())
}

/// Move a track to a new position within its playlist.
///
/// `new_position` must name an existing slot, `0..N`. Moving a track onto
/// its current position is a no-op that mutates nothing and returns the
/// current entry.
///
/// Fails with `NotFound` (track not a member) or `InvalidInput`
/// (position out of range) before any row is touched.
pub async fn reorder_track(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    track_id: TrackId,
    new_position: u32,
) -> Result<PlaylistEntry> {
    let mut tx = pool.begin().await?;

    let old_position = ledger::position_of(&mut tx, &playlist_id, &track_id)
        .await?
        .ok_or_else(|| SidebError::not_found("Playlist track", track_id.as_str()))?;

    let count = ledger::member_count(&mut tx, &playlist_id).await?;
    let new_position = i64::from(new_position);
    if new_position >= count {
        return Err(SidebError::invalid_input(format!(
            "position {new_position} out of range 0..{count}"
        )));
    }

    if new_position == old_position {
        drop(tx);
    } else {
        ledger::move_to(&mut tx, &playlist_id, &track_id, old_position, new_position).await?;
        touch_playlist(&mut tx, &playlist_id).await?;
        tx.commit().await?;
    }

    get_entry(pool, &playlist_id, &track_id)
        .await?
        .ok_or_else(|| SidebError::storage("Failed to read back reordered entry"))
}

/// One page of a playlist's entries, ascending by position, with track
/// details attached. A pure read.
pub async fn list_entries(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    page: PageRequest,
) -> Result<Page<PlaylistEntry>> {
    let exists = sqlx::query("SELECT 1 FROM playlists WHERE id = ?")
        .bind(playlist_id.as_str())
        .fetch_optional(pool)
        .await?
        .is_some();
    if !exists {
        return Err(SidebError::not_found("Playlist", playlist_id.as_str()));
    }

    let total: i64 =
        sqlx::query("SELECT COUNT(*) AS n FROM playlist_entries WHERE playlist_id = ?")
            .bind(playlist_id.as_str())
            .fetch_one(pool)
            .await?
            .get("n");

    let rows = sqlx::query(
        r#"
        SELECT
            e.playlist_id, e.track_id, e.position, e.added_at, e.added_by,
            t.isrc, t.title, t.artist, t.album, t.duration_ms, t.cover_url,
            t.spotify_id, t.apple_music_id, t.youtube_music_id,
            t.created_at, t.updated_at
        FROM playlist_entries e
        INNER JOIN tracks t ON e.track_id = t.id
        WHERE e.playlist_id = ?
        ORDER BY e.position
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(playlist_id.as_str())
    .bind(i64::from(page.limit))
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in &rows {
        entries.push(entry_from_row(row)?);
    }

    Ok(Page::new(entries, total as u64, page))
}

/// Every entry of a playlist in order, for full playlist reads
pub(crate) async fn all_for_playlist(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
) -> Result<Vec<PlaylistEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT
            e.playlist_id, e.track_id, e.position, e.added_at, e.added_by,
            t.isrc, t.title, t.artist, t.album, t.duration_ms, t.cover_url,
            t.spotify_id, t.apple_music_id, t.youtube_music_id,
            t.created_at, t.updated_at
        FROM playlist_entries e
        INNER JOIN tracks t ON e.track_id = t.id
        WHERE e.playlist_id = ?
        ORDER BY e.position
        "#,
    )
    .bind(playlist_id.as_str())
    .fetch_all(pool)
    .await?;

    rows.iter().map(entry_from_row).collect()
}

/// Fetch a single entry with track details, if present
pub async fn get_entry(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    track_id: &TrackId,
) -> Result<Option<PlaylistEntry>> {
    let row = sqlx::query(
        r#"
        SELECT
            e.playlist_id, e.track_id, e.position, e.added_at, e.added_by,
            t.isrc, t.title, t.artist, t.album, t.duration_ms, t.cover_url,
            t.spotify_id, t.apple_music_id, t.youtube_music_id,
            t.created_at, t.updated_at
        FROM playlist_entries e
        INNER JOIN tracks t ON e.track_id = t.id
        WHERE e.playlist_id = ? AND e.track_id = ?
        "#,
    )
    .bind(playlist_id.as_str())
    .bind(track_id.as_str())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(entry_from_row).transpose()
}

// Helper functions

async fn ensure_playlist_exists(
    conn: &mut SqliteConnection,
    playlist_id: &PlaylistId,
) -> Result<()> {
    let exists = sqlx::query("SELECT 1 FROM playlists WHERE id = ?")
        .bind(playlist_id.as_str())
        .fetch_optional(&mut *conn)
        .await?
        .is_some();
    if exists {
        Ok(())
    } else {
        Err(SidebError::not_found("Playlist", playlist_id.as_str()))
    }
}

/// Adjust the denormalized count alongside a membership mutation, within
/// the same transaction
async fn bump_track_count(
    conn: &mut SqliteConnection,
    playlist_id: &PlaylistId,
    delta: i64,
) -> Result<()> {
    sqlx::query("UPDATE playlists SET track_count = track_count + ?, updated_at = ? WHERE id = ?")
        .bind(delta)
        .bind(Utc::now().timestamp())
        .bind(playlist_id.as_str())
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn touch_playlist(conn: &mut SqliteConnection, playlist_id: &PlaylistId) -> Result<()> {
    sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ?")
        .bind(Utc::now().timestamp())
        .bind(playlist_id.as_str())
        .execute(&mut *conn)
        .await?;
    Ok(())
}

fn entry_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<PlaylistEntry> {
    Ok(PlaylistEntry {
        playlist_id: row.get("playlist_id"),
        track_id: row.get("track_id"),
        position: row.get::<i64, _>("position") as u32,
        added_at: datetime(row.get("added_at"))?,
        added_by: row.get("added_by"),
        track: Some(sideb_core::Track {
            id: row.get("track_id"),
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
        }),
    })
}

fn datetime(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| SidebError::storage("Invalid timestamp"))
}
