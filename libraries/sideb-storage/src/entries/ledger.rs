//! Position arithmetic for playlist membership rows.
//!
//! Every function here runs inside a caller-supplied transaction and
//! renumbers rows with bulk `UPDATE`s only. Because the schema enforces
//! `UNIQUE(playlist_id, position)`, a plain `position = position + 1`
//! sweep could collide with a not-yet-shifted neighbor mid-statement, so
//! every shift is two-phase: park the affected range in negative space,
//! then land it on the final values. Negative positions exist only inside
//! a transaction; committed rows are always `0..N-1`.
//!
//! Callers are responsible for precondition checks (existence, bounds,
//! duplicates) and for keeping `playlists.track_count` in step within the
//! same transaction.

use chrono::{DateTime, Utc};
use sideb_core::{PlaylistId, Result, SidebError, TrackId, UserId};
use sqlx::{Row, SqliteConnection};

/// Sentinel the moving row is parked at during [`move_to`]. The staged
/// shift range is always `<= -2`, so the two can never collide.
const DETACHED: i64 = -1;

/// Live membership count for a playlist
pub async fn member_count(conn: &mut SqliteConnection, playlist_id: &PlaylistId) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM playlist_entries WHERE playlist_id = ?")
        .bind(playlist_id.as_str())
        .fetch_one(&mut *conn)
        .await?;
    Ok(row.get("n"))
}

/// Current position of a membership row, if the track is a member
pub async fn position_of(
    conn: &mut SqliteConnection,
    playlist_id: &PlaylistId,
    track_id: &TrackId,
) -> Result<Option<i64>> {
    let row =
        sqlx::query("SELECT position FROM playlist_entries WHERE playlist_id = ? AND track_id = ?")
            .bind(playlist_id.as_str())
            .bind(track_id.as_str())
            .fetch_optional(&mut *conn)
            .await?;
    Ok(row.map(|r| r.get("position")))
}

/// Shift every row at or above `position` up by one and insert the new
/// membership row there.
///
/// The caller has already verified that the track is not a member and that
/// `0 <= position <= N`.
pub async fn insert_at(
    conn: &mut SqliteConnection,
    playlist_id: &PlaylistId,
    track_id: &TrackId,
    position: i64,
    added_by: &UserId,
    added_at: DateTime<Utc>,
) -> Result<()> {
    // Stage: p -> -(p + 1)
    sqlx::query(
        "UPDATE playlist_entries SET position = -(position + 1) \
         WHERE playlist_id = ? AND position >= ?",
    )
    .bind(playlist_id.as_str())
    .bind(position)
    .execute(&mut *conn)
    .await?;

    // Land: -(p + 1) -> p + 1
    sqlx::query(
        "UPDATE playlist_entries SET position = -position \
         WHERE playlist_id = ? AND position < 0",
    )
    .bind(playlist_id.as_str())
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        "INSERT INTO playlist_entries (playlist_id, track_id, position, added_at, added_by) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(playlist_id.as_str())
    .bind(track_id.as_str())
    .bind(position)
    .bind(added_at.timestamp())
    .bind(added_by.as_str())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Delete the membership row and close the gap it leaves. Returns the
/// removed row's position.
///
/// Signals `NotFound` if the track is not a member.
pub async fn remove_at(
    conn: &mut SqliteConnection,
    playlist_id: &PlaylistId,
    track_id: &TrackId,
) -> Result<i64> {
    let removed = position_of(conn, playlist_id, track_id)
        .await?
        .ok_or_else(|| SidebError::not_found("Playlist track", track_id.as_str()))?;

    sqlx::query("DELETE FROM playlist_entries WHERE playlist_id = ? AND track_id = ?")
        .bind(playlist_id.as_str())
        .bind(track_id.as_str())
        .execute(&mut *conn)
        .await?;

    // Stage: p -> -(p + 1)
    sqlx::query(
        "UPDATE playlist_entries SET position = -(position + 1) \
         WHERE playlist_id = ? AND position > ?",
    )
    .bind(playlist_id.as_str())
    .bind(removed)
    .execute(&mut *conn)
    .await?;

    // Land: -(p + 1) -> p - 1
    sqlx::query(
        "UPDATE playlist_entries SET position = -position - 2 \
         WHERE playlist_id = ? AND position < 0",
    )
    .bind(playlist_id.as_str())
    .execute(&mut *conn)
    .await?;

    Ok(removed)
}

/// Relocate one membership row from `old_position` to `new_position`.
///
/// Three steps: detach the row to the sentinel, shift the affected range
/// toward the vacated slot, place the row at its target. The caller has
/// already verified membership, bounds, and `new_position != old_position`.
pub async fn move_to(
    conn: &mut SqliteConnection,
    playlist_id: &PlaylistId,
    track_id: &TrackId,
    old_position: i64,
    new_position: i64,
) -> Result<()> {
    // Detach
    sqlx::query("UPDATE playlist_entries SET position = ? WHERE playlist_id = ? AND track_id = ?")
        .bind(DETACHED)
        .bind(playlist_id.as_str())
        .bind(track_id.as_str())
        .execute(&mut *conn)
        .await?;

    if new_position > old_position {
        // Moving forward: (old, new] steps down one.
        // Stage: p -> -(p + 2), land: -(p + 2) -> p - 1
        sqlx::query(
            "UPDATE playlist_entries SET position = -(position + 2) \
             WHERE playlist_id = ? AND position > ? AND position <= ?",
        )
        .bind(playlist_id.as_str())
        .bind(old_position)
        .bind(new_position)
        .execute(&mut *conn)
        .await?;

        sqlx::query(
            "UPDATE playlist_entries SET position = -position - 3 \
             WHERE playlist_id = ? AND position <= -2",
        )
        .bind(playlist_id.as_str())
        .execute(&mut *conn)
        .await?;
    } else {
        // Moving backward: [new, old) steps up one.
        // Stage: p -> -(p + 2), land: -(p + 2) -> p + 1
        sqlx::query(
            "UPDATE playlist_entries SET position = -(position + 2) \
             WHERE playlist_id = ? AND position >= ? AND position < ?",
        )
        .bind(playlist_id.as_str())
        .bind(new_position)
        .bind(old_position)
        .execute(&mut *conn)
        .await?;

        sqlx::query(
            "UPDATE playlist_entries SET position = -position - 1 \
             WHERE playlist_id = ? AND position <= -2",
        )
        .bind(playlist_id.as_str())
        .execute(&mut *conn)
        .await?;
    }

    // Place
    sqlx::query("UPDATE playlist_entries SET position = ? WHERE playlist_id = ? AND position = ?")
        .bind(new_position)
        .bind(playlist_id.as_str())
        .bind(DETACHED)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Renumber a playlist's surviving rows to `0..N-1`, preserving relative
/// order. Used after bulk row loss (a track cascade-delete).
pub async fn renumber(conn: &mut SqliteConnection, playlist_id: &PlaylistId) -> Result<()> {
    sqlx::query(
        "UPDATE playlist_entries SET position = -(position + 1) \
         WHERE playlist_id = ?",
    )
    .bind(playlist_id.as_str())
    .execute(&mut *conn)
    .await?;

    // Staged values invert the order, so DESC walks the original ordering
    let rows = sqlx::query(
        "SELECT track_id FROM playlist_entries WHERE playlist_id = ? ORDER BY position DESC",
    )
    .bind(playlist_id.as_str())
    .fetch_all(&mut *conn)
    .await?;

    for (rank, row) in rows.iter().enumerate() {
        let track_id: String = row.get("track_id");
        sqlx::query(
            "UPDATE playlist_entries SET position = ? WHERE playlist_id = ? AND track_id = ?",
        )
        .bind(rank as i64)
        .bind(playlist_id.as_str())
        .bind(track_id)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}
