//! User profiles. Registration and authentication live with the auth
//! collaborator; storage only knows profile rows.

use chrono::{DateTime, Utc};
use sideb_core::{Page, PageRequest, Result, SidebError, UpdateUser, User, UserId};
use sqlx::{Row, SqlitePool};

const USER_COLUMNS: &str =
    "id, username, display_name, bio, profile_image, created_at, updated_at";

/// Create a user with a fresh ID. The username must be free.
pub async fn create(pool: &SqlitePool, username: &str) -> Result<User> {
    if !is_username_available(pool, username).await? {
        return Err(SidebError::conflict("Username already taken"));
    }

    let user = User::new(username);

    sqlx::query(
        "INSERT INTO users (id, username, display_name, bio, profile_image, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user.id.as_str())
    .bind(&user.username)
    .bind(&user.display_name)
    .bind(&user.bio)
    .bind(&user.profile_image)
    .bind(user.created_at.timestamp())
    .bind(user.updated_at.timestamp())
    .execute(pool)
    .await?;

    get_by_id(pool, user.id)
        .await?
        .ok_or_else(|| SidebError::storage("Failed to retrieve created user"))
}

/// List users, newest first
pub async fn list(pool: &SqlitePool, page: PageRequest) -> Result<Page<User>> {
    let total: i64 = sqlx::query("SELECT COUNT(*) AS n FROM users")
        .fetch_one(pool)
        .await?
        .get("n");

    let rows = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC LIMIT ? OFFSET ?"
    ))
    .bind(i64::from(page.limit))
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let users = rows.iter().map(user_from_row).collect::<Result<_>>()?;
    Ok(Page::new(users, total as u64, page))
}

/// Get user by ID
pub async fn get_by_id(pool: &SqlitePool, id: UserId) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Get user by username
pub async fn get_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Case-insensitive substring search over username and display name
pub async fn search(pool: &SqlitePool, query: &str, page: PageRequest) -> Result<Page<User>> {
    let pattern = format!("%{}%", query);

    let total: i64 = sqlx::query(
        "SELECT COUNT(*) AS n FROM users WHERE username LIKE ? OR display_name LIKE ?",
    )
    .bind(&pattern)
    .bind(&pattern)
    .fetch_one(pool)
    .await?
    .get("n");

    let rows = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users \
         WHERE username LIKE ? OR display_name LIKE ? \
         ORDER BY username LIMIT ? OFFSET ?"
    ))
    .bind(&pattern)
    .bind(&pattern)
    .bind(i64::from(page.limit))
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let users = rows.iter().map(user_from_row).collect::<Result<_>>()?;
    Ok(Page::new(users, total as u64, page))
}

/// Update profile fields; `None` leaves a field unchanged
pub async fn update(pool: &SqlitePool, id: UserId, update: UpdateUser) -> Result<User> {
    let existing = get_by_id(pool, id.clone())
        .await?
        .ok_or_else(|| SidebError::not_found("User", id.as_str()))?;

    let display_name = update.display_name.or(existing.display_name);
    let bio = update.bio.or(existing.bio);
    let profile_image = update.profile_image.or(existing.profile_image);

    sqlx::query(
        "UPDATE users SET display_name = ?, bio = ?, profile_image = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(&display_name)
    .bind(&bio)
    .bind(&profile_image)
    .bind(Utc::now().timestamp())
    .bind(id.as_str())
    .execute(pool)
    .await?;

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| SidebError::storage("Failed to retrieve updated user"))
}

/// Whether no user holds this username yet
pub async fn is_username_available(pool: &SqlitePool, username: &str) -> Result<bool> {
    let row = sqlx::query("SELECT 1 FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_none())
}

// Helper functions

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    Ok(User {
        id: row.get("id"),
        username: row.get("username"),
        display_name: row.get("display_name"),
        bio: row.get("bio"),
        profile_image: row.get("profile_image"),
        created_at: datetime(row.get("created_at"))?,
        updated_at: datetime(row.get("updated_at"))?,
    })
}

fn datetime(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| SidebError::storage("Invalid timestamp"))
}
