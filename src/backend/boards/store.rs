//! Board Store
//!
//! Durable record of boards and their reply lists. The reply sequence
//! is stored as a JSON-encoded array string and decoded on every read;
//! every read model row carries the author's username via a join.
//!
//! # Reply appends are atomic
//!
//! `append_reply` issues a single `json_insert(replies, '$[#]', ...)`
//! UPDATE - SQLite's native array append - instead of reading the
//! sequence, pushing in process, and writing it back. Two interleaved
//! replies to the same board therefore cannot overwrite each other's
//! element; the store serializes the appends.

use sqlx::SqlitePool;

use crate::backend::error::ApiError;
use crate::shared::Board;

/// Raw board row as stored: `replies` still JSON-encoded
#[derive(Debug, sqlx::FromRow)]
struct BoardRow {
    id: i64,
    user_id: i64,
    username: String,
    text: String,
    location: String,
    replies: String,
    meetup: String,
}

impl BoardRow {
    fn into_board(self) -> Result<Board, ApiError> {
        let replies: Vec<String> = serde_json::from_str(&self.replies)?;
        Ok(Board {
            id: self.id,
            user_id: self.user_id,
            username: self.username,
            text: self.text,
            location: self.location,
            replies,
            meetup: self.meetup,
        })
    }
}

const BOARD_SELECT: &str = r#"
    SELECT b.id, b.user_id, u.username, b.text, b.location, b.replies, b.meetup
    FROM boards b
    JOIN users u ON b.user_id = u.id
"#;

/// List every board, newest first, with usernames and decoded replies
pub async fn list_boards(pool: &SqlitePool) -> Result<Vec<Board>, ApiError> {
    let rows = sqlx::query_as::<_, BoardRow>(&format!("{BOARD_SELECT} ORDER BY b.id DESC"))
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(BoardRow::into_board).collect()
}

/// Fetch one board by id
pub async fn fetch_board(pool: &SqlitePool, board_id: i64) -> Result<Option<Board>, ApiError> {
    let row = sqlx::query_as::<_, BoardRow>(&format!("{BOARD_SELECT} WHERE b.id = ?1"))
        .bind(board_id)
        .fetch_optional(pool)
        .await?;

    row.map(BoardRow::into_board).transpose()
}

/// Insert a new board: empty reply sequence, blank meetup.
///
/// Returns the complete persisted row including the author's username.
pub async fn insert_board(
    pool: &SqlitePool,
    user_id: i64,
    text: &str,
    location: &str,
) -> Result<Board, ApiError> {
    let result = sqlx::query(
        "INSERT INTO boards (user_id, text, location, replies, meetup) VALUES (?1, ?2, ?3, '[]', '')",
    )
    .bind(user_id)
    .bind(text)
    .bind(location)
    .execute(pool)
    .await?;

    let board_id = result.last_insert_rowid();

    fetch_board(pool, board_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Board vanished after insert"))
}

/// Atomically append one reply to a board's sequence.
///
/// Returns the complete updated row.
///
/// # Errors
///
/// * `ApiError::NotFound` - no board with that id exists
pub async fn append_reply(
    pool: &SqlitePool,
    board_id: i64,
    reply: &str,
) -> Result<Board, ApiError> {
    let result =
        sqlx::query("UPDATE boards SET replies = json_insert(replies, '$[#]', ?1) WHERE id = ?2")
            .bind(reply)
            .bind(board_id)
            .execute(pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Board not found"));
    }

    fetch_board(pool, board_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Board not found"))
}
