//! Board Mutation Handlers
//!
//! The two mutations Lightpost supports: `pin` (create a board) and
//! `reply` (append to a board's reply sequence). Both follow the same
//! path: validate, persist, then fan the complete persisted row out to
//! every connected channel - exactly once per successful mutation.
//!
//! This core is shared by both transports. The WebSocket dispatch and
//! the REST `/pin` / `/reply` handlers call the same two functions, so
//! a mutation broadcasts identically no matter how it arrived.
//! Mutations run to completion once submitted; there is no mid-flight
//! cancellation.

use sqlx::SqlitePool;

use crate::backend::boards::store;
use crate::backend::error::ApiError;
use crate::backend::realtime::ConnectionRegistry;
use crate::shared::{Board, BoardUpdate, ServerEvent, UpdateAction};

/// Pin a new board for the authenticated user.
///
/// Text and location must be non-empty after trimming; both are stored
/// trimmed. The new board starts with an empty reply sequence and a
/// blank meetup field.
///
/// # Errors
///
/// * `ApiError::Validation` - empty text or location
/// * `ApiError::Store` - persistence failure (nothing is broadcast)
pub async fn pin_board(
    pool: &SqlitePool,
    registry: &ConnectionRegistry,
    user_id: i64,
    text: &str,
    location: &str,
) -> Result<Board, ApiError> {
    let text = text.trim();
    let location = location.trim();

    if text.is_empty() || location.is_empty() {
        return Err(ApiError::validation("Missing text or location"));
    }

    let board = store::insert_board(pool, user_id, text, location).await?;
    tracing::info!("User {} pinned board {}", user_id, board.id);

    registry
        .broadcast(ServerEvent::BoardUpdate(BoardUpdate {
            action: UpdateAction::Add,
            data: board.clone(),
        }))
        .await;

    Ok(board)
}

/// Append a reply to an existing board.
///
/// The reply must be non-empty after trimming and is stored trimmed.
/// A failed mutation - unknown board, empty reply, store error -
/// produces no broadcast.
///
/// # Errors
///
/// * `ApiError::Validation` - empty reply text
/// * `ApiError::NotFound` - no board with that id
/// * `ApiError::Store` - persistence failure
pub async fn add_reply(
    pool: &SqlitePool,
    registry: &ConnectionRegistry,
    user_id: i64,
    board_id: i64,
    reply: &str,
) -> Result<Board, ApiError> {
    let reply = reply.trim();

    if reply.is_empty() {
        return Err(ApiError::validation("Missing id or reply"));
    }

    let board = store::append_reply(pool, board_id, reply).await?;
    tracing::info!("User {} replied to board {}", user_id, board_id);

    registry
        .broadcast(ServerEvent::BoardUpdate(BoardUpdate {
            action: UpdateAction::Reply,
            data: board.clone(),
        }))
        .await;

    Ok(board)
}
