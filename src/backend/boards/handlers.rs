//! Board REST Handlers
//!
//! The snapshot endpoint plus the REST equivalents of the two channel
//! mutations. All three sit behind the cookie auth middleware. The
//! mutation endpoints call the same core as the channel dispatch, so
//! they broadcast to connected channels exactly like a channel
//! mutation would.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::backend::boards::{mutations, store};
use crate::backend::error::ApiError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::Board;

/// REST body for `POST /pin`
#[derive(Debug, Deserialize)]
pub struct PinRequest {
    pub text: String,
    pub location: String,
}

/// REST body for `POST /reply`
#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub id: i64,
    pub reply: String,
}

/// `GET /boards` - the full snapshot, newest board first.
///
/// Clients fetch this once at session start and then reconcile the
/// stream of `boardUpdate` events against it.
pub async fn list_boards(State(app_state): State<AppState>) -> Result<Json<Vec<Board>>, ApiError> {
    let boards = store::list_boards(&app_state.db_pool).await?;
    Ok(Json(boards))
}

/// `POST /pin` - pin a board over plain request/response
pub async fn pin(
    AuthUser(user): AuthUser,
    State(app_state): State<AppState>,
    Json(request): Json<PinRequest>,
) -> Result<(StatusCode, Json<Board>), ApiError> {
    let board = mutations::pin_board(
        &app_state.db_pool,
        &app_state.registry,
        user.user_id,
        &request.text,
        &request.location,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(board)))
}

/// `POST /reply` - append a reply over plain request/response
pub async fn reply(
    AuthUser(user): AuthUser,
    State(app_state): State<AppState>,
    Json(request): Json<ReplyRequest>,
) -> Result<Json<Board>, ApiError> {
    let board = mutations::add_reply(
        &app_state.db_pool,
        &app_state.registry,
        user.user_id,
        request.id,
        &request.reply,
    )
    .await?;

    Ok(Json(board))
}
