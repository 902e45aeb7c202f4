//! Board Rows and Channel Events
//!
//! The `Board` struct is the complete served row: the persisted columns
//! joined with the author's username, with the reply sequence decoded
//! from its at-rest JSON encoding. Channel traffic is JSON text frames
//! shaped `{"event": ..., "data": ...}`; the enums below carry that
//! tagging in their serde attributes.

use serde::{Deserialize, Serialize};

/// A pinned notice, as served to clients.
///
/// `id` is assigned by the store at creation, immutable, and
/// monotonically increasing. `replies` is an ordered sequence in
/// insertion order, never null - empty at creation. `meetup` is
/// carried but unused by business logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: i64,
    pub user_id: i64,
    /// Author's username, joined in from the users table on every read
    pub username: String,
    pub text: String,
    pub location: String,
    pub replies: Vec<String>,
    pub meetup: String,
}

/// Which mutation produced a `BoardUpdate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateAction {
    /// A new board was pinned
    Add,
    /// A reply was appended to an existing board
    Reply,
}

/// One fan-out payload: the action plus the complete, authoritative
/// board row after the mutation. Never a delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardUpdate {
    pub action: UpdateAction,
    pub data: Board,
}

/// Client-to-server channel events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Pin a new board
    #[serde(rename = "pinBoard")]
    PinBoard { text: String, location: String },

    /// Append a reply to an existing board
    #[serde(rename = "addReply")]
    AddReply { id: i64, reply: String },
}

/// Server-to-client channel events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Broadcast to every connected channel after a successful mutation
    #[serde(rename = "boardUpdate")]
    BoardUpdate(BoardUpdate),

    /// Emitted only to the offending connection when its identity
    /// binding is missing
    #[serde(rename = "error")]
    Error { message: String },
}
