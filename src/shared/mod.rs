//! Shared Types
//!
//! Board rows and the wire-level events exchanged over the real-time
//! channel. Both the backend and the client reconciler depend on these
//! definitions, so the serialized shapes here are the protocol.

/// Board rows and channel events
pub mod board;

pub use board::{Board, BoardUpdate, ClientEvent, ServerEvent, UpdateAction};
