//! Boards
//!
//! The board store, the shared mutation core, and the REST handlers.
//! A board is a pinned notice with an append-only reply sequence;
//! mutations validate, persist, then fan out the complete row.

/// REST handlers (snapshot + mutation equivalents)
pub mod handlers;

/// Mutation core shared by channel and REST transports
pub mod mutations;

/// Durable board storage
pub mod store;

pub use mutations::{add_reply, pin_board};
