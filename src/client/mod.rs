//! Client-Side Reconciliation
//!
//! Transport-free state for a Lightpost client: the reconciled board
//! view that merges the login-time snapshot with the live update
//! stream. IO (the HTTP fetch and the WebSocket) stays outside; this
//! module only decides how incoming data folds into local state.

/// Session state machine and board list merge rules
pub mod reconcile;

pub use reconcile::{BoardView, SessionPhase};
