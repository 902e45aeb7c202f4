//! Board View Reconciliation
//!
//! Client-side merge of the REST snapshot with the live update stream.
//! The view walks a small session state machine:
//!
//! ```text
//! LoggedOut -> SnapshotLoading -> Live -> LoggedOut
//! ```
//!
//! On login the client fetches the full board list, seeds the view
//! with it, and goes live; from then on every `boardUpdate` event is
//! merged in. The merge rules are deliberately asymmetric:
//!
//! - **add**: insert only if the id is not already present. The client
//!   receives the broadcast of its own pin *and* may have fetched a
//!   snapshot that already contains it, in either order - the id check
//!   makes both orders converge.
//! - **reply**: replace the matching row wholesale. The payload is the
//!   complete authoritative row; merging reply sequences locally would
//!   duplicate elements. The last update *received* wins, which is the
//!   accepted best-effort model here.
//!
//! On logout the view drops all rows and stops applying updates, so a
//! later session on the same client cannot inherit stale boards.

use crate::shared::{Board, BoardUpdate, UpdateAction};

/// Where the client session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No session; updates are ignored
    LoggedOut,
    /// Logged in, snapshot fetch in flight
    SnapshotLoading,
    /// Snapshot applied; live updates are merged
    Live,
}

/// The client's reconciled board list.
#[derive(Debug)]
pub struct BoardView {
    phase: SessionPhase,
    boards: Vec<Board>,
}

impl BoardView {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::LoggedOut,
            boards: Vec::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The current reconciled rows, snapshot order with later adds
    /// appended
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn board(&self, id: i64) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == id)
    }

    /// Start a session: the snapshot fetch is now in flight
    pub fn begin_session(&mut self) {
        self.phase = SessionPhase::SnapshotLoading;
        self.boards.clear();
    }

    /// Seed the view with the fetched snapshot and go live.
    ///
    /// Ignored when logged out (a late-arriving fetch after logout
    /// must not resurrect state). A repeat snapshot while live
    /// replaces the rows wholesale.
    pub fn apply_snapshot(&mut self, boards: Vec<Board>) {
        if self.phase == SessionPhase::LoggedOut {
            return;
        }
        self.boards = boards;
        self.phase = SessionPhase::Live;
    }

    /// Merge one live update. Only meaningful while live; in any other
    /// phase the update is dropped (the listener is detached).
    pub fn apply_update(&mut self, update: &BoardUpdate) {
        if self.phase != SessionPhase::Live {
            return;
        }

        match update.action {
            UpdateAction::Add => {
                if !self.boards.iter().any(|b| b.id == update.data.id) {
                    self.boards.push(update.data.clone());
                }
            }
            UpdateAction::Reply => {
                if let Some(board) = self.boards.iter_mut().find(|b| b.id == update.data.id) {
                    *board = update.data.clone();
                }
            }
        }
    }

    /// End the session: drop all rows and stop applying updates
    pub fn logout(&mut self) {
        self.phase = SessionPhase::LoggedOut;
        self.boards.clear();
    }
}

impl Default for BoardView {
    fn default() -> Self {
        Self::new()
    }
}
