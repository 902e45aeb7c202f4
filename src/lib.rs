//! Lightpost - community bulletin board with live synchronization.
//!
//! Users register, log in, pin short location-tagged notices ("boards"),
//! and reply to them. Updates are broadcast live to every connected
//! client over a cookie-authenticated WebSocket channel.
//!
//! # Modules
//!
//! - **`backend`** - Axum HTTP server: auth, board store, real-time
//!   channel, broadcast fan-out
//! - **`shared`** - board rows and wire events shared between the
//!   server and the client reconciler
//! - **`client`** - snapshot/stream reconciliation state machine

/// Server-side code: HTTP routes, auth, store, real-time channel
pub mod backend;

/// Client-side board view reconciliation
pub mod client;

/// Types shared between server and client
pub mod shared;
