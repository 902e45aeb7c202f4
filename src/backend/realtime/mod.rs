//! Real-Time Layer
//!
//! The authenticated WebSocket channel and the connection registry the
//! fan-out runs through.

/// WebSocket upgrade, handshake auth, connection loop
pub mod channel;

/// Process-wide connection table + broadcast
pub mod registry;

pub use channel::handle_channel;
pub use registry::ConnectionRegistry;
