//! Connection Registry and Fan-out
//!
//! The process-wide table of currently connected channels. Connections
//! are inserted when their handshake succeeds and removed when they
//! disconnect; the mutation core receives the registry by injection
//! and fans every update out through it.
//!
//! Broadcasts go to **every** registered connection, including the one
//! that issued the triggering mutation - the sender's echo is how a
//! client learns the server-assigned board id, and the client's own
//! duplicate suppression makes the echo safe. There is no delivery
//! confirmation: a channel that is gone simply misses the update.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::shared::ServerEvent;

/// One registered channel: the user bound at handshake and the sender
/// half of the connection's outbound queue.
#[derive(Debug)]
struct ConnectionHandle {
    user_id: i64,
    tx: mpsc::UnboundedSender<ServerEvent>,
}

/// Registry of currently connected channels.
///
/// Cheap to clone; all clones share the same table.
#[derive(Clone)]
pub struct ConnectionRegistry {
    inner: Arc<RwLock<HashMap<Uuid, ConnectionHandle>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a connection for a handshake-bound user.
    ///
    /// Returns the connection id and the receiver half of the outbound
    /// queue; the channel task forwards received events to the socket.
    pub async fn register(&self, user_id: i64) -> (Uuid, mpsc::UnboundedReceiver<ServerEvent>) {
        let conn_id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner
            .write()
            .await
            .insert(conn_id, ConnectionHandle { user_id, tx });
        (conn_id, rx)
    }

    /// Remove a connection. Idempotent.
    pub async fn deregister(&self, conn_id: Uuid) {
        self.inner.write().await.remove(&conn_id);
    }

    /// Whether a connection is still registered with a bound identity
    pub async fn is_registered(&self, conn_id: Uuid) -> bool {
        self.inner.read().await.contains_key(&conn_id)
    }

    /// User id bound to a connection at handshake, if still registered
    pub async fn bound_user(&self, conn_id: Uuid) -> Option<i64> {
        self.inner.read().await.get(&conn_id).map(|h| h.user_id)
    }

    /// Broadcast an event to every registered connection, sender
    /// included. Returns how many connections were handed the event;
    /// connections whose receiver is gone are skipped silently.
    pub async fn broadcast(&self, event: ServerEvent) -> usize {
        let connections = self.inner.read().await;
        let mut delivered = 0;
        for handle in connections.values() {
            if handle.tx.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }
        tracing::debug!("broadcast delivered to {delivered} connection(s)");
        delivered
    }

    /// Send an event to a single connection. Returns false if the
    /// connection is not registered or its receiver is gone.
    pub async fn send_to(&self, conn_id: Uuid, event: ServerEvent) -> bool {
        let connections = self.inner.read().await;
        match connections.get(&conn_id) {
            Some(handle) => handle.tx.send(event).is_ok(),
            None => false,
        }
    }

    /// Number of currently registered connections
    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_event(message: &str) -> ServerEvent {
        ServerEvent::Error {
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_including_sender() {
        let registry = ConnectionRegistry::new();
        let (_id_a, mut rx_a) = registry.register(1).await;
        let (_id_b, mut rx_b) = registry.register(2).await;
        // Same user connected twice: each connection hears broadcasts.
        let (_id_c, mut rx_c) = registry.register(1).await;

        let delivered = registry.broadcast(error_event("hello")).await;
        assert_eq!(delivered, 3);

        assert_eq!(rx_a.recv().await.unwrap(), error_event("hello"));
        assert_eq!(rx_b.recv().await.unwrap(), error_event("hello"));
        assert_eq!(rx_c.recv().await.unwrap(), error_event("hello"));
    }

    #[tokio::test]
    async fn test_deregistered_connection_misses_updates() {
        let registry = ConnectionRegistry::new();
        let (id_a, mut rx_a) = registry.register(1).await;
        let (_id_b, mut rx_b) = registry.register(2).await;

        registry.deregister(id_a).await;
        assert!(!registry.is_registered(id_a).await);

        let delivered = registry.broadcast(error_event("late")).await;
        assert_eq!(delivered, 1);
        assert_eq!(rx_b.recv().await.unwrap(), error_event("late"));
        // Sender side was dropped with the handle; nothing pending.
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_send_to_targets_one_connection() {
        let registry = ConnectionRegistry::new();
        let (id_a, mut rx_a) = registry.register(1).await;
        let (_id_b, mut rx_b) = registry.register(2).await;

        assert!(registry.send_to(id_a, error_event("just you")).await);
        assert_eq!(rx_a.recv().await.unwrap(), error_event("just you"));
        assert!(rx_b.try_recv().is_err());

        assert!(!registry.send_to(Uuid::new_v4(), error_event("nobody")).await);
    }

    #[tokio::test]
    async fn test_bound_user_survives_for_connection_lifetime() {
        let registry = ConnectionRegistry::new();
        let (conn_id, _rx) = registry.register(42).await;

        assert_eq!(registry.bound_user(conn_id).await, Some(42));
        registry.deregister(conn_id).await;
        assert_eq!(registry.bound_user(conn_id).await, None);
    }

    #[tokio::test]
    async fn test_connection_count() {
        let registry = ConnectionRegistry::new();
        assert_eq!(registry.connection_count().await, 0);
        let (id, _rx) = registry.register(1).await;
        assert_eq!(registry.connection_count().await, 1);
        registry.deregister(id).await;
        assert_eq!(registry.connection_count().await, 0);
    }
}
