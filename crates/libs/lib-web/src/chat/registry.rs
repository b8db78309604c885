//! # Connection Registry
//!
//! Tracks which users currently hold live websocket connections.
//!
//! Each user owns an inbox keyed by user id; a user with several open tabs
//! has several entries in their inbox, and an event delivered to the user is
//! fanned out to every one of them. Connections are identified by a UUID so
//! closing one tab never tears down the others.

use lib_core::dto::chat::ServerEvent;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;
use uuid::Uuid;

type Inbox = HashMap<Uuid, mpsc::UnboundedSender<ServerEvent>>;

/// Registry of live websocket connections, keyed by user id.
///
/// Cheap to clone; all clones share the same underlying map.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    inner: Arc<RwLock<HashMap<i64, Inbox>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to the user's inbox and return its id.
    pub async fn register(
        &self,
        user_id: i64,
        tx: mpsc::UnboundedSender<ServerEvent>,
    ) -> Uuid {
        let conn_id = Uuid::new_v4();
        let mut inner = self.inner.write().await;
        inner.entry(user_id).or_default().insert(conn_id, tx);
        debug!(user_id, %conn_id, "[REGISTRY] Connection registered");
        conn_id
    }

    /// Remove a connection. The user's inbox is dropped entirely once its
    /// last connection goes away.
    pub async fn unregister(&self, user_id: i64, conn_id: Uuid) {
        let mut inner = self.inner.write().await;
        if let Some(inbox) = inner.get_mut(&user_id) {
            inbox.remove(&conn_id);
            if inbox.is_empty() {
                inner.remove(&user_id);
            }
        }
        debug!(user_id, %conn_id, "[REGISTRY] Connection unregistered");
    }

    /// Deliver an event to every live connection the user holds. Returns the
    /// number of connections reached; zero means the user is offline and the
    /// event is simply dropped (it is already persisted).
    pub async fn deliver(&self, user_id: i64, event: ServerEvent) -> usize {
        let inner = self.inner.read().await;
        let Some(inbox) = inner.get(&user_id) else {
            return 0;
        };

        let mut delivered = 0;
        for tx in inbox.values() {
            // A send error means the receiving task already dropped; the
            // owning socket task unregisters itself on shutdown.
            if tx.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Whether the user has at least one live connection.
    pub async fn is_online(&self, user_id: i64) -> bool {
        self.inner.read().await.contains_key(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> ServerEvent {
        ServerEvent::Error {
            message: "ping".to_string(),
        }
    }

    #[tokio::test]
    async fn test_deliver_fans_out_to_all_connections() {
        let registry = ConnectionRegistry::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();

        registry.register(1, tx_a).await;
        registry.register(1, tx_b).await;

        assert_eq!(registry.deliver(1, event()).await, 2);
        assert!(rx_a.recv().await.is_some());
        assert!(rx_b.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_deliver_to_offline_user_reaches_nobody() {
        let registry = ConnectionRegistry::new();
        assert_eq!(registry.deliver(42, event()).await, 0);
        assert!(!registry.is_online(42).await);
    }

    #[tokio::test]
    async fn test_unregister_removes_only_one_connection() {
        let registry = ConnectionRegistry::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, _rx_b) = mpsc::unbounded_channel();

        let conn_a = registry.register(7, tx_a).await;
        let conn_b = registry.register(7, tx_b).await;

        registry.unregister(7, conn_b).await;
        assert!(registry.is_online(7).await);
        assert_eq!(registry.deliver(7, event()).await, 1);
        assert!(rx_a.recv().await.is_some());

        registry.unregister(7, conn_a).await;
        assert!(!registry.is_online(7).await);
    }
}
