//! # Realtime Chat
//!
//! The realtime side of patient/dermatologist messaging: the websocket
//! endpoint, the per-user connection registry, and the dispatcher that
//! persists and routes every inbound message.

// region: --- Modules
pub mod dispatcher;
pub mod registry;
pub mod socket;

#[cfg(test)]
pub(crate) mod test_support;
// endregion: --- Modules

// region: --- Re-exports
pub use dispatcher::{DispatchError, Dispatcher};
pub use registry::ConnectionRegistry;
pub use socket::chat_websocket;
// endregion: --- Re-exports

use lib_core::{Config, DbPool};

/// Application state for the chat routes.
pub struct ChatAppState {
    pub db: DbPool,
    pub config: Config,
    pub registry: ConnectionRegistry,
}

impl ChatAppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        Self {
            db,
            config,
            registry: ConnectionRegistry::new(),
        }
    }
}

impl axum::extract::FromRef<ChatAppState> for DbPool {
    fn from_ref(state: &ChatAppState) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<ChatAppState> for Config {
    fn from_ref(state: &ChatAppState) -> Self {
        state.config.clone()
    }
}
