//! # Database Store
//!
//! Database connection pool and repository implementations.

// region: --- Modules
pub mod appointment_repository;
pub mod conversation_repository;
pub mod message_repository;
pub mod models;
pub mod notification_repository;
pub mod user_repository;

#[cfg(test)]
pub(crate) mod test_support;
// endregion: --- Modules

// region: --- Re-exports
pub use appointment_repository::AppointmentRepository;
pub use conversation_repository::ConversationRepository;
pub use message_repository::MessageRepository;
pub use notification_repository::NotificationRepository;
pub use user_repository::UserRepository;
// endregion: --- Re-exports

// region: --- Types and Functions
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::env;

/// Type alias for SQLite connection pool.
pub type DbPool = SqlitePool;

/// Create a new SQLite connection pool.
pub async fn create_pool() -> anyhow::Result<DbPool> {
    let database_url = env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:data/dermacare.db".to_string());

    let options = database_url
        .parse::<SqliteConnectOptions>()?
        .create_if_missing(true);

    let pool = SqlitePool::connect_with(options).await?;

    Ok(pool)
}
// endregion: --- Types and Functions
