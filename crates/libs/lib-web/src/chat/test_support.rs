//! Shared helpers for chat and handler tests: in-memory SQLite pool with the
//! application schema plus seed data.

use lib_core::model::store::models::{Role, UserForCreate};
use lib_core::model::store::{ConversationRepository, UserRepository};
use lib_core::DbPool;
use sqlx::sqlite::SqlitePoolOptions;

/// Schema mirroring `backend/migrations/0001_initial.sql`.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'USER',
    account_status TEXT NOT NULL DEFAULT 'APPROVED',
    avatar_url TEXT,
    is_active BOOLEAN NOT NULL DEFAULT 1,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS conversations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    dermatologist_id INTEGER NOT NULL REFERENCES users(id),
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    CHECK (user_id <> dermatologist_id),
    UNIQUE (user_id, dermatologist_id)
);

CREATE TABLE IF NOT EXISTS messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    conversation_id INTEGER NOT NULL REFERENCES conversations(id),
    sender_id INTEGER NOT NULL REFERENCES users(id),
    content TEXT NOT NULL,
    read BOOLEAN NOT NULL DEFAULT 0,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS notifications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    kind TEXT NOT NULL,
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    read BOOLEAN NOT NULL DEFAULT 0,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS appointments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    dermatologist_id INTEGER NOT NULL REFERENCES users(id),
    scheduled_at TIMESTAMP NOT NULL,
    notes TEXT,
    status TEXT NOT NULL DEFAULT 'PENDING',
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#;

/// Setup an in-memory test database with the application schema.
pub async fn setup_chat_db() -> DbPool {
    let pool = SqlitePoolOptions::new()
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    for statement in SCHEMA.split(';') {
        if statement.trim().is_empty() {
            continue;
        }
        sqlx::query(statement)
            .execute(&pool)
            .await
            .expect("Failed to create schema");
    }

    pool
}

/// Insert a user and return its id.
pub async fn seed_user(pool: &DbPool, username: &str, role: Role) -> i64 {
    UserRepository::create(
        pool,
        UserForCreate::new(
            username.to_string(),
            format!("{}@example.com", username),
            "hashed-password".to_string(),
            role,
        ),
    )
    .await
    .expect("Failed to seed user")
    .id
}

/// Set up a database with one patient, one dermatologist, and a conversation
/// between them. Returns `(pool, patient_id, dermatologist_id, conversation_id)`.
pub async fn seed_conversation() -> (DbPool, i64, i64, i64) {
    let pool = setup_chat_db().await;
    let patient = seed_user(&pool, "alice", Role::User).await;
    let derm = seed_user(&pool, "drsmith", Role::Dermatologist).await;
    let convo = ConversationRepository::find_or_create(&pool, patient, derm)
        .await
        .expect("Failed to seed conversation");
    (pool, patient, derm, convo.id)
}
