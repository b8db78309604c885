//! # Message Repository
//!
//! Database access for chat messages, including the sender-enriched rows the
//! realtime layer delivers to recipients.

use super::DbPool;
use crate::dto::chat::MessageWithSender;
use sqlx::query_as;

/// Message repository for database operations.
pub struct MessageRepository;

impl MessageRepository {
    /// Insert a message and return it joined with the sender's profile.
    ///
    /// Messages are always created unread; the recipient flips the flag by
    /// fetching the conversation history.
    pub async fn create_with_sender(
        pool: &DbPool,
        conversation_id: i64,
        sender_id: i64,
        content: &str,
    ) -> Result<MessageWithSender, sqlx::Error> {
        let message_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO messages (conversation_id, sender_id, content, read, created_at)
            VALUES (?, ?, ?, 0, CURRENT_TIMESTAMP)
            RETURNING id
            "#,
        )
        .bind(conversation_id)
        .bind(sender_id)
        .bind(content)
        .fetch_one(pool)
        .await?;

        query_as::<_, MessageWithSender>(
            r#"
            SELECT m.id, m.conversation_id, m.sender_id, m.content, m.read, m.created_at,
                   u.username AS sender_username, u.avatar_url AS sender_avatar_url
            FROM messages m
            JOIN users u ON u.id = m.sender_id
            WHERE m.id = ?
            "#,
        )
        .bind(message_id)
        .fetch_one(pool)
        .await
    }

    /// Full history of a conversation in send order, oldest first, with each
    /// sender's profile attached.
    pub async fn list_with_senders(
        pool: &DbPool,
        conversation_id: i64,
    ) -> Result<Vec<MessageWithSender>, sqlx::Error> {
        query_as::<_, MessageWithSender>(
            r#"
            SELECT m.id, m.conversation_id, m.sender_id, m.content, m.read, m.created_at,
                   u.username AS sender_username, u.avatar_url AS sender_avatar_url
            FROM messages m
            JOIN users u ON u.id = m.sender_id
            WHERE m.conversation_id = ?
            ORDER BY m.id ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(pool)
        .await
    }

    /// Mark every message in the conversation that the reader did not send as
    /// read. Returns the number of rows flipped; repeat calls are no-ops.
    pub async fn mark_read_excluding(
        pool: &DbPool,
        conversation_id: i64,
        reader_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE messages SET read = 1 WHERE conversation_id = ? AND sender_id <> ? AND read = 0",
        )
        .bind(conversation_id)
        .bind(reader_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
