//! # Conversation Repository
//!
//! Database access for patient/dermatologist conversation threads.

use super::models::Conversation;
use super::DbPool;
use crate::dto::chat::ConversationSummary;
use sqlx::query_as;

/// Conversation repository for database operations.
pub struct ConversationRepository;

impl ConversationRepository {
    /// Find a conversation by id.
    pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Conversation>, sqlx::Error> {
        query_as::<_, Conversation>("SELECT * FROM conversations WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the conversation for a (patient, dermatologist) pair, if any.
    pub async fn find_by_pair(
        pool: &DbPool,
        user_id: i64,
        dermatologist_id: i64,
    ) -> Result<Option<Conversation>, sqlx::Error> {
        query_as::<_, Conversation>(
            "SELECT * FROM conversations WHERE user_id = ? AND dermatologist_id = ?",
        )
        .bind(user_id)
        .bind(dermatologist_id)
        .fetch_optional(pool)
        .await
    }

    /// Get the existing conversation for a pair, or create it.
    ///
    /// The (user_id, dermatologist_id) pair carries a UNIQUE constraint, so a
    /// concurrent create from the other side loses the insert race; in that
    /// case the row the winner inserted is looked up and returned instead.
    pub async fn find_or_create(
        pool: &DbPool,
        user_id: i64,
        dermatologist_id: i64,
    ) -> Result<Conversation, sqlx::Error> {
        if let Some(existing) = Self::find_by_pair(pool, user_id, dermatologist_id).await? {
            return Ok(existing);
        }

        let inserted = query_as::<_, Conversation>(
            r#"
            INSERT INTO conversations (user_id, dermatologist_id, created_at, updated_at)
            VALUES (?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(dermatologist_id)
        .fetch_one(pool)
        .await;

        match inserted {
            Ok(conversation) => Ok(conversation),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                query_as::<_, Conversation>(
                    "SELECT * FROM conversations WHERE user_id = ? AND dermatologist_id = ?",
                )
                .bind(user_id)
                .bind(dermatologist_id)
                .fetch_one(pool)
                .await
            }
            Err(e) => Err(e),
        }
    }

    /// Bump a conversation's last-activity timestamp.
    ///
    /// Called on every message send so that conversation listings sort by
    /// recency.
    pub async fn touch(pool: &DbPool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE conversations SET updated_at = CURRENT_TIMESTAMP WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// List all conversations the user participates in, most recently active
    /// first, with the counterpart's profile, a last-message preview, and the
    /// count of messages the user has not read yet.
    pub async fn list_for_user(
        pool: &DbPool,
        user_id: i64,
    ) -> Result<Vec<ConversationSummary>, sqlx::Error> {
        query_as::<_, ConversationSummary>(
            r#"
            SELECT
                c.id,
                u.id AS partner_id,
                u.username AS partner_username,
                u.avatar_url AS partner_avatar_url,
                (SELECT m.content FROM messages m
                 WHERE m.conversation_id = c.id
                 ORDER BY m.id DESC LIMIT 1) AS last_message,
                (SELECT COUNT(*) FROM messages m
                 WHERE m.conversation_id = c.id AND m.sender_id <> ? AND m.read = 0) AS unread_count,
                c.updated_at
            FROM conversations c
            JOIN users u ON u.id = CASE WHEN c.user_id = ? THEN c.dermatologist_id ELSE c.user_id END
            WHERE c.user_id = ? OR c.dermatologist_id = ?
            ORDER BY c.updated_at DESC
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .bind(user_id)
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
