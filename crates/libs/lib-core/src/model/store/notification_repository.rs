//! # Notification Repository
//!
//! Database access for durable per-user notifications. Every row is owned by
//! exactly one recipient; all reads and mutations are scoped by owner so one
//! user can never touch another's rows.

use super::models::{Notification, NotificationKind};
use super::DbPool;
use sqlx::query_as;

/// Notification repository for database operations.
pub struct NotificationRepository;

impl NotificationRepository {
    /// Insert a notification for a recipient.
    pub async fn create(
        pool: &DbPool,
        user_id: i64,
        kind: NotificationKind,
        title: &str,
        body: &str,
    ) -> Result<Notification, sqlx::Error> {
        query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, kind, title, body, read, created_at)
            VALUES (?, ?, ?, ?, 0, CURRENT_TIMESTAMP)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(kind.to_string())
        .bind(title)
        .bind(body)
        .fetch_one(pool)
        .await
    }

    /// All notifications owned by the user, newest first.
    pub async fn list_for_user(
        pool: &DbPool,
        user_id: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = ? ORDER BY id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Number of unread notifications owned by the user.
    pub async fn unread_count(pool: &DbPool, user_id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND read = 0",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Mark one notification read. Returns false when the row does not exist
    /// or belongs to someone else.
    pub async fn mark_read(pool: &DbPool, id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark every notification the user owns as read. Returns the number of
    /// rows flipped.
    pub async fn mark_all_read(pool: &DbPool, user_id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE user_id = ? AND read = 0")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete one notification. Returns false when the row does not exist or
    /// belongs to someone else.
    pub async fn delete(pool: &DbPool, id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
