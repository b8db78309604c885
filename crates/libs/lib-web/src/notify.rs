//! # Notification Fan-out
//!
//! Best-effort durable notification writes.
//!
//! Notifications are a side channel: an appointment booking or a moderation
//! decision must never fail because the notification row could not be
//! written. [`best_effort`] therefore swallows database errors after logging
//! them, and callers do not get a `Result` back. Anything that must not be
//! lost does not belong here.

use lib_core::model::store::models::NotificationKind;
use lib_core::model::store::NotificationRepository;
use lib_core::DbPool;
use tracing::warn;

/// Write a notification for `user_id`, logging and swallowing any failure.
pub async fn best_effort(
    db: &DbPool,
    user_id: i64,
    kind: NotificationKind,
    title: &str,
    body: &str,
) {
    if let Err(e) = NotificationRepository::create(db, user_id, kind, title, body).await {
        warn!(
            user_id,
            kind = %kind,
            title,
            error = %e,
            "[NOTIFY] Failed to write notification"
        );
    }
}
