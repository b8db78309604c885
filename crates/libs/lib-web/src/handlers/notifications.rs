//! # Notification Handlers
//!
//! HTTP endpoints for the durable notification inbox.
//!
//! ## Endpoints
//!
//! - `GET /api/notifications` - List the caller's notifications, newest first
//! - `GET /api/notifications/unread-count` - Count of unread notifications
//! - `POST /api/notifications/{id}/read` - Mark one notification read
//! - `POST /api/notifications/read-all` - Mark everything read
//! - `DELETE /api/notifications/{id}` - Delete one notification
//!
//! A notification owned by someone else is answered with 404, exactly like
//! one that does not exist.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use lib_auth::Claims;
use lib_core::dto::notification::{MarkAllReadResponse, UnreadCountResponse};
use lib_core::model::store::models::Notification;
use lib_core::model::store::NotificationRepository;
use lib_core::{AppError, DbPool};

/// List the caller's notifications, newest first.
pub async fn list_notifications(
    State(db): State<DbPool>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;
    let notifications = NotificationRepository::list_for_user(&db, user_id).await?;
    Ok(Json(notifications))
}

/// Count of the caller's unread notifications.
pub async fn unread_count(
    State(db): State<DbPool>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;
    let count = NotificationRepository::unread_count(&db, user_id).await?;
    Ok(Json(UnreadCountResponse { count }))
}

/// Mark one notification read. Read-marking is one-way.
pub async fn mark_read(
    State(db): State<DbPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;
    let updated = NotificationRepository::mark_read(&db, id, user_id).await?;
    if !updated {
        return Err(AppError::NotFound("Notification not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Mark every notification the caller owns as read.
pub async fn mark_all_read(
    State(db): State<DbPool>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<MarkAllReadResponse>, AppError> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;
    let updated = NotificationRepository::mark_all_read(&db, user_id).await?;
    Ok(Json(MarkAllReadResponse { updated }))
}

/// Delete one notification.
pub async fn delete_notification(
    State(db): State<DbPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;
    let deleted = NotificationRepository::delete(&db, id, user_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Notification not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::test_support::{seed_user, setup_chat_db};
    use lib_core::model::store::models::{NotificationKind, Role};

    fn claims_for(user_id: i64, username: &str) -> Claims {
        Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: "USER".to_string(),
            exp: i64::MAX,
            iat: 0,
        }
    }

    #[tokio::test]
    async fn test_inbox_flow() {
        let pool = setup_chat_db().await;
        let user = seed_user(&pool, "alice", Role::User).await;

        NotificationRepository::create(
            &pool,
            user,
            NotificationKind::Appointment,
            "Appointment Confirmed",
            "See you Tuesday.",
        )
        .await
        .expect("create should succeed");

        let Json(count) = unread_count(State(pool.clone()), Extension(claims_for(user, "alice")))
            .await
            .expect("count should succeed");
        assert_eq!(count.count, 1);

        let Json(listing) =
            list_notifications(State(pool.clone()), Extension(claims_for(user, "alice")))
                .await
                .expect("list should succeed");
        assert_eq!(listing.len(), 1);

        let status = mark_read(
            State(pool.clone()),
            Extension(claims_for(user, "alice")),
            Path(listing[0].id),
        )
        .await
        .expect("mark read should succeed");
        assert_eq!(status, StatusCode::NO_CONTENT);

        let Json(count) = unread_count(State(pool), Extension(claims_for(user, "alice")))
            .await
            .expect("count should succeed");
        assert_eq!(count.count, 0);
    }

    #[tokio::test]
    async fn test_foreign_notification_is_404() {
        let pool = setup_chat_db().await;
        let alice = seed_user(&pool, "alice", Role::User).await;
        let mallory = seed_user(&pool, "mallory", Role::User).await;

        let note = NotificationRepository::create(
            &pool,
            alice,
            NotificationKind::System,
            "Private",
            "Only for alice.",
        )
        .await
        .expect("create should succeed");

        let err = mark_read(
            State(pool.clone()),
            Extension(claims_for(mallory, "mallory")),
            Path(note.id),
        )
        .await
        .expect_err("foreign row must be invisible");
        assert!(matches!(err, AppError::NotFound(_)));

        let err = delete_notification(
            State(pool),
            Extension(claims_for(mallory, "mallory")),
            Path(note.id),
        )
        .await
        .expect_err("foreign row must be invisible");
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
