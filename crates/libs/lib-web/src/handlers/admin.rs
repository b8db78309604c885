//! # Admin Moderation Handlers
//!
//! HTTP endpoints for moderating dermatologist accounts.
//!
//! ## Endpoints
//!
//! - `GET /api/admin/dermatologists/pending` - List accounts awaiting review
//! - `POST /api/admin/dermatologists/{id}/approve` - Approve an account
//! - `POST /api/admin/dermatologists/{id}/reject` - Reject an account
//!
//! Non-admin callers are answered with 404 on every admin route, so the
//! moderation surface is invisible to them. Every decision writes a durable
//! notification for the affected account.

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use lib_auth::Claims;
use lib_core::dto::auth::UserInfo;
use lib_core::model::store::models::{AccountStatus, NotificationKind, Role, User};
use lib_core::model::store::UserRepository;
use lib_core::{AppError, DbPool};
use tracing::{info, instrument};

use crate::notify;

fn require_admin(claims: &Claims) -> Result<(), AppError> {
    if claims.role != Role::Admin.to_string() {
        // Admin routes do not exist for anyone else.
        return Err(AppError::NotFound("Route not found".to_string()));
    }
    Ok(())
}

/// List dermatologist accounts awaiting moderation, oldest first.
pub async fn list_pending_dermatologists(
    State(db): State<DbPool>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<UserInfo>>, AppError> {
    require_admin(&claims)?;

    let pending = UserRepository::list_pending_dermatologists(&db).await?;

    Ok(Json(pending.into_iter().map(UserInfo::from).collect()))
}

/// Approve a pending dermatologist account.
#[instrument(skip(db, claims), fields(admin = %claims.sub, target = id))]
pub async fn approve_dermatologist(
    State(db): State<DbPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<UserInfo>, AppError> {
    require_admin(&claims)?;
    let user = moderate(&db, id, AccountStatus::Approved).await?;
    info!(target = id, "Dermatologist account approved");
    Ok(Json(UserInfo::from(user)))
}

/// Reject a pending dermatologist account.
#[instrument(skip(db, claims), fields(admin = %claims.sub, target = id))]
pub async fn reject_dermatologist(
    State(db): State<DbPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<UserInfo>, AppError> {
    require_admin(&claims)?;
    let user = moderate(&db, id, AccountStatus::Rejected).await?;
    info!(target = id, "Dermatologist account rejected");
    Ok(Json(UserInfo::from(user)))
}

/// Apply a moderation decision and notify the affected account.
async fn moderate(db: &DbPool, id: i64, status: AccountStatus) -> Result<User, AppError> {
    let target = UserRepository::find_by_id(db, id)
        .await?
        .filter(|u| u.role == Role::Dermatologist)
        .ok_or_else(|| AppError::NotFound("Dermatologist not found".to_string()))?;

    let updated = UserRepository::set_account_status(db, target.id, status)
        .await?
        .ok_or_else(|| AppError::NotFound("Dermatologist not found".to_string()))?;

    let (title, body) = match status {
        AccountStatus::Approved => (
            "Account Approved",
            "Your dermatologist account was approved. You can now log in.",
        ),
        AccountStatus::Rejected => (
            "Account Rejected",
            "Your dermatologist account was rejected.",
        ),
        AccountStatus::Pending => ("Account Under Review", "Your account is under review."),
    };
    notify::best_effort(db, updated.id, NotificationKind::System, title, body).await;

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::test_support::{seed_user, setup_chat_db};
    use lib_core::model::store::NotificationRepository;

    fn claims_for(user_id: i64, username: &str, role: &str) -> Claims {
        Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            exp: i64::MAX,
            iat: 0,
        }
    }

    #[tokio::test]
    async fn test_approval_flow_notifies_account() {
        let pool = setup_chat_db().await;
        let admin = seed_user(&pool, "root", Role::Admin).await;
        let derm = seed_user(&pool, "drsmith", Role::Dermatologist).await;

        let Json(pending) = list_pending_dermatologists(
            State(pool.clone()),
            Extension(claims_for(admin, "root", "ADMIN")),
        )
        .await
        .expect("list should succeed");
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, derm);

        let Json(approved) = approve_dermatologist(
            State(pool.clone()),
            Extension(claims_for(admin, "root", "ADMIN")),
            Path(derm),
        )
        .await
        .expect("approve should succeed");
        assert_eq!(approved.account_status, AccountStatus::Approved);

        let inbox = NotificationRepository::list_for_user(&pool, derm)
            .await
            .expect("list should succeed");
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].title, "Account Approved");
        assert_eq!(inbox[0].kind, NotificationKind::System);
    }

    #[tokio::test]
    async fn test_rejection_notifies_account() {
        let pool = setup_chat_db().await;
        let admin = seed_user(&pool, "root", Role::Admin).await;
        let derm = seed_user(&pool, "drsmith", Role::Dermatologist).await;

        let Json(rejected) = reject_dermatologist(
            State(pool.clone()),
            Extension(claims_for(admin, "root", "ADMIN")),
            Path(derm),
        )
        .await
        .expect("reject should succeed");
        assert_eq!(rejected.account_status, AccountStatus::Rejected);

        let inbox = NotificationRepository::list_for_user(&pool, derm)
            .await
            .expect("list should succeed");
        assert_eq!(inbox[0].title, "Account Rejected");
    }

    #[tokio::test]
    async fn test_admin_routes_invisible_to_non_admins() {
        let pool = setup_chat_db().await;
        let user = seed_user(&pool, "alice", Role::User).await;
        let derm = seed_user(&pool, "drsmith", Role::Dermatologist).await;

        let err = approve_dermatologist(
            State(pool),
            Extension(claims_for(user, "alice", "USER")),
            Path(derm),
        )
        .await
        .expect_err("non-admin must get 404");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_moderating_a_patient_is_404() {
        let pool = setup_chat_db().await;
        let admin = seed_user(&pool, "root", Role::Admin).await;
        let patient = seed_user(&pool, "alice", Role::User).await;

        let err = approve_dermatologist(
            State(pool),
            Extension(claims_for(admin, "root", "ADMIN")),
            Path(patient),
        )
        .await
        .expect_err("patients are not moderated");
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
