//! # User Repository
//!
//! Provides database access layer for user-related operations.
//!
//! This module implements the repository pattern for user data access,
//! providing a clean abstraction over SQL queries.

use super::models::{AccountStatus, Role, User, UserForCreate};
use super::DbPool;
use sqlx::query_as;

/// User repository for database operations.
///
/// Provides methods for creating, retrieving, and updating user records.
/// All methods are async and return `Result` types for proper error handling.
pub struct UserRepository;

impl UserRepository {
    /// Find a user by their email address.
    pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by their username.
    pub async fn find_by_username(
        pool: &DbPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by id.
    pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a new user in the database.
    ///
    /// Dermatologist accounts are created with `PENDING` moderation status
    /// and must be approved by an admin before they can log in; all other
    /// roles start `APPROVED`.
    pub async fn create(pool: &DbPool, user_c: UserForCreate) -> Result<User, sqlx::Error> {
        let account_status = if user_c.role == Role::Dermatologist {
            AccountStatus::Pending
        } else {
            AccountStatus::Approved
        };

        query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, role, account_status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
            RETURNING *
            "#,
        )
        .bind(&user_c.username)
        .bind(&user_c.email)
        .bind(&user_c.password_hash)
        .bind(user_c.role.to_string())
        .bind(account_status.to_string())
        .fetch_one(pool)
        .await
    }

    /// Update a user's moderation status (admin moderation decision).
    ///
    /// Returns the updated user, or `None` when no such user exists.
    pub async fn set_account_status(
        pool: &DbPool,
        id: i64,
        status: AccountStatus,
    ) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>(
            r#"
            UPDATE users
            SET account_status = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(status.to_string())
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List dermatologist accounts awaiting moderation, oldest first.
    pub async fn list_pending_dermatologists(pool: &DbPool) -> Result<Vec<User>, sqlx::Error> {
        query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE role = 'DERMATOLOGIST' AND account_status = 'PENDING'
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Check that a user exists, is active, and holds the given role with an
    /// approved account. Used when validating conversation and appointment
    /// targets.
    pub async fn is_approved_with_role(
        pool: &DbPool,
        id: i64,
        role: Role,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE id = ? AND role = ? AND account_status = 'APPROVED' AND is_active = 1
            )
            "#,
        )
        .bind(id)
        .bind(role.to_string())
        .fetch_one(pool)
        .await
    }
}
