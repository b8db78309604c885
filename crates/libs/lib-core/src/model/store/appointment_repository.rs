//! # Appointment Repository
//!
//! Database access for appointment bookings between patients and
//! dermatologists.

use super::models::{Appointment, AppointmentStatus};
use super::DbPool;
use chrono::{DateTime, Utc};
use sqlx::query_as;

/// Appointment repository for database operations.
pub struct AppointmentRepository;

impl AppointmentRepository {
    /// Book an appointment. New appointments start `PENDING` until the
    /// dermatologist confirms or cancels.
    pub async fn create(
        pool: &DbPool,
        user_id: i64,
        dermatologist_id: i64,
        scheduled_at: DateTime<Utc>,
        notes: Option<&str>,
    ) -> Result<Appointment, sqlx::Error> {
        query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (user_id, dermatologist_id, scheduled_at, notes, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, 'PENDING', CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(dermatologist_id)
        .bind(scheduled_at)
        .bind(notes)
        .fetch_one(pool)
        .await
    }

    /// Find an appointment by id.
    pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Appointment>, sqlx::Error> {
        query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All appointments the user participates in, soonest first.
    pub async fn list_for_user(
        pool: &DbPool,
        user_id: i64,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        query_as::<_, Appointment>(
            r#"
            SELECT * FROM appointments
            WHERE user_id = ? OR dermatologist_id = ?
            ORDER BY scheduled_at ASC
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Move an appointment to a new lifecycle status. Returns the updated
    /// row, or `None` when no such appointment exists.
    pub async fn set_status(
        pool: &DbPool,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET status = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(status.to_string())
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Delete an appointment. Returns false when no such row exists.
    pub async fn delete(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
