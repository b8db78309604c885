//! # Appointment Handlers
//!
//! HTTP endpoints for booking and managing appointments.
//!
//! ## Endpoints
//!
//! - `POST /api/appointments` - Book an appointment with a dermatologist
//! - `GET /api/appointments` - List the caller's appointments
//! - `PUT /api/appointments/{id}/status` - Move an appointment to a new status
//! - `DELETE /api/appointments/{id}` - Cancel and remove an appointment
//!
//! Every lifecycle change fans out durable notifications on a best-effort
//! basis; the operation itself never fails because a notification write did.
//! Appointments the caller does not participate in are answered with 404.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use lib_auth::Claims;
use lib_core::dto::appointment::{CreateAppointmentRequest, UpdateAppointmentStatusRequest};
use lib_core::model::store::models::{Appointment, AppointmentStatus, NotificationKind, Role};
use lib_core::model::store::{AppointmentRepository, UserRepository};
use chrono::Utc;
use lib_core::{AppError, DbPool};
use tracing::instrument;

use crate::notify;

/// Book an appointment with an approved dermatologist.
#[instrument(skip(db, claims, req), fields(user = %claims.sub))]
pub async fn create_appointment(
    State(db): State<DbPool>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;

    if claims.role != Role::User.to_string() {
        return Err(AppError::InvalidInput(
            "Only patients can book appointments".to_string(),
        ));
    }
    if req.scheduled_at <= Utc::now() {
        return Err(AppError::InvalidInput(
            "Appointment must be scheduled in the future".to_string(),
        ));
    }

    let target_ok =
        UserRepository::is_approved_with_role(&db, req.dermatologist_id, Role::Dermatologist)
            .await?;
    if !target_ok {
        return Err(AppError::NotFound("Dermatologist not found".to_string()));
    }

    let appointment = AppointmentRepository::create(
        &db,
        user_id,
        req.dermatologist_id,
        req.scheduled_at,
        req.notes.as_deref(),
    )
    .await?;

    notify::best_effort(
        &db,
        req.dermatologist_id,
        NotificationKind::Appointment,
        "New Appointment Request",
        &format!(
            "{} requested an appointment on {}",
            claims.username,
            req.scheduled_at.format("%Y-%m-%d %H:%M")
        ),
    )
    .await;

    Ok((StatusCode::CREATED, Json(appointment)))
}

/// List the caller's appointments, soonest first.
pub async fn list_appointments(
    State(db): State<DbPool>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;
    let appointments = AppointmentRepository::list_for_user(&db, user_id).await?;
    Ok(Json(appointments))
}

/// Move an appointment to a new lifecycle status.
///
/// Cancellation notifies both participants; any other change notifies the
/// counterpart only.
#[instrument(skip(db, claims, req), fields(user = %claims.sub, appointment_id = id))]
pub async fn update_appointment_status(
    State(db): State<DbPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateAppointmentStatusRequest>,
) -> Result<Json<Appointment>, AppError> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;

    let appointment = AppointmentRepository::find_by_id(&db, id)
        .await?
        .filter(|a| a.user_id == user_id || a.dermatologist_id == user_id)
        .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

    let updated = AppointmentRepository::set_status(&db, appointment.id, req.status)
        .await?
        .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

    let (title, body) = match req.status {
        AppointmentStatus::Confirmed => (
            "Appointment Confirmed",
            format!(
                "Your appointment on {} was confirmed",
                updated.scheduled_at.format("%Y-%m-%d %H:%M")
            ),
        ),
        AppointmentStatus::Cancelled => (
            "Appointment Cancelled",
            format!(
                "The appointment on {} was cancelled",
                updated.scheduled_at.format("%Y-%m-%d %H:%M")
            ),
        ),
        AppointmentStatus::Completed => (
            "Appointment Completed",
            format!(
                "Your appointment on {} was marked completed",
                updated.scheduled_at.format("%Y-%m-%d %H:%M")
            ),
        ),
        AppointmentStatus::Pending => (
            "Appointment Updated",
            format!(
                "The appointment on {} was moved back to pending",
                updated.scheduled_at.format("%Y-%m-%d %H:%M")
            ),
        ),
    };

    if req.status == AppointmentStatus::Cancelled {
        notify::best_effort(&db, updated.user_id, NotificationKind::Appointment, title, &body)
            .await;
        notify::best_effort(
            &db,
            updated.dermatologist_id,
            NotificationKind::Appointment,
            title,
            &body,
        )
        .await;
    } else {
        let counterpart = if user_id == updated.user_id {
            updated.dermatologist_id
        } else {
            updated.user_id
        };
        notify::best_effort(&db, counterpart, NotificationKind::Appointment, title, &body).await;
    }

    Ok(Json(updated))
}

/// Cancel and remove an appointment. Both participants are notified.
#[instrument(skip(db, claims), fields(user = %claims.sub, appointment_id = id))]
pub async fn delete_appointment(
    State(db): State<DbPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;

    let appointment = AppointmentRepository::find_by_id(&db, id)
        .await?
        .filter(|a| a.user_id == user_id || a.dermatologist_id == user_id)
        .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

    AppointmentRepository::delete(&db, appointment.id).await?;

    let body = format!(
        "The appointment on {} was cancelled",
        appointment.scheduled_at.format("%Y-%m-%d %H:%M")
    );
    notify::best_effort(
        &db,
        appointment.user_id,
        NotificationKind::Appointment,
        "Appointment Cancelled",
        &body,
    )
    .await;
    notify::best_effort(
        &db,
        appointment.dermatologist_id,
        NotificationKind::Appointment,
        "Appointment Cancelled",
        &body,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
