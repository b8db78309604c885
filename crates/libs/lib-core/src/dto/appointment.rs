//! Appointment endpoint payloads.

use crate::model::store::models::AppointmentStatus;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Request body for booking an appointment with a dermatologist.
#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    pub dermatologist_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Request body for moving an appointment to a new status.
#[derive(Debug, Deserialize)]
pub struct UpdateAppointmentStatusRequest {
    pub status: AppointmentStatus,
}
