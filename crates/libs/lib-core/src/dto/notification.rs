//! Notification endpoint payloads.

use serde::Serialize;

/// Response body for the unread-count endpoint.
#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

/// Response body for bulk read-marking.
#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}
