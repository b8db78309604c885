//! Chat transport types: REST payloads and the websocket event protocol.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A message joined with its sender's public profile, as delivered to
/// recipients over the websocket and returned from the history endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MessageWithSender {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub sender_username: String,
    pub sender_avatar_url: Option<String>,
}

/// One row of a user's conversation listing: the counterpart's profile, a
/// preview of the latest message, and how many messages await the user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConversationSummary {
    pub id: i64,
    pub partner_id: i64,
    pub partner_username: String,
    pub partner_avatar_url: Option<String>,
    pub last_message: Option<String>,
    pub unread_count: i64,
    pub updated_at: DateTime<Utc>,
}

/// Request body for opening (or re-opening) a conversation with a
/// dermatologist.
#[derive(Debug, Deserialize)]
pub struct CreateChatRequest {
    pub dermatologist_id: i64,
}

/// Events a connected client may send over the websocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    SendMessage { conversation_id: i64, content: String },
}

/// Events the server pushes to connected clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    ReceiveMessage { message: MessageWithSender },
    Error { message: String },
}
