//! # Chat Handlers
//!
//! HTTP endpoints for conversations and message history.
//!
//! ## Endpoints
//!
//! - `POST /api/chats` - Open (or re-open) a conversation with a dermatologist
//! - `GET /api/chats` - List the caller's conversations, most recent first
//! - `GET /api/chats/{id}/messages` - Full history; marks received messages read
//!
//! A conversation the caller does not participate in is answered with 404,
//! exactly like one that does not exist.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use lib_auth::Claims;
use lib_core::dto::chat::{ConversationSummary, CreateChatRequest, MessageWithSender};
use lib_core::model::store::models::{Conversation, Role};
use lib_core::model::store::{ConversationRepository, MessageRepository, UserRepository};
use lib_core::{AppError, DbPool};
use tracing::{debug, instrument};

/// Open a conversation with a dermatologist, or return the existing one.
///
/// Only patients initiate conversations, and only toward approved
/// dermatologist accounts.
#[instrument(skip(db, claims), fields(user = %claims.sub))]
pub async fn create_chat(
    State(db): State<DbPool>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateChatRequest>,
) -> Result<(StatusCode, Json<Conversation>), AppError> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;

    if claims.role != Role::User.to_string() {
        return Err(AppError::InvalidInput(
            "Only patients can open conversations".to_string(),
        ));
    }
    if req.dermatologist_id == user_id {
        return Err(AppError::InvalidInput(
            "Cannot open a conversation with yourself".to_string(),
        ));
    }

    let target_ok =
        UserRepository::is_approved_with_role(&db, req.dermatologist_id, Role::Dermatologist)
            .await?;
    if !target_ok {
        return Err(AppError::NotFound("Dermatologist not found".to_string()));
    }

    let conversation =
        ConversationRepository::find_or_create(&db, user_id, req.dermatologist_id).await?;
    debug!(conversation_id = conversation.id, "Conversation ready");

    Ok((StatusCode::CREATED, Json(conversation)))
}

/// List the caller's conversations, most recently active first.
pub async fn list_chats(
    State(db): State<DbPool>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<ConversationSummary>>, AppError> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;
    let conversations = ConversationRepository::list_for_user(&db, user_id).await?;
    Ok(Json(conversations))
}

/// Full message history of one conversation, oldest first.
///
/// Fetching the history is what marks the caller's received messages as read;
/// the returned snapshot still shows the read flags as they were before this
/// call. The caller's own messages are never touched.
#[instrument(skip(db, claims), fields(user = %claims.sub, conversation_id))]
pub async fn get_chat_messages(
    State(db): State<DbPool>,
    Extension(claims): Extension<Claims>,
    Path(conversation_id): Path<i64>,
) -> Result<Json<Vec<MessageWithSender>>, AppError> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;

    let conversation = ConversationRepository::find_by_id(&db, conversation_id)
        .await?
        .filter(|c| c.has_participant(user_id))
        .ok_or_else(|| AppError::NotFound("Chat not found".to_string()))?;

    let messages = MessageRepository::list_with_senders(&db, conversation.id).await?;
    let flipped = MessageRepository::mark_read_excluding(&db, conversation.id, user_id).await?;
    if flipped > 0 {
        debug!(flipped, "Marked received messages read");
    }

    Ok(Json(messages))
}
