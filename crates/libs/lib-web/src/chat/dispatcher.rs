//! # Message Dispatcher
//!
//! The pipeline behind every inbound chat message: validate, persist, bump
//! the conversation's activity timestamp, then deliver to the recipient if
//! they are online.
//!
//! Persistence always happens before delivery, so a message a recipient sees
//! on the wire is already durable. Offline recipients lose nothing; they pick
//! the message up from the history endpoint.

use super::registry::ConnectionRegistry;
use lib_core::dto::chat::{MessageWithSender, ServerEvent};
use lib_core::model::store::{ConversationRepository, MessageRepository};
use lib_core::DbPool;
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced back to the sending client as an `error` event.
///
/// An unknown conversation and a conversation the sender does not belong to
/// produce the same client-visible message, so a sender cannot probe which
/// conversation ids exist.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Conversation not found")]
    ConversationNotFound,
    #[error("Conversation not found")]
    NotParticipant,
    #[error("Message content cannot be empty")]
    EmptyContent,
    #[error("Failed to send message")]
    Db(#[from] sqlx::Error),
}

/// Dispatches inbound messages for one connection.
pub struct Dispatcher {
    db: DbPool,
    registry: ConnectionRegistry,
}

impl Dispatcher {
    pub fn new(db: DbPool, registry: ConnectionRegistry) -> Self {
        Self { db, registry }
    }

    /// Process one inbound message from `sender_id`.
    ///
    /// Steps, in order: participant check, persist, bump conversation
    /// activity, deliver to the counterpart's live connections. Returns the
    /// stored message on success.
    pub async fn dispatch(
        &self,
        sender_id: i64,
        conversation_id: i64,
        content: &str,
    ) -> Result<MessageWithSender, DispatchError> {
        if content.trim().is_empty() {
            return Err(DispatchError::EmptyContent);
        }

        let conversation = ConversationRepository::find_by_id(&self.db, conversation_id)
            .await?
            .ok_or(DispatchError::ConversationNotFound)?;

        if !conversation.has_participant(sender_id) {
            return Err(DispatchError::NotParticipant);
        }

        // Persist first. Delivery only ever sees durable messages.
        let message =
            MessageRepository::create_with_sender(&self.db, conversation_id, sender_id, content)
                .await?;
        ConversationRepository::touch(&self.db, conversation_id).await?;

        let recipient_id = conversation.other_participant(sender_id);
        let delivered = self
            .registry
            .deliver(
                recipient_id,
                ServerEvent::ReceiveMessage {
                    message: message.clone(),
                },
            )
            .await;

        if delivered > 0 {
            info!(
                message_id = message.id,
                conversation_id,
                sender_id,
                recipient_id,
                connections = delivered,
                "[DISPATCH] Message delivered"
            );
        } else {
            debug!(
                message_id = message.id,
                conversation_id,
                sender_id,
                recipient_id,
                "[DISPATCH] Recipient offline, message persisted only"
            );
        }

        Ok(message)
    }
}
