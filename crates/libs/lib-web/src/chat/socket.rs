//! # Chat WebSocket Handler
//!
//! HTTP endpoint upgrading to the realtime chat socket.
//!
//! ## Endpoint
//!
//! - `GET /api/ws/chat?token={jwt}` - WebSocket connection for realtime chat
//!
//! The token is validated before the upgrade; a missing or bad token is
//! answered with a plain 401 and no websocket is ever opened. Inbound frames
//! are processed
//! strictly one at a time, which is what guarantees that a sender's messages
//! are persisted and delivered in the order they were sent.

use super::dispatcher::Dispatcher;
use super::ChatAppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures_util::{SinkExt, StreamExt};
use lib_auth::decode_jwt;
use lib_core::dto::chat::{ClientEvent, ServerEvent};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Query parameters for the websocket handshake.
///
/// `token` is optional at the extractor level so that a handshake without it
/// still reaches the handler and gets a 401 instead of an extractor 400.
#[derive(Debug, Deserialize)]
pub struct WsAuthQuery {
    pub token: Option<String>,
}

/// WebSocket handler for realtime chat.
///
/// **Route**: `GET /api/ws/chat?token={jwt}`
///
/// Events are JSON with a `type` tag. Clients send `send_message`; the server
/// pushes `receive_message` and `error`.
pub async fn chat_websocket(
    ws: WebSocketUpgrade,
    Query(query): Query<WsAuthQuery>,
    State(state): State<Arc<ChatAppState>>,
) -> Response {
    // Authenticate before upgrading; unauthenticated clients never get a socket.
    let token = match query.token {
        Some(token) => token,
        None => {
            warn!("[WS] Handshake rejected, no token supplied");
            return (StatusCode::UNAUTHORIZED, "Missing authentication token").into_response();
        }
    };

    let claims = match decode_jwt(&token, &state.config.jwt_secret) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("[WS] Handshake rejected, invalid token: {}", e);
            return (StatusCode::UNAUTHORIZED, "Invalid or expired token").into_response();
        }
    };

    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => {
            warn!("[WS] Handshake rejected: {}", e);
            return (StatusCode::UNAUTHORIZED, "Invalid token subject").into_response();
        }
    };

    let username = claims.username.clone();
    info!(user_id, username = %username, "[WS] Handshake authenticated, upgrading");

    ws.on_upgrade(move |socket| handle_chat_socket(socket, state, user_id, username))
        .into_response()
}

/// Drive one authenticated chat connection until either side closes it.
async fn handle_chat_socket(
    socket: WebSocket,
    state: Arc<ChatAppState>,
    user_id: i64,
    username: String,
) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Everything destined for this connection goes through the queue; the
    // send task below is the only writer on the socket.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    let reply_tx = tx.clone();
    let conn_id = state.registry.register(user_id, tx).await;

    info!(user_id, username = %username, %conn_id, "[WS] CONNECTED");

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    error!(error = %e, "[WS] Failed to serialize event");
                    continue;
                }
            };
            if ws_sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let dispatcher = Dispatcher::new(state.db.clone(), state.registry.clone());
    let recv_user_id = user_id;
    let mut recv_task = tokio::spawn(async move {
        // One frame at a time: the next frame is not read until the current
        // one has been persisted and delivered.
        while let Some(msg) = ws_receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    let event: ClientEvent = match serde_json::from_str(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            debug!(user_id = recv_user_id, error = %e, "[WS] Malformed client event");
                            let _ = reply_tx.send(ServerEvent::Error {
                                message: "Malformed event".to_string(),
                            });
                            continue;
                        }
                    };

                    let ClientEvent::SendMessage {
                        conversation_id,
                        content,
                    } = event;

                    if let Err(e) = dispatcher
                        .dispatch(recv_user_id, conversation_id, &content)
                        .await
                    {
                        debug!(
                            user_id = recv_user_id,
                            conversation_id,
                            error = %e,
                            "[WS] Dispatch rejected"
                        );
                        let _ = reply_tx.send(ServerEvent::Error {
                            message: e.to_string(),
                        });
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!(user_id = recv_user_id, "[WS] Close frame received");
                    break;
                }
                Ok(_) => {
                    // Ping/pong and binary frames need no handling.
                }
                Err(e) => {
                    warn!(user_id = recv_user_id, error = %e, "[WS] Receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.registry.unregister(user_id, conn_id).await;
    info!(user_id, username = %username, %conn_id, "[WS] DISCONNECTED");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::test_support::setup_chat_db;
    use crate::chat::ChatAppState;
    use axum::routing::get;
    use axum::Router;
    use lib_core::Config;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn test_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-secret-key-must-be-at-least-32-characters-long!".to_string(),
            jwt_expiration_hours: 24,
        }
    }

    /// Serve the websocket route on an ephemeral port.
    async fn spawn_ws_server() -> SocketAddr {
        let pool = setup_chat_db().await;
        let state = Arc::new(ChatAppState::new(pool, test_config()));
        let app = Router::new()
            .route("/api/ws/chat", get(chat_websocket))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("listener should have an address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server should run");
        });
        addr
    }

    /// Send a raw websocket handshake and return the HTTP status line.
    async fn handshake_status_line(addr: SocketAddr, path_and_query: &str) -> String {
        let mut stream = TcpStream::connect(addr)
            .await
            .expect("connect should succeed");
        let request = format!(
            "GET {path_and_query} HTTP/1.1\r\n\
             Host: {addr}\r\n\
             Connection: Upgrade\r\n\
             Upgrade: websocket\r\n\
             Sec-WebSocket-Version: 13\r\n\
             Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
             \r\n"
        );
        stream
            .write_all(request.as_bytes())
            .await
            .expect("write should succeed");

        let mut buf = vec![0u8; 1024];
        let n = stream.read(&mut buf).await.expect("read should succeed");
        String::from_utf8_lossy(&buf[..n])
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    }

    #[tokio::test]
    async fn test_handshake_without_token_is_unauthorized() {
        let addr = spawn_ws_server().await;
        let status = handshake_status_line(addr, "/api/ws/chat").await;
        assert!(status.contains("401"), "unexpected status line: {status}");
    }

    #[tokio::test]
    async fn test_handshake_with_invalid_token_is_unauthorized() {
        let addr = spawn_ws_server().await;
        let status = handshake_status_line(addr, "/api/ws/chat?token=not-a-jwt").await;
        assert!(status.contains("401"), "unexpected status line: {status}");
    }
}
