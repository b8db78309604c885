//! # Web Library
//!
//! HTTP handlers, middleware, realtime chat, and server setup.

pub mod chat;
pub mod handlers;
pub mod middleware;
pub mod notify;
pub mod server;

pub use server::{start_server, AppState, ServerConfig};
