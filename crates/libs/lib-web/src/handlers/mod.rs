//! # HTTP Handlers
//!
//! Request handlers for all REST endpoints.
//!
//! ## Modules
//!
//! - **[`auth`]**: Signup and login
//! - **[`chats`]**: Conversation listing, creation, and message history
//! - **[`notifications`]**: Durable notification inbox
//! - **[`appointments`]**: Appointment booking and lifecycle
//! - **[`admin`]**: Dermatologist account moderation

pub mod admin;
pub mod appointments;
pub mod auth;
pub mod chats;
pub mod notifications;
