//! # Data Transfer Objects
//!
//! Request/response types shared between the HTTP handlers, the websocket
//! layer, and their tests.

pub mod appointment;
pub mod auth;
pub mod chat;
pub mod notification;
