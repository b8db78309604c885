//! # Model Layer
//!
//! Database store and entity types.

pub mod store;
