//! # IO Module
//!
//! Interface layer between HTTP clients and the domain services.
//!
//! Handlers translate requests into service calls and domain errors into
//! status codes. No business rule lives here.
//!
//! ## Current Implementation
//!
//! - **Web Framework**: Axum, with services injected through `State<AppState>`
//! - **Serialization**: Serde JSON using the `shared` wire types
//! - **Errors**: `{ "error", "retryable" }` bodies via [`rest::ApiError`]

pub mod rest;

pub use rest::*;
