//! HTTP integration module
//!
//! Bridges axum requests and responses to the renderer.
//!
//! # Features
//!
//! - **Request Context**: `FromRequestParts` extractor yielding the absolute
//!   request URL and raw pagination parameters
//! - **Error Responses**: `IntoResponse` for [`crate::Error`] with a
//!   `{ success, error }` JSON body

mod context;
mod response;

pub use context::RequestContext;
pub use response::ApiResponse;
