//! # Route Handlers
//!
//! ```text
//! /                          health::welcome
//! /health                    health::health
//! /api/sweets/...            sweets::*
//! anything else              not_found
//! ```

pub mod health;
pub mod sweets;

use axum::http::Uri;

use crate::error::ApiError;

/// Fallback for unmatched routes.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("Route {} not found", uri.path()))
}
