//! # Sweet Handlers
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/sweets/7/purchase  { "quantity": 3 }                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  parse_sweet_id("7") ───────── bad id ──────────► 400 Invalid ID format │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Json<QuantityRequest> ─────── bad body ────────► 400                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  repo.purchase(7, 3)  (one transaction)                                 │
//! │       ├── SweetNotFound ────────────────────────► 404 Sweet not found   │
//! │       ├── quantity <= 0 ────────────────────────► 400                   │
//! │       ├── InsufficientStock ────────────────────► 409                   │
//! │       ▼                                                                 │
//! │  200 { success, message, data: Sweet }                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Create and replace bodies deserialize into [`SweetPatch`] so that a
//! missing field is reported as `"<field> is required"` rather than a serde
//! message.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{debug, info};

use sweetshop_core::validation::{parse_sweet_id, require_complete};
use sweetshop_core::{InventoryStats, QuantityRequest, Sweet, SweetPatch, SweetQuery};

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_sweets).post(create_sweet))
        .route("/search", get(search_sweets))
        .route("/categories", get(list_categories))
        .route("/stats", get(inventory_stats))
        .route(
            "/{id}",
            get(get_sweet).put(replace_sweet).delete(delete_sweet),
        )
        .route("/{id}/purchase", post(purchase_sweet))
        .route("/{id}/restock", post(restock_sweet))
}

// =============================================================================
// Reads
// =============================================================================

async fn list_sweets(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse<Vec<Sweet>>> {
    let sweets = state.db.sweets().list_all().await?;
    Ok(ApiResponse::list(sweets))
}

async fn search_sweets(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SweetQuery>, QueryRejection>,
) -> ApiResult<ApiResponse<Vec<Sweet>>> {
    let Query(query) = query?;
    debug!(?query, "Searching sweets");
    let sweets = state.db.sweets().search(&query).await?;
    Ok(ApiResponse::list(sweets))
}

async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> ApiResult<ApiResponse<Vec<String>>> {
    let categories = state.db.sweets().categories().await?;
    Ok(ApiResponse::list(categories))
}

async fn inventory_stats(
    State(state): State<Arc<AppState>>,
) -> ApiResult<ApiResponse<InventoryStats>> {
    let stats = state.db.sweets().stats().await?;
    Ok(ApiResponse::ok(stats))
}

async fn get_sweet(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> ApiResult<ApiResponse<Sweet>> {
    let id = parse_sweet_id(&raw_id)?;
    let sweet = state
        .db
        .sweets()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sweet not found"))?;
    Ok(ApiResponse::ok(sweet))
}

// =============================================================================
// Writes
// =============================================================================

async fn create_sweet(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SweetPatch>, JsonRejection>,
) -> ApiResult<ApiResponse<Sweet>> {
    let Json(body) = body?;
    let new = require_complete(body)?;

    let sweet = state.db.sweets().insert(&new).await?;
    info!(id = sweet.id, name = %sweet.name, "Sweet created");
    Ok(ApiResponse::created(sweet).with_message("Sweet created successfully"))
}

/// Full replacement: every field must be present.
async fn replace_sweet(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    body: Result<Json<SweetPatch>, JsonRejection>,
) -> ApiResult<ApiResponse<Sweet>> {
    let id = parse_sweet_id(&raw_id)?;
    let Json(body) = body?;
    let new = require_complete(body)?;

    let sweet = state.db.sweets().replace(id, &new).await?;
    info!(id, "Sweet updated");
    Ok(ApiResponse::ok(sweet).with_message("Sweet updated successfully"))
}

async fn delete_sweet(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    let id = parse_sweet_id(&raw_id)?;
    state.db.sweets().delete(id).await?;
    info!(id, "Sweet deleted");
    Ok(ApiResponse::message("Sweet deleted successfully"))
}

// =============================================================================
// Stock Ledger
// =============================================================================

async fn purchase_sweet(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    body: Result<Json<QuantityRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<Sweet>> {
    let id = parse_sweet_id(&raw_id)?;
    let Json(QuantityRequest { quantity }) = body?;

    let sweet = state.db.sweets().purchase(id, quantity).await?;
    info!(id, quantity, remaining = sweet.in_stock, "Sweet purchased");
    Ok(ApiResponse::ok(sweet).with_message("Purchase successful"))
}

async fn restock_sweet(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    body: Result<Json<QuantityRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<Sweet>> {
    let id = parse_sweet_id(&raw_id)?;
    let Json(QuantityRequest { quantity }) = body?;

    let sweet = state.db.sweets().restock(id, quantity).await?;
    info!(id, quantity, in_stock = sweet.in_stock, "Sweet restocked");
    Ok(ApiResponse::ok(sweet).with_message("Restock successful"))
}
