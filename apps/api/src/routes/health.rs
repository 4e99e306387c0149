//! Welcome document and liveness check.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
}

/// Lists the available endpoints.
async fn welcome(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Welcome to SweetShop API",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.server.environment.to_string(),
        "endpoints": {
            "health": "GET /health",
            "sweets": {
                "list": "GET /api/sweets",
                "search": "GET /api/sweets/search?name=&category=&min_price=&max_price=&sort=&order=",
                "categories": "GET /api/sweets/categories",
                "stats": "GET /api/sweets/stats",
                "get": "GET /api/sweets/{id}",
                "create": "POST /api/sweets",
                "update": "PUT /api/sweets/{id}",
                "delete": "DELETE /api/sweets/{id}",
                "purchase": "POST /api/sweets/{id}/purchase",
                "restock": "POST /api/sweets/{id}/restock"
            }
        }
    }))
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    success: bool,
    message: &'static str,
    timestamp: String,
    environment: String,
    database: &'static str,
}

/// 200 while the database answers, 503 otherwise.
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let db_ok = state.db.health_check().await;
    if !db_ok {
        warn!("Health check: database unreachable");
    }

    let status = HealthStatus {
        success: db_ok,
        message: if db_ok {
            "SweetShop API is running"
        } else {
            "SweetShop API is running but the database is unreachable"
        },
        timestamp: Utc::now().to_rfc3339(),
        environment: state.config.server.environment.to_string(),
        database: if db_ok { "connected" } else { "unreachable" },
    };

    let code = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}
