//! # SweetShop API
//!
//! REST server for the sweet shop inventory.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SweetShop API Server                             │
//! │                                                                         │
//! │  Client ──► axum (3000) ──► log_requests ──► CorsLayer ──► routes      │
//! │                                                          │              │
//! │                                                          ▼              │
//! │                                          SweetRepository (sqlx)         │
//! │                                                          │              │
//! │                                                          ▼              │
//! │                                                   SQLite (WAL)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! ```text
//! sweetshop_api
//! ├── config      - ApiConfig (TOML + SWEETSHOP_* env)
//! ├── error       - ApiError → status + JSON envelope
//! ├── middleware  - request logging, CorsLayer
//! ├── response    - ApiResponse success envelope
//! └── routes      - health, sweets, fallback
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod response;
pub mod routes;

use std::sync::Arc;

use axum::Router;

use sweetshop_db::Database;

use crate::config::ApiConfig;

/// Shared application state.
pub struct AppState {
    pub db: Database,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Arc<Self> {
        Arc::new(AppState { db, config })
    }
}

/// Builds the full HTTP router over `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = middleware::cors_layer(&state.config.server.cors_origins);

    Router::new()
        .merge(routes::health::router())
        .nest("/api/sweets", routes::sweets::router())
        .fallback(routes::not_found)
        .layer(cors)
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .with_state(state)
}

// =============================================================================
// Router Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use sweetshop_core::validation::MAX_STOCK;
    use sweetshop_core::{Money, NewSweet};
    use sweetshop_db::DbConfig;
    use tower::ServiceExt;

    async fn test_app() -> (Router, Database) {
        app_with_config(ApiConfig::default()).await
    }

    async fn app_with_config(config: ApiConfig) -> (Router, Database) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let state = AppState::new(db.clone(), config);
        (build_router(state), db)
    }

    async fn seeded_app() -> (Router, Database) {
        let (app, db) = test_app().await;
        let repo = db.sweets();
        for (name, category, cents, in_stock) in [
            ("Dark Chocolate Bar", "chocolate", 350, 10),
            ("Milk Chocolate", "chocolate", 300, 3),
            ("Gummy Bears", "candy", 250, 0),
        ] {
            repo.insert(&NewSweet::new(name, category, Money::from_cents(cents), in_stock))
                .await
                .unwrap();
        }
        (app, db)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health_reports_environment_and_database() {
        let (app, _db) = test_app().await;
        let (status, body) = send(&app, Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["message"], json!("SweetShop API is running"));
        assert_eq!(body["environment"], json!("development"));
        assert_eq!(body["database"], json!("connected"));
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_welcome_lists_endpoints() {
        let (app, _db) = test_app().await;
        let (status, body) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["endpoints"]["sweets"]["purchase"].is_string());
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (app, _db) = test_app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/sweets",
            Some(json!({
                "name": "Ladoo",
                "category": "Dry Sweets",
                "price": 10.0,
                "quantity": 40
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], json!(true));
        let id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = send(&app, Method::GET, &format!("/api/sweets/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], json!("Ladoo"));
        assert_eq!(body["data"]["price"], json!(10.0));
        assert_eq!(body["data"]["in_stock"], json!(40));
    }

    #[tokio::test]
    async fn test_create_rejects_missing_and_invalid_fields() {
        let (app, db) = test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/sweets",
            Some(json!({ "category": "candy", "price": 1.0, "in_stock": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("name is required"));

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/sweets",
            Some(json!({ "name": "Toffee", "category": "candy", "price": 0, "in_stock": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/sweets",
            Some(json!({ "name": "Toffee", "category": "candy", "price": 1.5, "in_stock": -1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(db.sweets().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (app, _db) = test_app().await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/sweets")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_and_unknown_ids() {
        let (app, _db) = seeded_app().await;

        let (status, body) = send(&app, Method::GET, "/api/sweets/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], json!("Invalid ID format"));

        let (status, body) = send(&app, Method::GET, "/api/sweets/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Sweet not found"));

        let (status, _) = send(&app, Method::DELETE, "/api/sweets/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_includes_count() {
        let (app, _db) = seeded_app().await;
        let (status, body) = send(&app, Method::GET, "/api/sweets", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], json!(3));
        assert_eq!(body["data"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_replace_requires_every_field() {
        let (app, _db) = seeded_app().await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/sweets/1",
            Some(json!({
                "name": "Extra Dark",
                "category": "chocolate",
                "price": 4.25,
                "in_stock": 7
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], json!("Extra Dark"));
        assert_eq!(body["data"]["price"], json!(4.25));

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/sweets/1",
            Some(json!({ "name": "Extra Dark" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], json!("category is required"));

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/sweets/999",
            Some(json!({ "name": "Ghost", "category": "candy", "price": 1.0, "in_stock": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_removes_sweet() {
        let (app, db) = seeded_app().await;
        let (status, body) = send(&app, Method::DELETE, "/api/sweets/2", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("Sweet deleted successfully"));
        assert_eq!(db.sweets().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_purchase_and_restock() {
        let (app, _db) = seeded_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/sweets/1/purchase",
            Some(json!({ "quantity": 4 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["in_stock"], json!(6));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/sweets/2/purchase",
            Some(json!({ "quantity": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], json!("INSUFFICIENT_STOCK"));

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/sweets/2/restock",
            Some(json!({ "quantity": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/sweets/3/restock",
            Some(json!({ "quantity": 12 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["in_stock"], json!(12));

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/sweets/42/restock",
            Some(json!({ "quantity": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search_filters_and_sorts() {
        let (app, _db) = seeded_app().await;

        let (status, body) =
            send(&app, Method::GET, "/api/sweets/search?name=chocolate", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], json!(2));

        let (_, body) = send(
            &app,
            Method::GET,
            "/api/sweets/search?category=chocolate&max_price=3.20",
            None,
        )
        .await;
        assert_eq!(body["count"], json!(1));
        assert_eq!(body["data"][0]["name"], json!("Milk Chocolate"));

        let (_, body) = send(
            &app,
            Method::GET,
            "/api/sweets/search?sort=price&order=desc",
            None,
        )
        .await;
        let names: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Dark Chocolate Bar", "Milk Chocolate", "Gummy Bears"]);

        let (status, _) = send(&app, Method::GET, "/api/sweets/search?sort=colour", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_categories_and_stats() {
        let (app, _db) = seeded_app().await;

        let (_, body) = send(&app, Method::GET, "/api/sweets/categories", None).await;
        assert_eq!(body["data"], json!(["candy", "chocolate"]));

        let (status, body) = send(&app, Method::GET, "/api/sweets/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total_sweets"], json!(3));
        assert_eq!(body["data"]["out_of_stock"], json!(1));
        assert_eq!(body["data"]["low_stock"], json!(1));
    }

    #[tokio::test]
    async fn test_unknown_route_names_path() {
        let (app, _db) = test_app().await;
        let (status, body) = send(&app, Method::GET, "/api/candies", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Route /api/candies not found"));
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/sweets")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let (app, _db) = test_app().await;

        let response = app.clone().oneshot(preflight("http://localhost:5173")).await.unwrap();
        assert!(response.status().is_success());
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .to_string();
        assert!(methods.contains("POST"));
        assert!(methods.contains("DELETE"));

        let request = Request::builder()
            .uri("/api/sweets")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_cors_configured_origins() {
        let mut config = ApiConfig::default();
        config.server.cors_origins = vec!["http://localhost:5173".to_string()];
        let (app, _db) = app_with_config(config).await;

        let response = app.clone().oneshot(preflight("http://localhost:5173")).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );

        let response = app.oneshot(preflight("http://evil.example")).await.unwrap();
        assert!(!response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_create_rejects_stock_beyond_int_range() {
        let (app, db) = test_app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/sweets",
            Some(json!({
                "name": "Bulk",
                "category": "candy",
                "price": 100.0,
                "in_stock": 1_000_000_000_000_000_i64
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], json!("in_stock is out of range"));
        assert_eq!(db.sweets().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_stats_at_column_bounds() {
        let (app, db) = test_app().await;
        let max_price = Money::from_cents(99_999_999_99);
        for name in ["Gold Leaf Barfi", "Saffron Peda"] {
            db.sweets()
                .insert(&NewSweet::new(name, "premium", max_price, MAX_STOCK))
                .await
                .unwrap();
        }

        let (status, body) = send(&app, Method::GET, "/api/sweets/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total_sweets"], json!(2));
        assert!(body["data"]["total_value"].is_number());
        assert_eq!(body["data"]["average_price"], json!(999_999_999.99));
    }
}
