//! # Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Public                                                                 │
//! │    GET    /health                  503 when the database is down        │
//! │    POST   /api/register                                                 │
//! │    POST   /api/login                                                    │
//! │                                                                         │
//! │  Bearer token (require_auth)                                            │
//! │    GET    /api/products            list (filters + pagination)          │
//! │    POST   /api/products            create                               │
//! │    GET    /api/products/search     name OR category substring           │
//! │    GET    /api/products/{id}       fetch one                            │
//! │    PUT    /api/products/{id}       partial update                       │
//! │    DELETE /api/products/{id}       delete                               │
//! │    GET    /api/staff               staff accounts by email              │
//! │    PUT    /api/staff/{id}          partial update      (admin)          │
//! │    DELETE /api/staff/{id}          delete              (admin)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod products;
pub mod users;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::auth::require_auth;
use crate::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/products", get(products::list).post(products::create))
        .route("/api/products/search", get(products::search))
        .route(
            "/api/products/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/api/staff", get(users::list_staff))
        .route(
            "/api/staff/{id}",
            put(users::update_staff).delete(users::delete_staff),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health))
        .route("/api/register", post(users::register))
        .route("/api/login", post(users::login))
        .merge(protected)
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if state.db.health_check().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        )
    }
}
