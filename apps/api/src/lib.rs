//! # Stock Dashboard API
//!
//! JSON-over-HTTP server for the inventory backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Stock Dashboard API                             │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  routes::users │  │routes::products│  │  auth                      ││
//! │  │                │  │                │  │                            ││
//! │  │ • register     │  │ • list         │  │ • JwtManager               ││
//! │  │ • login        │  │ • search       │  │ • require_auth middleware  ││
//! │  │ • staff CRUD   │  │ • get/create   │  │ • AuthUser / AdminUser     ││
//! │  │                │  │ • update/delete│  │                            ││
//! │  └───────┬────────┘  └───────┬────────┘  └────────────────────────────┘│
//! │          │                   │                                          │
//! │          └─────────┬─────────┘                                          │
//! │                    ▼                                                    │
//! │          AppState { db, config, jwt }                                   │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │          stock-db::Database (PgPool) ──► PostgreSQL                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`] for the environment variables read at startup.

pub mod auth;
pub mod config;
pub mod error;
pub mod password;
pub mod response;
pub mod routes;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use stock_db::Database;

// Re-exports
pub use auth::JwtManager;
pub use config::ApiConfig;
pub use error::ApiError;
pub use routes::router;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ApiConfig>,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_expiry_secs);
        AppState {
            db,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
        }
    }
}
