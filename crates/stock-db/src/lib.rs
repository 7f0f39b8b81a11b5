//! # stock-db: Database Layer for the Stock Dashboard
//!
//! PostgreSQL access through sqlx. Every statement is built at runtime by
//! the [`query`] module and executed through a [`StatementExecutor`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stock Dashboard Data Flow                        │
//! │                                                                         │
//! │  HTTP handler (GET /api/products?category=Widgets&page=2)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     stock-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌───────────────┐   ┌──────────────────┐  │   │
//! │  │   │ Repositories │──►│     query     │   │    Migrations    │  │   │
//! │  │   │ ProductRepo  │   │ builder       │   │   (embedded)     │  │   │
//! │  │   │ UserRepo     │   │ filter/update │   │ 0001_initial.sql │  │   │
//! │  │   └──────┬───────┘   └───────────────┘   └──────────────────┘  │   │
//! │  │          │ Statement                                            │   │
//! │  │          ▼                                                      │   │
//! │  │   ┌──────────────────────────┐   ┌───────────────────────┐     │   │
//! │  │   │ StatementExecutor        │   │ Database (pool.rs)    │     │   │
//! │  │   │ impl for PgPool          │◄──│ PgPool, health, close │     │   │
//! │  │   └──────────────────────────┘   └───────────────────────┘     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PostgreSQL                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`executor`] - The statement-execution seam
//! - [`query`] - Parameterized statement construction
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stock_core::ProductFilter;
//! use stock_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("postgres://localhost/stock")).await?;
//! let page = db.products().list(&ProductFilter::new().with_name("bolt")).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod executor;
pub mod migrations;
pub mod pool;
pub mod query;
pub mod repository;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use executor::StatementExecutor;
pub use pool::{Database, DbConfig};

pub use repository::{ProductRepository, UserRepository};
