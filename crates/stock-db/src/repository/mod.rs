//! # Repository Module
//!
//! Database repository implementations for the stock dashboard.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                           │
//! │       │                                                                 │
//! │       │  db.products().list(&filter)                                    │
//! │       ▼                                                                 │
//! │  ProductRepository<E>                                                   │
//! │  ├── list(&self, filter)        count + page                            │
//! │  ├── search(&self, term, sort)                                          │
//! │  ├── get_by_id / insert / update / delete                               │
//! │       │                                                                 │
//! │       │  Statement (SQL + params)                                       │
//! │       ▼                                                                 │
//! │  E: StatementExecutor   (PgPool in production)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Product listing, search and CRUD
//! - [`UserRepository`] - Accounts and staff management

pub mod product;
pub mod user;

pub use product::ProductRepository;
pub use user::UserRepository;
