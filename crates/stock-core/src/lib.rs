//! # stock-core: Pure Domain Logic for the Stock Dashboard
//!
//! Types, validation rules and pagination arithmetic with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Stock Dashboard Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (axum)                              │   │
//! │  │    /api/products, /api/staff, /api/login, /api/register         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stock-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌────────────┐                │   │
//! │  │   │   types   │  │ pagination │  │ validation │                │   │
//! │  │   │  Product  │  │ Pagination │  │   rules    │                │   │
//! │  │   │  Filter   │  │ Paginated  │  │   checks   │                │   │
//! │  │   └───────────┘  └────────────┘  └────────────┘                │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    stock-db (Database Layer)                    │   │
//! │  │        query builder, composers, repositories, migrations       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, ProductFilter, ProductUpdate, User)
//! - [`pagination`] - Page/limit normalization and page-count arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use stock_core::{Pagination, PaginatedResult};
//!
//! let page = Pagination::new(2, 5);
//! assert_eq!(page.offset(), 5);
//!
//! let result = PaginatedResult::assemble(vec!["a", "b"], 12, page);
//! assert_eq!(result.total_pages, 3);
//! ```

pub mod error;
pub mod pagination;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use pagination::{PaginatedResult, Pagination};
pub use types::*;
