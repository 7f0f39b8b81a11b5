//! # Query Construction
//!
//! Everything that turns sparse, optional request criteria into
//! parameterized SQL.
//!
//! ```text
//! ProductFilter ──► filter::compose_listing ──┐
//!                                             ├──► builder::ParameterizedQueryBuilder ──► Statement
//! ProductUpdate ──► update::compose_*_update ─┘
//! ```
//!
//! Nothing in this module touches the database; statements are executed by
//! a [`crate::StatementExecutor`].

pub mod builder;
pub mod filter;
pub mod update;

pub use builder::{ParameterizedQueryBuilder, SqlParam, Statement};
pub use filter::{
    compose_listing, contains_pattern, count_statement, data_statement, search_statement,
    ListingStatements, PRODUCT_COLUMNS,
};
pub use update::{compose_product_update, compose_user_update};
