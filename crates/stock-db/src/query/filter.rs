//! # Predicate Composer
//!
//! Turns a [`ProductFilter`] into the pair of statements a paginated listing
//! needs.
//!
//! ## Statement Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  COUNT:  SELECT COUNT(*) FROM products WHERE 1=1 <predicates>           │
//! │                                                                         │
//! │  DATA:   SELECT <columns> FROM products WHERE 1=1 <predicates>          │
//! │            ORDER BY created_at <ASC|DESC>                               │
//! │            LIMIT $p OFFSET $p+1                                         │
//! │                                                                         │
//! │  <predicates>, in this order, each only when present:                   │
//! │    AND name ILIKE $n        ('%' || value || '%')                       │
//! │    AND category ILIKE $n    ('%' || value || '%')                       │
//! │    AND price >= $n                                                      │
//! │    AND price <= $n                                                      │
//! │    AND stock >= $n                                                      │
//! │    AND stock <= $n                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both statements run the same predicate pass, so their parameter lists are
//! identical up to the two trailing pagination parameters of the data
//! statement.
//!
//! ## Wildcards
//! Substring values are wrapped as `%value%` without escaping `%` or `_`
//! inside `value`. A caller searching for `50%` gets wildcard semantics for
//! the `%`. This is accepted behavior.

use stock_core::{ProductFilter, SortOrder};

use super::builder::{ParameterizedQueryBuilder, Statement};

/// Columns returned for a product row. `price` is NUMERIC in storage and is
/// read back as a float.
pub const PRODUCT_COLUMNS: &str =
    "id, name, price::DOUBLE PRECISION AS price, stock, category, created_at, updated_at";

const COUNT_BASE: &str = "SELECT COUNT(*) FROM products WHERE 1=1";

/// Wraps a substring search value in wildcard markers.
pub fn contains_pattern(value: &str) -> String {
    format!("%{value}%")
}

/// The count and data statements for one listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingStatements {
    pub count: Statement,
    pub data: Statement,
}

/// Appends the present filter criteria, in fixed order, to `builder`.
fn apply_predicates(builder: &mut ParameterizedQueryBuilder, filter: &ProductFilter) {
    if let Some(name) = filter.name() {
        builder.add_predicate("name ILIKE", contains_pattern(name));
    }
    if let Some(category) = filter.category() {
        builder.add_predicate("category ILIKE", contains_pattern(category));
    }
    if let Some(min_price) = filter.min_price() {
        builder.add_predicate("price >=", min_price);
    }
    if let Some(max_price) = filter.max_price() {
        builder.add_predicate("price <=", max_price);
    }
    if let Some(min_stock) = filter.min_stock() {
        builder.add_predicate("stock >=", min_stock);
    }
    if let Some(max_stock) = filter.max_stock() {
        builder.add_predicate("stock <=", max_stock);
    }
}

/// Builds the count statement for `filter`.
pub fn count_statement(filter: &ProductFilter) -> Statement {
    let mut builder = ParameterizedQueryBuilder::new(COUNT_BASE);
    apply_predicates(&mut builder, filter);
    builder.build()
}

/// Builds the data statement for `filter`, including sort and page window.
pub fn data_statement(filter: &ProductFilter) -> Statement {
    let pagination = filter.pagination();
    let mut builder = ParameterizedQueryBuilder::new(format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE 1=1"
    ));
    apply_predicates(&mut builder, filter);
    builder
        .push_sql(" ORDER BY created_at ")
        .push_sql(filter.sort_order().as_sql())
        .push_bound(" LIMIT", pagination.limit())
        .push_bound(" OFFSET", pagination.offset());
    builder.build()
}

/// Builds both listing statements for `filter`.
///
/// ## Example
/// ```rust
/// use stock_core::{Pagination, ProductFilter, SortOrder};
/// use stock_db::query::compose_listing;
///
/// let filter = ProductFilter::new()
///     .with_category("Widgets")
///     .with_sort_order(SortOrder::Asc)
///     .with_pagination(Pagination::new(2, 5));
///
/// let listing = compose_listing(&filter);
/// assert_eq!(
///     listing.count.sql(),
///     "SELECT COUNT(*) FROM products WHERE 1=1 AND category ILIKE $1"
/// );
/// assert!(listing.data.sql().ends_with("ORDER BY created_at ASC LIMIT $2 OFFSET $3"));
/// ```
pub fn compose_listing(filter: &ProductFilter) -> ListingStatements {
    ListingStatements {
        count: count_statement(filter),
        data: data_statement(filter),
    }
}

/// Builds the statement for the free-text search endpoint: one term matched
/// against name or category, no paging.
pub fn search_statement(term: &str, sort_order: SortOrder) -> Statement {
    let mut builder = ParameterizedQueryBuilder::new(format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE"
    ));
    let pattern = contains_pattern(term);
    builder
        .push_bound(" (name ILIKE", pattern.clone())
        .push_bound(" OR category ILIKE", pattern)
        .push_sql(")")
        .push_sql(" ORDER BY created_at ")
        .push_sql(sort_order.as_sql());
    builder.build()
}
