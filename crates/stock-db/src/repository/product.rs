//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Filtered, sorted, paginated listing
//! - Free-text search over name and category
//! - CRUD with partial updates
//!
//! ## Paginated Listing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list(filter)                                                           │
//! │       │                                                                 │
//! │       ├── compose_listing(filter) ──► count stmt + data stmt            │
//! │       │                                                                 │
//! │       ├── fetch_count(count stmt)  ──► total                            │
//! │       ├── fetch_products(data stmt) ─► items (one page)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PaginatedResult::assemble(items, total, pagination)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The two statements are not run in a shared transaction. Under concurrent
//! writes `total` and `items` can reflect slightly different snapshots; this
//! is an accepted relaxation.

use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::executor::StatementExecutor;
use crate::query::{
    compose_listing, compose_product_update, search_statement, ParameterizedQueryBuilder,
    SqlParam, Statement, PRODUCT_COLUMNS,
};
use stock_core::{NewProduct, PaginatedResult, Product, ProductFilter, ProductUpdate, SortOrder};

fn select_by_id(id: i64) -> Statement {
    let mut builder =
        ParameterizedQueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"));
    builder.push_bound(" WHERE id =", id);
    builder.build()
}

fn count_by_id(id: i64) -> Statement {
    let mut builder = ParameterizedQueryBuilder::new("SELECT COUNT(*) FROM products");
    builder.push_bound(" WHERE id =", id);
    builder.build()
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let page = repo.list(&ProductFilter::new().with_category("Widgets")).await?;
/// let product = repo.get_by_id(7).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository<E = PgPool> {
    executor: E,
}

impl<E: StatementExecutor> ProductRepository<E> {
    /// Creates a new ProductRepository over any executor.
    pub fn new(executor: E) -> Self {
        ProductRepository { executor }
    }

    /// Lists one page of products matching `filter`.
    ///
    /// Runs the count statement, then the data statement. A failure in
    /// either propagates unchanged; nothing is retried.
    pub async fn list(&self, filter: &ProductFilter) -> DbResult<PaginatedResult<Product>> {
        let pagination = filter.pagination();
        let statements = compose_listing(filter);

        debug!(
            page = pagination.page(),
            limit = pagination.limit(),
            sort = filter.sort_order().as_sql(),
            predicates = statements.count.params().len(),
            "Listing products"
        );

        let total = self.executor.fetch_count(&statements.count).await?;
        let items = self.executor.fetch_products(&statements.data).await?;

        debug!(total, returned = items.len(), "Listed products");
        Ok(PaginatedResult::assemble(items, total, pagination))
    }

    /// Searches name OR category for `term`, ordered by creation time.
    ///
    /// ## Arguments
    /// * `term` - Substring to look for (case-insensitive, wildcards not escaped)
    /// * `sort_order` - Direction for `created_at`
    pub async fn search(&self, term: &str, sort_order: SortOrder) -> DbResult<Vec<Product>> {
        let term = term.trim();
        debug!(term = %term, sort = sort_order.as_sql(), "Searching products");

        let products = self
            .executor
            .fetch_products(&search_statement(term, sort_order))
            .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let rows = self.executor.fetch_products(&select_by_id(id)).await?;
        Ok(rows.into_iter().next())
    }

    /// True when a product with `id` exists.
    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        Ok(self.executor.fetch_count(&count_by_id(id)).await? > 0)
    }

    /// Inserts a new product and returns the stored row.
    ///
    /// `created_at` and `updated_at` are set here, never by the caller.
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        product.validate()?;

        debug!(name = %product.name, category = %product.category, "Inserting product");

        let now = Utc::now();
        let mut builder = ParameterizedQueryBuilder::insert_into(
            "products",
            [
                ("name", SqlParam::from(product.name.as_str())),
                ("price", SqlParam::from(product.price)),
                ("stock", SqlParam::from(product.stock)),
                ("category", SqlParam::from(product.category.as_str())),
                ("created_at", SqlParam::from(now)),
                ("updated_at", SqlParam::from(now)),
            ],
        );
        builder.push_sql(&format!(" RETURNING {PRODUCT_COLUMNS}"));

        let created = self
            .executor
            .fetch_products(&builder.build())
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DbError::Internal("INSERT returned no row".to_string()))?;

        debug!(id = created.id, "Product inserted");
        Ok(created)
    }

    /// Applies a partial update and returns the updated row.
    ///
    /// ## Steps
    /// 1. Validate every present field
    /// 2. Check the row exists (`NotFound` otherwise, no UPDATE issued)
    /// 3. Compose `SET <present fields>, updated_at = now WHERE id = ...`
    /// 4. Execute, then re-read the row
    pub async fn update(&self, update: &ProductUpdate) -> DbResult<Product> {
        update.validate()?;

        if !self.exists(update.id).await? {
            return Err(DbError::not_found("Product", update.id));
        }

        debug!(
            id = update.id,
            fields = update.present_fields(),
            "Updating product"
        );

        let stmt = compose_product_update(update, Utc::now());
        let affected = self.executor.execute(&stmt).await?;
        if affected == 0 {
            return Err(DbError::not_found("Product", update.id));
        }

        self.get_by_id(update.id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", update.id))
    }

    /// Deletes a product.
    ///
    /// ## Returns
    /// * `Ok(())` - Row removed
    /// * `Err(DbError::NotFound)` - No row had this id
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting product");

        let mut builder = ParameterizedQueryBuilder::new("DELETE FROM products");
        builder.push_bound(" WHERE id =", id);

        let affected = self.executor.execute(&builder.build()).await?;
        if affected == 0 {
            return Err(DbError::not_found("Product", id));
        }
        Ok(())
    }
}
