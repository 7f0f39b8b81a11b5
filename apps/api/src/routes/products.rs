//! Product handlers: listing, search and CRUD.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use stock_core::validation::parse_id;
use stock_core::{NewProduct, Pagination, Product, ProductFilter, ProductUpdate, SortOrder};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::response::{ApiResponse, PageData};
use crate::AppState;

// =============================================================================
// Query parameters
// =============================================================================

/// Raw listing parameters, keys matched case-insensitively.
///
/// Numbers that do not parse are dropped as if absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
    pub sort_order: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ListParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = ListParams::default();

        for (key, value) in pairs {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            match key.to_ascii_lowercase().as_str() {
                "name" => params.name = Some(value.to_string()),
                "category" => params.category = Some(value.to_string()),
                "min_price" => params.min_price = value.parse().ok(),
                "max_price" => params.max_price = value.parse().ok(),
                "min_stock" => params.min_stock = value.parse().ok(),
                "max_stock" => params.max_stock = value.parse().ok(),
                "sort_order" => params.sort_order = Some(value.to_string()),
                "page" => params.page = value.parse().ok(),
                "limit" => params.limit = value.parse().ok(),
                _ => {}
            }
        }

        params
    }

    pub fn into_filter(self) -> ProductFilter {
        let mut filter = ProductFilter::new()
            .with_sort_order(SortOrder::parse_or_default(self.sort_order.as_deref()))
            .with_pagination(Pagination::from_optional(self.page, self.limit));

        if let Some(name) = self.name {
            filter = filter.with_name(name);
        }
        if let Some(category) = self.category {
            filter = filter.with_category(category);
        }
        if let Some(price) = self.min_price {
            filter = filter.with_min_price(price);
        }
        if let Some(price) = self.max_price {
            filter = filter.with_max_price(price);
        }
        if let Some(stock) = self.min_stock {
            filter = filter.with_min_stock(stock);
        }
        if let Some(stock) = self.max_stock {
            filter = filter.with_max_stock(stock);
        }
        filter
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
}

// =============================================================================
// Bodies
// =============================================================================

/// `PUT /api/products/{id}` body. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub category: Option<String>,
}

impl UpdateProductRequest {
    pub fn into_update(self, id: i64) -> ProductUpdate {
        ProductUpdate {
            id,
            name: self.name,
            price: self.price,
            stock: self.stock,
            category: self.category,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductData {
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct SearchData {
    pub items: Vec<Product>,
    pub count: usize,
    pub term: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedProduct {
    pub product_id: i64,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/products`
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<ApiResponse<PageData<Product>>, ApiError> {
    let Query(pairs) = query?;
    let filter = ListParams::from_pairs(pairs).into_filter();

    let page = state.db.products().list(&filter).await?;
    tracing::debug!(total = page.total, page = page.page, "Listed products");

    Ok(ApiResponse::success(
        PageData::from(page),
        "Products fetched successfully",
    ))
}

/// `GET /api/products/search?q=&sort_order=`
pub async fn search(
    State(state): State<AppState>,
    _user: AuthUser,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<ApiResponse<SearchData>, ApiError> {
    let Query(params) = query?;
    let term = search_term(params.q.as_deref())?;
    let sort_order = SortOrder::parse_or_default(params.sort_order.as_deref());

    let items = state.db.products().search(&term, sort_order).await?;
    tracing::debug!(term = %term, hits = items.len(), "Searched products");

    Ok(ApiResponse::success(
        SearchData {
            count: items.len(),
            items,
            term,
        },
        "Search completed successfully",
    ))
}

/// `GET /api/products/{id}`
pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(raw_id): Path<String>,
) -> Result<ApiResponse<ProductData>, ApiError> {
    let id = parse_id("product_id", &raw_id)?;

    let product = state
        .db
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;

    Ok(ApiResponse::success(
        ProductData { product },
        "Product fetched successfully",
    ))
}

/// `POST /api/products`
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<ProductData>), ApiError> {
    let Json(new_product) = body?;

    let product = state.db.products().insert(&new_product).await?;
    tracing::info!(id = product.id, created_by = user.id, "Product created");

    Ok(ApiResponse::success(ProductData { product }, "Product created successfully").created())
}

/// `PUT /api/products/{id}`
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<ApiResponse<ProductData>, ApiError> {
    let id = parse_id("product_id", &raw_id)?;
    let Json(request) = body?;

    let product = state
        .db
        .products()
        .update(&request.into_update(id))
        .await?;
    tracing::info!(id = product.id, updated_by = user.id, "Product updated");

    Ok(ApiResponse::success(
        ProductData { product },
        "Product updated successfully",
    ))
}

/// `DELETE /api/products/{id}`
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
) -> Result<ApiResponse<DeletedProduct>, ApiError> {
    let id = parse_id("product_id", &raw_id)?;

    state.db.products().delete(id).await?;
    tracing::info!(id, deleted_by = user.id, "Product deleted");

    Ok(ApiResponse::success(
        DeletedProduct { product_id: id },
        "Product deleted successfully",
    ))
}

fn search_term(raw: Option<&str>) -> Result<String, ApiError> {
    match raw.map(str::trim) {
        Some(term) if !term.is_empty() => Ok(term.to_string()),
        _ => Err(ApiError::validation("Search term is required")),
    }
}
