//! # Domain Types
//!
//! Core domain types used throughout the inventory backend.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Entities (rows)        Requests (per call)         Options             │
//! │  ───────────────        ───────────────────         ───────             │
//! │  Product                ProductFilter  (search)     SortOrder           │
//! │  User                   ProductUpdate  (patch)      Role                │
//! │                         NewProduct     (insert)                         │
//! │                         UserUpdate     (patch)                          │
//! │                         Credentials    (login/register)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Presence vs Zero
//! Patch types model every optional field as `Option<T>`. `Some(0)` for
//! `stock` means "set stock to zero"; `None` means "leave stock alone".
//! Filter types are different: a numeric filter bound of zero or less is
//! treated as "not supplied" and is dropped on construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::pagination::Pagination;
use crate::validation::{
    validate_category, validate_email, validate_id, validate_password, validate_price,
    validate_product_name, validate_stock, ValidationResult,
};

// =============================================================================
// Sort Order
// =============================================================================

/// Direction for `ORDER BY created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Parses `asc`/`desc` (any case). Anything else, including a missing
    /// value, falls back to descending without error.
    ///
    /// ## Example
    /// ```rust
    /// use stock_core::SortOrder;
    ///
    /// assert_eq!(SortOrder::parse_or_default(Some("ASC")), SortOrder::Asc);
    /// assert_eq!(SortOrder::parse_or_default(Some("sideways")), SortOrder::Desc);
    /// assert_eq!(SortOrder::parse_or_default(None), SortOrder::Desc);
    /// ```
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    /// SQL keyword for this direction.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Storage-assigned identity.
    pub id: i64,

    pub name: String,

    /// Unit price, always > 0.
    pub price: f64,

    /// Units on hand, always ≥ 0.
    pub stock: i32,

    pub category: String,

    /// Set on insert by the repository, never by the caller.
    pub created_at: DateTime<Utc>,

    /// Refreshed by every update.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub stock: i32,
    pub category: String,
}

impl NewProduct {
    /// Checks every field against the product rules.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_product_name(&self.name)?;
        validate_price(self.price)?;
        validate_stock(self.stock)?;
        validate_category(&self.category)?;
        Ok(())
    }
}

/// Partial update for one product.
///
/// Only `Some` fields are written; `updated_at` is always refreshed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub id: i64,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub category: Option<String>,
}

impl ProductUpdate {
    /// Creates an update for `id` with no fields present.
    pub fn new(id: i64) -> Self {
        ProductUpdate {
            id,
            ..Default::default()
        }
    }

    /// Checks the identifier and every present field.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_id("product_id", self.id)?;
        if let Some(name) = &self.name {
            validate_product_name(name)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(stock) = self.stock {
            validate_stock(stock)?;
        }
        if let Some(category) = &self.category {
            validate_category(category)?;
        }
        Ok(())
    }

    /// Number of optional fields that will be written.
    pub fn present_fields(&self) -> usize {
        [
            self.name.is_some(),
            self.price.is_some(),
            self.stock.is_some(),
            self.category.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

// =============================================================================
// Product Filter
// =============================================================================

/// Search, sort and pagination criteria for a product listing.
///
/// Built once per request and consumed by the predicate composer.
///
/// ## Example
/// ```rust
/// use stock_core::{Pagination, ProductFilter, SortOrder};
///
/// let filter = ProductFilter::new()
///     .with_category("Widgets")
///     .with_min_price(0.0) // dropped: not > 0
///     .with_sort_order(SortOrder::Asc)
///     .with_pagination(Pagination::new(2, 5));
///
/// assert_eq!(filter.category(), Some("Widgets"));
/// assert_eq!(filter.min_price(), None);
/// assert_eq!(filter.pagination().offset(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    name: Option<String>,
    category: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    min_stock: Option<i32>,
    max_stock: Option<i32>,
    sort_order: SortOrder,
    pagination: Pagination,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn positive_price(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

fn positive_stock(value: i32) -> Option<i32> {
    (value > 0).then_some(value)
}

impl ProductFilter {
    /// An empty filter: every row, newest first, first page of 10.
    pub fn new() -> Self {
        ProductFilter::default()
    }

    /// Case-insensitive substring match on name. Empty strings are ignored.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = non_empty(name.into());
        self
    }

    /// Case-insensitive substring match on category. Empty strings are ignored.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_empty(category.into());
        self
    }

    /// Lower price bound (inclusive). Ignored unless > 0.
    pub fn with_min_price(mut self, price: f64) -> Self {
        self.min_price = positive_price(price);
        self
    }

    /// Upper price bound (inclusive). Ignored unless > 0.
    pub fn with_max_price(mut self, price: f64) -> Self {
        self.max_price = positive_price(price);
        self
    }

    /// Lower stock bound (inclusive). Ignored unless > 0.
    pub fn with_min_stock(mut self, stock: i32) -> Self {
        self.min_stock = positive_stock(stock);
        self
    }

    /// Upper stock bound (inclusive). Ignored unless > 0.
    pub fn with_max_stock(mut self, stock: i32) -> Self {
        self.max_stock = positive_stock(stock);
        self
    }

    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn min_price(&self) -> Option<f64> {
        self.min_price
    }

    pub fn max_price(&self) -> Option<f64> {
        self.max_price
    }

    pub fn min_stock(&self) -> Option<i32> {
        self.min_stock
    }

    pub fn max_stock(&self) -> Option<i32> {
        self.max_stock
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// True when no criterion narrows the result set.
    pub fn is_unfiltered(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.min_stock.is_none()
            && self.max_stock.is_none()
    }
}

// =============================================================================
// Users
// =============================================================================

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Staff,
    Admin,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }

    /// Parses a stored or requested role name.
    pub fn parse(raw: &str) -> ValidationResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["staff".to_string(), "admin".to_string()],
            }),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user account row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,

    /// Stored lower-cased.
    pub email: String,

    /// PHC-format hash. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: String,
}

impl User {
    /// Role of this account; unknown stored values are treated as staff.
    pub fn role(&self) -> Role {
        Role::parse(&self.role).unwrap_or_default()
    }
}

/// Email/password pair used for both login and registration.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl Credentials {
    /// Email as stored: trimmed and lower-cased.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }

    /// Validates the email/password pair.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        Ok(())
    }

    /// Role named in the request body, staff when absent. Not a grant.
    pub fn requested_role(&self) -> ValidationResult<Role> {
        match self.role.as_deref().map(str::trim) {
            None | Some("") => Ok(Role::Staff),
            Some(raw) => Role::parse(raw),
        }
    }
}

/// Partial update for one user account.
///
/// `password` holds the plaintext; the repository layer hashes it before
/// composing the statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub id: i64,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

impl UserUpdate {
    pub fn new(id: i64) -> Self {
        UserUpdate {
            id,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_id("user_id", self.id)?;
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(password) = &self.password {
            validate_password(password)?;
        }
        Ok(())
    }

    pub fn present_fields(&self) -> usize {
        [self.email.is_some(), self.password.is_some(), self.role.is_some()]
            .iter()
            .filter(|present| **present)
            .count()
    }
}
