//! # Partial Update Composer
//!
//! Builds `UPDATE ... SET ... WHERE id = $n` statements that touch only the
//! fields a caller supplied.
//!
//! ## Shape
//! ```text
//! UPDATE products SET [name = $1, ][price = $2, ][stock = $3, ][category = $4, ]
//!                     updated_at = $k+1
//!                 WHERE id = $k+2
//! ```
//!
//! `updated_at` is always assigned, so an update with no fields present is a
//! valid timestamp refresh. Separators are only ever written between two
//! assignments.
//!
//! Composing does not check that the row exists; repositories do that first
//! and return `NotFound` without issuing the UPDATE.

use chrono::{DateTime, Utc};
use stock_core::{ProductUpdate, UserUpdate};

use super::builder::{ParameterizedQueryBuilder, Statement};

/// Builds the UPDATE for a product.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use stock_core::ProductUpdate;
/// use stock_db::query::compose_product_update;
///
/// let mut update = ProductUpdate::new(7);
/// update.price = Some(19.99);
///
/// let stmt = compose_product_update(&update, Utc::now());
/// assert_eq!(
///     stmt.sql(),
///     "UPDATE products SET price = $1, updated_at = $2 WHERE id = $3"
/// );
/// ```
pub fn compose_product_update(update: &ProductUpdate, now: DateTime<Utc>) -> Statement {
    let mut builder = ParameterizedQueryBuilder::new("UPDATE products SET");

    if let Some(name) = &update.name {
        builder.add_assignment("name", name.as_str());
    }
    if let Some(price) = update.price {
        builder.add_assignment("price", price);
    }
    if let Some(stock) = update.stock {
        builder.add_assignment("stock", stock);
    }
    if let Some(category) = &update.category {
        builder.add_assignment("category", category.as_str());
    }

    builder.add_assignment("updated_at", now);
    builder.push_bound(" WHERE id =", update.id);
    builder.build()
}

/// Builds the UPDATE for a user account.
///
/// `password_hash` must already be hashed; the plaintext in
/// [`UserUpdate::password`] is never written.
pub fn compose_user_update(
    update: &UserUpdate,
    password_hash: Option<&str>,
    now: DateTime<Utc>,
) -> Statement {
    let mut builder = ParameterizedQueryBuilder::new("UPDATE users SET");

    if let Some(email) = &update.email {
        builder.add_assignment("email", email.trim().to_lowercase());
    }
    if let Some(hash) = password_hash {
        builder.add_assignment("password_hash", hash);
    }
    if let Some(role) = update.role {
        builder.add_assignment("role", role.as_str());
    }

    builder.add_assignment("updated_at", now);
    builder.push_bound(" WHERE id =", update.id);
    builder.build()
}
