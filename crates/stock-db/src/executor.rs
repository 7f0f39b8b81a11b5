//! # Statement Executor
//!
//! The seam between statement construction and the database driver.
//!
//! ```text
//! ┌───────────────────┐   &Statement   ┌─────────────────────┐
//! │   Repositories    │ ─────────────► │  StatementExecutor  │
//! │  (compose + map)  │ ◄───────────── │  PgPool  │  fakes   │
//! └───────────────────┘  rows / count  └─────────────────────┘
//! ```
//!
//! Repositories hold an explicit executor handle instead of reaching for a
//! process-wide connection, so the same code runs against Postgres in
//! production and an in-memory fake in unit tests.

use async_trait::async_trait;
use sqlx::postgres::PgArguments;
use sqlx::{PgPool, Postgres};
use stock_core::{Product, User};
use tracing::trace;

use crate::error::DbResult;
use crate::query::{SqlParam, Statement};

/// Runs finished statements against storage.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    /// Runs a `SELECT COUNT(*)` statement and returns the count.
    async fn fetch_count(&self, stmt: &Statement) -> DbResult<i64>;

    /// Runs a statement that returns product rows.
    async fn fetch_products(&self, stmt: &Statement) -> DbResult<Vec<Product>>;

    /// Runs a statement that returns user rows.
    async fn fetch_users(&self, stmt: &Statement) -> DbResult<Vec<User>>;

    /// Runs a statement for its side effect and returns rows affected.
    async fn execute(&self, stmt: &Statement) -> DbResult<u64>;
}

// Shared binding logic for every sqlx query flavor.
macro_rules! bind_sql_param {
    ($query:expr, $param:expr) => {
        match $param {
            SqlParam::Text(s) => $query.bind(s.as_str()),
            SqlParam::Int(i) => $query.bind(*i),
            SqlParam::BigInt(i) => $query.bind(*i),
            SqlParam::Float(f) => $query.bind(*f),
            SqlParam::Timestamp(ts) => $query.bind(*ts),
        }
    };
}

fn bind_raw<'q>(
    mut query: sqlx::query::Query<'q, Postgres, PgArguments>,
    params: &'q [SqlParam],
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    for param in params {
        query = bind_sql_param!(query, param);
    }
    query
}

fn bind_rows<'q, T>(
    mut query: sqlx::query::QueryAs<'q, Postgres, T, PgArguments>,
    params: &'q [SqlParam],
) -> sqlx::query::QueryAs<'q, Postgres, T, PgArguments> {
    for param in params {
        query = bind_sql_param!(query, param);
    }
    query
}

fn bind_scalar<'q>(
    mut query: sqlx::query::QueryScalar<'q, Postgres, i64, PgArguments>,
    params: &'q [SqlParam],
) -> sqlx::query::QueryScalar<'q, Postgres, i64, PgArguments> {
    for param in params {
        query = bind_sql_param!(query, param);
    }
    query
}

#[async_trait]
impl StatementExecutor for PgPool {
    async fn fetch_count(&self, stmt: &Statement) -> DbResult<i64> {
        trace!(sql = stmt.sql(), params = stmt.params().len(), "fetch_count");
        let query = bind_scalar(sqlx::query_scalar::<_, i64>(stmt.sql()), stmt.params());
        Ok(query.fetch_one(self).await?)
    }

    async fn fetch_products(&self, stmt: &Statement) -> DbResult<Vec<Product>> {
        trace!(sql = stmt.sql(), params = stmt.params().len(), "fetch_products");
        let query = bind_rows(sqlx::query_as::<_, Product>(stmt.sql()), stmt.params());
        Ok(query.fetch_all(self).await?)
    }

    async fn fetch_users(&self, stmt: &Statement) -> DbResult<Vec<User>> {
        trace!(sql = stmt.sql(), params = stmt.params().len(), "fetch_users");
        let query = bind_rows(sqlx::query_as::<_, User>(stmt.sql()), stmt.params());
        Ok(query.fetch_all(self).await?)
    }

    async fn execute(&self, stmt: &Statement) -> DbResult<u64> {
        trace!(sql = stmt.sql(), params = stmt.params().len(), "execute");
        let result = bind_raw(sqlx::query(stmt.sql()), stmt.params())
            .execute(self)
            .await?;
        Ok(result.rows_affected())
    }
}
