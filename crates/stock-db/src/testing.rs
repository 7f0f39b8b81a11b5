//! In-memory [`StatementExecutor`] for unit tests.
//!
//! Understands exactly the statement shapes this crate emits: `WHERE`
//! clauses made of `1=1`, `col op $n` and one `(a ILIKE $n OR b ILIKE $m)`
//! group, `ORDER BY`, `LIMIT`/`OFFSET`, `INSERT ... RETURNING`,
//! `UPDATE ... SET` and `DELETE`. Every statement it sees is recorded.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use stock_core::{Product, User};

use crate::error::{DbError, DbResult};
use crate::executor::StatementExecutor;
use crate::query::{SqlParam, Statement};

#[derive(Debug, Default)]
struct State {
    products: Vec<Product>,
    users: Vec<User>,
    next_id: i64,
    statements: Vec<Statement>,
    fail_on: Option<&'static str>,
}

/// Shared-state fake; clones see the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryExecutor {
    state: Arc<Mutex<State>>,
}

impl MemoryExecutor {
    pub fn new() -> Self {
        MemoryExecutor {
            state: Arc::new(Mutex::new(State {
                next_id: 1,
                ..State::default()
            })),
        }
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        let executor = MemoryExecutor::new();
        {
            let mut state = executor.lock();
            state.next_id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
            state.products = products;
        }
        executor
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let executor = MemoryExecutor::new();
        {
            let mut state = executor.lock();
            state.next_id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
            state.users = users;
        }
        executor
    }

    /// Makes every statement whose text contains `needle` fail.
    pub fn fail_on(&self, needle: &'static str) {
        self.lock().fail_on = Some(needle);
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.lock().statements.clone()
    }

    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.lock().users.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn record(&self, stmt: &Statement) -> DbResult<MutexGuard<'_, State>> {
        let mut state = self.lock();
        state.statements.push(stmt.clone());
        match state.fail_on {
            Some(needle) if stmt.sql().contains(needle) => {
                Err(DbError::QueryFailed("simulated failure".to_string()))
            }
            _ => Ok(state),
        }
    }
}

/// A test fixture product.
pub fn product(id: i64, name: &str, category: &str, created_at: DateTime<Utc>) -> Product {
    Product {
        id,
        name: name.to_string(),
        price: 10.0,
        stock: 5,
        category: category.to_string(),
        created_at,
        updated_at: created_at,
    }
}

/// A test fixture user.
pub fn user(id: i64, email: &str, role: &str) -> User {
    User {
        id,
        email: email.to_string(),
        password_hash: format!("hash-of-{email}"),
        role: role.to_string(),
    }
}

// =============================================================================
// Row access
// =============================================================================

enum Value<'a> {
    Text(&'a str),
    Float(f64),
    Int(i64),
}

trait Row {
    fn value(&self, column: &str) -> Value<'_>;
    fn assign(&mut self, column: &str, param: &SqlParam);
}

impl Row for Product {
    fn value(&self, column: &str) -> Value<'_> {
        match column {
            "id" => Value::Int(self.id),
            "name" => Value::Text(&self.name),
            "category" => Value::Text(&self.category),
            "price" => Value::Float(self.price),
            "stock" => Value::Int(self.stock as i64),
            other => panic!("unknown product column {other}"),
        }
    }

    fn assign(&mut self, column: &str, param: &SqlParam) {
        match (column, param) {
            ("name", SqlParam::Text(v)) => self.name = v.clone(),
            ("category", SqlParam::Text(v)) => self.category = v.clone(),
            ("price", SqlParam::Float(v)) => self.price = *v,
            ("stock", SqlParam::Int(v)) => self.stock = *v,
            ("created_at", SqlParam::Timestamp(v)) => self.created_at = *v,
            ("updated_at", SqlParam::Timestamp(v)) => self.updated_at = *v,
            other => panic!("unexpected product assignment {other:?}"),
        }
    }
}

impl Row for User {
    fn value(&self, column: &str) -> Value<'_> {
        match column {
            "id" => Value::Int(self.id),
            "email" => Value::Text(&self.email),
            "role" => Value::Text(&self.role),
            other => panic!("unknown user column {other}"),
        }
    }

    fn assign(&mut self, column: &str, param: &SqlParam) {
        match (column, param) {
            ("email", SqlParam::Text(v)) => self.email = v.clone(),
            ("password_hash", SqlParam::Text(v)) => self.password_hash = v.clone(),
            ("role", SqlParam::Text(v)) => self.role = v.clone(),
            ("created_at" | "updated_at", SqlParam::Timestamp(_)) => {}
            other => panic!("unexpected user assignment {other:?}"),
        }
    }
}

// =============================================================================
// Statement interpretation
// =============================================================================

fn param<'a>(stmt: &'a Statement, placeholder: &str) -> &'a SqlParam {
    let n: usize = placeholder
        .trim_start_matches('$')
        .trim_end_matches(')')
        .parse()
        .unwrap();
    &stmt.params()[n - 1]
}

fn where_clause(sql: &str) -> Option<&str> {
    let start = sql.find(" WHERE ")? + " WHERE ".len();
    let rest = &sql[start..];
    let end = [" ORDER BY", " LIMIT", " RETURNING"]
        .iter()
        .filter_map(|marker| rest.find(marker))
        .min()
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

fn compare(row: &impl Row, condition: &str, stmt: &Statement) -> bool {
    let parts: Vec<&str> = condition.split_whitespace().collect();
    let &[column, op, placeholder] = parts.as_slice() else {
        panic!("unsupported condition {condition}");
    };
    match (row.value(column), op, param(stmt, placeholder)) {
        (Value::Text(v), "ILIKE", SqlParam::Text(p)) => v
            .to_lowercase()
            .contains(&p.trim_matches('%').to_lowercase()),
        (Value::Text(v), "=", SqlParam::Text(p)) => v == p.as_str(),
        (Value::Int(v), "=", SqlParam::BigInt(p)) => v == *p,
        (Value::Float(v), ">=", SqlParam::Float(p)) => v >= *p,
        (Value::Float(v), "<=", SqlParam::Float(p)) => v <= *p,
        (Value::Int(v), ">=", SqlParam::Int(p)) => v >= *p as i64,
        (Value::Int(v), "<=", SqlParam::Int(p)) => v <= *p as i64,
        _ => panic!("unsupported comparison {condition}"),
    }
}

fn matches(row: &impl Row, stmt: &Statement) -> bool {
    let Some(clause) = where_clause(stmt.sql()) else {
        return true;
    };
    clause.split(" AND ").all(|condition| {
        let condition = condition.trim();
        if condition == "1=1" {
            true
        } else if let Some(group) = condition.strip_prefix('(') {
            group
                .trim_end_matches(')')
                .split(" OR ")
                .any(|alt| compare(row, alt, stmt))
        } else {
            compare(row, condition, stmt)
        }
    })
}

fn window<T>(rows: Vec<T>, stmt: &Statement) -> Vec<T> {
    if !stmt.sql().contains(" LIMIT $") {
        return rows;
    }
    let params = stmt.params();
    let (SqlParam::BigInt(limit), SqlParam::BigInt(offset)) =
        (&params[params.len() - 2], &params[params.len() - 1])
    else {
        panic!("LIMIT/OFFSET must be BIGINT");
    };
    rows.into_iter()
        .skip(*offset as usize)
        .take(*limit as usize)
        .collect()
}

fn assignments(stmt: &Statement) -> Vec<(String, SqlParam)> {
    let sql = stmt.sql();
    let start = sql.find(" SET ").unwrap() + " SET ".len();
    let end = sql.find(" WHERE ").unwrap();
    sql[start..end]
        .split(", ")
        .map(|assignment| {
            let (column, placeholder) = assignment.split_once(" = ").unwrap();
            (column.to_string(), param(stmt, placeholder).clone())
        })
        .collect()
}

fn inserted(stmt: &Statement) -> Vec<(String, SqlParam)> {
    let sql = stmt.sql();
    let open = sql.find('(').unwrap();
    let close = sql.find(')').unwrap();
    sql[open + 1..close]
        .split(", ")
        .zip(stmt.params())
        .map(|(column, value)| (column.to_string(), value.clone()))
        .collect()
}

fn is_on(sql: &str, table: &str) -> bool {
    sql.contains(&format!("FROM {table}"))
        || sql.contains(&format!("INTO {table}"))
        || sql.contains(&format!("UPDATE {table}"))
}

#[async_trait]
impl StatementExecutor for MemoryExecutor {
    async fn fetch_count(&self, stmt: &Statement) -> DbResult<i64> {
        let state = self.record(stmt)?;
        let count = if is_on(stmt.sql(), "products") {
            state.products.iter().filter(|p| matches(*p, stmt)).count()
        } else {
            state.users.iter().filter(|u| matches(*u, stmt)).count()
        };
        Ok(count as i64)
    }

    async fn fetch_products(&self, stmt: &Statement) -> DbResult<Vec<Product>> {
        let mut state = self.record(stmt)?;

        if stmt.sql().starts_with("INSERT") {
            let now = Utc::now();
            let mut row = product(state.next_id, "", "", now);
            for (column, value) in inserted(stmt) {
                row.assign(&column, &value);
            }
            state.next_id += 1;
            state.products.push(row.clone());
            return Ok(vec![row]);
        }

        let mut rows: Vec<Product> = state
            .products
            .iter()
            .filter(|p| matches(*p, stmt))
            .cloned()
            .collect();
        if stmt.sql().contains("ORDER BY created_at ASC") {
            rows.sort_by_key(|p| p.created_at);
        } else if stmt.sql().contains("ORDER BY created_at DESC") {
            rows.sort_by_key(|p| std::cmp::Reverse(p.created_at));
        }
        Ok(window(rows, stmt))
    }

    async fn fetch_users(&self, stmt: &Statement) -> DbResult<Vec<User>> {
        let mut state = self.record(stmt)?;

        if stmt.sql().starts_with("INSERT") {
            let mut row = user(state.next_id, "", "staff");
            for (column, value) in inserted(stmt) {
                row.assign(&column, &value);
            }
            if state.users.iter().any(|u| u.email == row.email) {
                return Err(DbError::duplicate("email", row.email));
            }
            state.next_id += 1;
            state.users.push(row.clone());
            return Ok(vec![row]);
        }

        let mut rows: Vec<User> = state
            .users
            .iter()
            .filter(|u| matches(*u, stmt))
            .cloned()
            .collect();
        if stmt.sql().contains("ORDER BY email") {
            rows.sort_by(|a, b| a.email.cmp(&b.email));
        }
        Ok(window(rows, stmt))
    }

    async fn execute(&self, stmt: &Statement) -> DbResult<u64> {
        let mut state = self.record(stmt)?;
        let sql = stmt.sql();

        let affected = if sql.starts_with("UPDATE products") {
            let changes = assignments(stmt);
            let mut n = 0;
            for row in state.products.iter_mut().filter(|p| matches(&**p, stmt)) {
                for (column, value) in &changes {
                    row.assign(column, value);
                }
                n += 1;
            }
            n
        } else if sql.starts_with("UPDATE users") {
            let changes = assignments(stmt);
            let mut n = 0;
            for row in state.users.iter_mut().filter(|u| matches(&**u, stmt)) {
                for (column, value) in &changes {
                    row.assign(column, value);
                }
                n += 1;
            }
            n
        } else if sql.starts_with("DELETE FROM products") {
            let before = state.products.len();
            state.products.retain(|p| !matches(p, stmt));
            before - state.products.len()
        } else if sql.starts_with("DELETE FROM users") {
            let before = state.users.len();
            state.users.retain(|u| !matches(u, stmt));
            before - state.users.len()
        } else {
            0
        };
        Ok(affected as u64)
    }
}
