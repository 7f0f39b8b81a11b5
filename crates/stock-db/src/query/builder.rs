//! # Parameterized Query Builder
//!
//! Accumulates SQL text and positional parameters together so that the
//! placeholder written into the text and the value pushed onto the parameter
//! list can never drift apart.
//!
//! ## Alignment Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  builder.add_predicate("name ILIKE", "%bolt%")                          │
//! │       │                                                                 │
//! │       ├── params.push("%bolt%")          → params.len() == 1            │
//! │       └── sql += " AND name ILIKE $1"    → placeholder == params.len()  │
//! │                                                                         │
//! │  builder.add_predicate("price >=", 2.5)                                 │
//! │       ├── params.push(2.5)               → params.len() == 2            │
//! │       └── sql += " AND price >= $2"                                     │
//! │                                                                         │
//! │  Every method that writes a placeholder goes through `bind()`, which    │
//! │  pushes the value and returns "$<new length>" in one step.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Text is only ever appended, in call order, so placeholder `$N` is always
//! the N-th placeholder in the text and binds `params[N - 1]`.

use chrono::{DateTime, Utc};

// =============================================================================
// Parameters
// =============================================================================

/// A value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i32),
    BigInt(i64),
    Float(f64),
    Timestamp(DateTime<Utc>),
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        SqlParam::Int(value)
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::BigInt(value)
    }
}

impl From<f64> for SqlParam {
    fn from(value: f64) -> Self {
        SqlParam::Float(value)
    }
}

impl From<DateTime<Utc>> for SqlParam {
    fn from(value: DateTime<Utc>) -> Self {
        SqlParam::Timestamp(value)
    }
}

// =============================================================================
// Statement
// =============================================================================

/// Finished SQL text plus its ordered parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<SqlParam>,
}

impl Statement {
    /// A statement with literal SQL and no parameters.
    pub fn raw(sql: impl Into<String>) -> Self {
        Statement {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    /// Placeholder numbers in the order they appear in the text.
    ///
    /// ## Example
    /// ```rust
    /// use stock_db::query::ParameterizedQueryBuilder;
    ///
    /// let mut b = ParameterizedQueryBuilder::new("SELECT 1 WHERE 1=1");
    /// b.add_predicate("a =", 1i32).add_predicate("b =", 2i32);
    /// assert_eq!(b.build().placeholders(), vec![1, 2]);
    /// ```
    pub fn placeholders(&self) -> Vec<usize> {
        let bytes = self.sql.as_bytes();
        let mut found = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'$' {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                if end > start {
                    if let Ok(n) = self.sql[start..end].parse() {
                        found.push(n);
                    }
                }
                i = end.max(start);
            } else {
                i += 1;
            }
        }
        found
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builds one parameterized statement by appending fragments.
///
/// ## Usage
/// ```rust
/// use stock_db::query::ParameterizedQueryBuilder;
///
/// let mut b = ParameterizedQueryBuilder::new("UPDATE products SET");
/// b.add_assignment("name", "Bolt").add_assignment("stock", 0i32);
/// b.push_bound(" WHERE id =", 7i64);
///
/// let stmt = b.build();
/// assert_eq!(stmt.sql(), "UPDATE products SET name = $1, stock = $2 WHERE id = $3");
/// assert_eq!(stmt.params().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct ParameterizedQueryBuilder {
    sql: String,
    params: Vec<SqlParam>,
    assignments: usize,
}

impl ParameterizedQueryBuilder {
    /// Starts a statement from literal base text (no placeholders).
    pub fn new(base: impl Into<String>) -> Self {
        ParameterizedQueryBuilder {
            sql: base.into(),
            params: Vec::new(),
            assignments: 0,
        }
    }

    /// Starts an `INSERT INTO <table> (<cols>) VALUES (<placeholders>)`
    /// with one bound value per column, in the order given.
    ///
    /// ## Example
    /// ```rust
    /// use stock_db::query::{ParameterizedQueryBuilder, SqlParam};
    ///
    /// let b = ParameterizedQueryBuilder::insert_into("users", [
    ///     ("email", SqlParam::from("a@b.test")),
    ///     ("role", SqlParam::from("staff")),
    /// ]);
    /// assert_eq!(b.build().sql(), "INSERT INTO users (email, role) VALUES ($1, $2)");
    /// ```
    pub fn insert_into<'c>(
        table: &str,
        values: impl IntoIterator<Item = (&'c str, SqlParam)>,
    ) -> Self {
        let mut builder = ParameterizedQueryBuilder::new(format!("INSERT INTO {table}"));
        let mut columns = Vec::new();
        let mut placeholders = Vec::new();
        for (column, value) in values {
            columns.push(column);
            placeholders.push(builder.bind(value));
        }
        builder.sql.push_str(" (");
        builder.sql.push_str(&columns.join(", "));
        builder.sql.push_str(") VALUES (");
        builder.sql.push_str(&placeholders.join(", "));
        builder.sql.push(')');
        builder
    }

    /// Pushes a value and returns the placeholder that binds it.
    fn bind(&mut self, value: SqlParam) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }

    /// Appends `" AND <lhs> $N"` and binds `value` to `$N`.
    ///
    /// `lhs` is trusted SQL (column + operator) and must never carry user
    /// input; user input only travels as `value`.
    pub fn add_predicate(&mut self, lhs: &str, value: impl Into<SqlParam>) -> &mut Self {
        let placeholder = self.bind(value.into());
        self.sql.push_str(" AND ");
        self.sql.push_str(lhs);
        self.sql.push(' ');
        self.sql.push_str(&placeholder);
        self
    }

    /// Appends `"<column> = $N"` to a SET list and binds `value` to `$N`.
    ///
    /// The first assignment is preceded by a space, later ones by `", "`;
    /// nothing is ever written after the last one.
    pub fn add_assignment(&mut self, column: &str, value: impl Into<SqlParam>) -> &mut Self {
        let placeholder = self.bind(value.into());
        self.sql
            .push_str(if self.assignments == 0 { " " } else { ", " });
        self.sql.push_str(column);
        self.sql.push_str(" = ");
        self.sql.push_str(&placeholder);
        self.assignments += 1;
        self
    }

    /// Number of SET assignments added so far.
    pub fn assignment_count(&self) -> usize {
        self.assignments
    }

    /// True once at least one SET assignment has been added.
    pub fn has_assignments(&self) -> bool {
        self.assignments > 0
    }

    /// Appends literal SQL that carries no parameter (e.g. `ORDER BY`).
    pub fn push_sql(&mut self, fragment: &str) -> &mut Self {
        self.sql.push_str(fragment);
        self
    }

    /// Appends `"<fragment> $N"` and binds `value` to `$N`
    /// (e.g. `" LIMIT"`, `" WHERE id ="`).
    pub fn push_bound(&mut self, fragment: &str, value: impl Into<SqlParam>) -> &mut Self {
        let placeholder = self.bind(value.into());
        self.sql.push_str(fragment);
        self.sql.push(' ');
        self.sql.push_str(&placeholder);
        self
    }

    /// Number of parameters bound so far.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Returns the finished statement. Does not consume or change the
    /// builder; calling it twice yields equal statements.
    pub fn build(&self) -> Statement {
        Statement {
            sql: self.sql.clone(),
            params: self.params.clone(),
        }
    }
}
