//! # User Repository
//!
//! Account storage: registration, credential lookup, staff management.
//!
//! Password hashing happens above this layer; every method here takes or
//! returns the stored PHC hash, never a plaintext password.

use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::executor::StatementExecutor;
use crate::query::{compose_user_update, ParameterizedQueryBuilder, SqlParam, Statement};
use stock_core::{Role, User, UserUpdate};

const USER_COLUMNS: &str = "id, email, password_hash, role";

fn select_where(column: &str, value: impl Into<SqlParam>) -> Statement {
    let mut builder = ParameterizedQueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users"));
    builder.push_bound(&format!(" WHERE {column} ="), value);
    builder.build()
}

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository<E = PgPool> {
    executor: E,
}

impl<E: StatementExecutor> UserRepository<E> {
    pub fn new(executor: E) -> Self {
        UserRepository { executor }
    }

    /// Stores a new account. The email is lower-cased before insert.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Email already registered
    pub async fn create(&self, email: &str, password_hash: &str, role: Role) -> DbResult<User> {
        let email = email.trim().to_lowercase();
        debug!(email = %email, role = %role, "Creating user");

        let now = Utc::now();
        let mut builder = ParameterizedQueryBuilder::insert_into(
            "users",
            [
                ("email", SqlParam::from(email.as_str())),
                ("password_hash", SqlParam::from(password_hash)),
                ("role", SqlParam::from(role.as_str())),
                ("created_at", SqlParam::from(now)),
                ("updated_at", SqlParam::from(now)),
            ],
        );
        builder.push_sql(&format!(" RETURNING {USER_COLUMNS}"));

        let created = match self.executor.fetch_users(&builder.build()).await {
            Ok(rows) => rows.into_iter().next(),
            Err(DbError::UniqueViolation { .. }) => {
                return Err(DbError::duplicate("email", email));
            }
            Err(err) => return Err(err),
        };

        let user =
            created.ok_or_else(|| DbError::Internal("INSERT returned no row".to_string()))?;
        debug!(id = user.id, "User created");
        Ok(user)
    }

    /// Looks up an account by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let email = email.trim().to_lowercase();
        let rows = self
            .executor
            .fetch_users(&select_where("email", email))
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let rows = self.executor.fetch_users(&select_where("id", id)).await?;
        Ok(rows.into_iter().next())
    }

    /// All accounts with role `staff`, ordered by email.
    pub async fn list_staff(&self) -> DbResult<Vec<User>> {
        let mut builder = ParameterizedQueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users"));
        builder
            .push_bound(" WHERE role =", Role::Staff.as_str())
            .push_sql(" ORDER BY email");

        let users = self.executor.fetch_users(&builder.build()).await?;
        debug!(count = users.len(), "Listed staff");
        Ok(users)
    }

    /// Applies a partial update.
    ///
    /// `password_hash` replaces the stored hash when present; callers hash
    /// [`UserUpdate::password`] before calling.
    pub async fn update(&self, update: &UserUpdate, password_hash: Option<&str>) -> DbResult<User> {
        update.validate()?;

        let mut builder = ParameterizedQueryBuilder::new("SELECT COUNT(*) FROM users");
        builder.push_bound(" WHERE id =", update.id);
        if self.executor.fetch_count(&builder.build()).await? == 0 {
            return Err(DbError::not_found("User", update.id));
        }

        debug!(
            id = update.id,
            fields = update.present_fields(),
            "Updating user"
        );

        let stmt = compose_user_update(update, password_hash, Utc::now());
        match self.executor.execute(&stmt).await {
            Ok(0) => return Err(DbError::not_found("User", update.id)),
            Ok(_) => {}
            Err(DbError::UniqueViolation { .. }) => {
                let email = update.email.clone().unwrap_or_default();
                return Err(DbError::duplicate("email", email));
            }
            Err(err) => return Err(err),
        }

        self.get_by_id(update.id)
            .await?
            .ok_or_else(|| DbError::not_found("User", update.id))
    }

    /// Deletes an account.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No row had this id; nothing was removed
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting user");

        let mut builder = ParameterizedQueryBuilder::new("DELETE FROM users");
        builder.push_bound(" WHERE id =", id);

        if self.executor.execute(&builder.build()).await? == 0 {
            return Err(DbError::not_found("User", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{user, MemoryExecutor};

    #[tokio::test]
    async fn test_create_lowercases_email() {
        let executor = MemoryExecutor::new();
        let repo = UserRepository::new(executor.clone());

        let created = repo
            .create("  Clerk@Shop.TEST ", "$argon2id$stub", Role::Staff)
            .await
            .unwrap();

        assert_eq!(created.email, "clerk@shop.test");
        assert_eq!(created.role(), Role::Staff);
        assert_eq!(executor.users().len(), 1);
    }

    #[tokio::test]
    async fn test_create_duplicate_email() {
        let repo = UserRepository::new(MemoryExecutor::with_users(vec![user(
            1,
            "clerk@shop.test",
            "staff",
        )]));

        let err = repo
            .create("CLERK@shop.test", "$argon2id$stub", Role::Staff)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::UniqueViolation { ref field, .. } if field == "email"
        ));
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let repo = UserRepository::new(MemoryExecutor::with_users(vec![user(
            3,
            "boss@shop.test",
            "admin",
        )]));

        let found = repo.find_by_email("Boss@Shop.test").await.unwrap().unwrap();
        assert_eq!(found.id, 3);
        assert_eq!(found.role(), Role::Admin);
        assert!(repo.find_by_email("nobody@shop.test").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_staff_excludes_admins_and_sorts() {
        let repo = UserRepository::new(MemoryExecutor::with_users(vec![
            user(1, "zed@shop.test", "staff"),
            user(2, "boss@shop.test", "admin"),
            user(3, "amy@shop.test", "staff"),
        ]));

        let emails: Vec<String> = repo
            .list_staff()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(emails, vec!["amy@shop.test", "zed@shop.test"]);
    }

    #[tokio::test]
    async fn test_update_role_and_password() {
        let executor = MemoryExecutor::with_users(vec![user(4, "amy@shop.test", "staff")]);
        let repo = UserRepository::new(executor.clone());

        let update = UserUpdate {
            password: Some("new-secret".to_string()),
            role: Some(Role::Admin),
            ..UserUpdate::new(4)
        };
        let updated = repo.update(&update, Some("$argon2id$new")).await.unwrap();

        assert_eq!(updated.role(), Role::Admin);
        assert_eq!(updated.email, "amy@shop.test");
        assert_eq!(updated.password_hash, "$argon2id$new");
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let executor = MemoryExecutor::new();
        let repo = UserRepository::new(executor.clone());

        let update = UserUpdate {
            role: Some(Role::Admin),
            ..UserUpdate::new(42)
        };
        let err = repo.update(&update, None).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(executor
            .statements()
            .iter()
            .all(|s| !s.sql().starts_with("UPDATE")));
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let executor = MemoryExecutor::with_users(vec![user(1, "amy@shop.test", "staff")]);
        let repo = UserRepository::new(executor.clone());

        let err = repo.delete(99).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "User not found: 99");
        assert_eq!(executor.users().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_user() {
        let executor = MemoryExecutor::with_users(vec![user(1, "amy@shop.test", "staff")]);
        let repo = UserRepository::new(executor.clone());

        repo.delete(1).await.unwrap();
        assert!(executor.users().is_empty());
    }
}
