//! Account handlers: register, login and staff management.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use stock_core::validation::parse_id;
use stock_core::{CoreError, Credentials, Role, User, UserUpdate, ValidationError};

use crate::auth::{AdminUser, AuthUser};
use crate::error::ApiError;
use crate::password::{hash_password, verify_password};
use crate::response::ApiResponse;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub user_id: i64,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub access_token: String,
    pub id: i64,
    pub email: String,
    pub role: String,
}

/// `PUT /api/staff/{id}` body. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStaffRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl UpdateStaffRequest {
    pub fn into_update(self, id: i64) -> Result<UserUpdate, ValidationError> {
        let role = self.role.as_deref().map(Role::parse).transpose()?;
        Ok(UserUpdate {
            id,
            email: self.email,
            password: self.password,
            role,
        })
    }
}

/// `POST /api/register`
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<RegisteredUser>), ApiError> {
    let Json(credentials) = body?;
    credentials.validate()?;
    let role = registration_role(&credentials)?;

    let password_hash = hash_password(&credentials.password)?;
    let user = state
        .db
        .users()
        .create(&credentials.normalized_email(), &password_hash, role)
        .await?;
    tracing::info!(id = user.id, role = %role, "User registered");

    Ok(ApiResponse::success(
        RegisteredUser {
            user_id: user.id,
            email: user.email,
            role: user.role,
        },
        "User created successfully",
    )
    .created())
}

/// `POST /api/login`
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<ApiResponse<LoginData>, ApiError> {
    let Json(credentials) = body?;
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(CoreError::InvalidCredentials.into());
    }

    let user = state
        .db
        .users()
        .find_by_email(&credentials.normalized_email())
        .await?;
    let user = check_credentials(user, &credentials.password)?;

    let access_token = state.jwt.generate_access_token(&user)?;
    tracing::info!(id = user.id, "Login successful");

    Ok(ApiResponse::success(
        LoginData {
            access_token,
            id: user.id,
            email: user.email,
            role: user.role,
        },
        "Login successful",
    ))
}

/// `GET /api/staff`
pub async fn list_staff(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<ApiResponse<Vec<User>>, ApiError> {
    let staff = state.db.users().list_staff().await?;
    tracing::debug!(count = staff.len(), "Listed staff");

    Ok(ApiResponse::success(staff, "Staff fetched successfully"))
}

/// `PUT /api/staff/{id}` (admin only)
pub async fn update_staff(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdateStaffRequest>, JsonRejection>,
) -> Result<ApiResponse<User>, ApiError> {
    let id = parse_id("staff_id", &raw_id)?;
    let Json(request) = body?;

    let update = request.into_update(id)?;
    update.validate()?;

    let password_hash = match update.password.as_deref() {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let user = state
        .db
        .users()
        .update(&update, password_hash.as_deref())
        .await?;
    tracing::info!(id = user.id, updated_by = admin.id, "Staff member updated");

    Ok(ApiResponse::success(user, "Staff member updated successfully"))
}

/// `DELETE /api/staff/{id}` (admin only)
pub async fn delete_staff(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(raw_id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let id = parse_id("staff_id", &raw_id)?;

    state.db.users().delete(id).await?;
    tracing::info!(id, deleted_by = admin.id, "Staff member deleted");

    Ok(ApiResponse::success((), "Staff member deleted successfully"))
}

/// Public registration only creates staff accounts.
fn registration_role(credentials: &Credentials) -> Result<Role, ApiError> {
    match credentials.requested_role()? {
        Role::Staff => Ok(Role::Staff),
        Role::Admin => {
            tracing::warn!("Refused self-registration as admin");
            Err(ApiError::forbidden("Admin accounts cannot be self-registered"))
        }
    }
}

/// Unknown email and wrong password produce the same error.
fn check_credentials(user: Option<User>, password: &str) -> Result<User, CoreError> {
    match user {
        Some(user) if verify_password(password, &user.password_hash) => Ok(user),
        _ => Err(CoreError::InvalidCredentials),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::offline_state;

    fn credentials(role: Option<&str>) -> Credentials {
        serde_json::from_value(serde_json::json!({
            "email": "mallory@shop.test",
            "password": "hunter22",
            "role": role,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_register_refuses_admin_role() {
        let err = register(State(offline_state()), Ok(Json(credentials(Some("admin")))))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message, "Admin accounts cannot be self-registered");
    }

    #[tokio::test]
    async fn test_register_rejects_unknown_role() {
        let err = register(State(offline_state()), Ok(Json(credentials(Some("owner")))))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_staff_goes_to_storage() {
        // Passes the role gate and only fails because the database is offline.
        let err = register(State(offline_state()), Ok(Json(credentials(None))))
            .await
            .unwrap_err();
        assert!(err.status.is_server_error(), "{}", err);

        let err = register(State(offline_state()), Ok(Json(credentials(Some("staff")))))
            .await
            .unwrap_err();
        assert!(err.status.is_server_error(), "{}", err);
    }

    #[test]
    fn test_registration_role() {
        assert_eq!(registration_role(&credentials(None)).unwrap(), Role::Staff);
        assert_eq!(
            registration_role(&credentials(Some("STAFF"))).unwrap(),
            Role::Staff
        );
        assert_eq!(
            registration_role(&credentials(Some("admin")))
                .unwrap_err()
                .status,
            StatusCode::FORBIDDEN
        );
    }

    fn stored(password: &str) -> User {
        User {
            id: 4,
            email: "amy@shop.test".to_string(),
            password_hash: hash_password(password).unwrap(),
            role: "staff".to_string(),
        }
    }

    #[test]
    fn test_check_credentials() {
        let user = check_credentials(Some(stored("hunter22")), "hunter22").unwrap();
        assert_eq!(user.id, 4);

        assert!(matches!(
            check_credentials(Some(stored("hunter22")), "hunter23"),
            Err(CoreError::InvalidCredentials)
        ));
        assert!(matches!(
            check_credentials(None, "hunter22"),
            Err(CoreError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_update_request_role_parsing() {
        let request: UpdateStaffRequest = serde_json::from_str(r#"{"role": "ADMIN"}"#).unwrap();
        let update = request.into_update(3).unwrap();
        assert_eq!(update.role, Some(Role::Admin));
        assert_eq!(update.present_fields(), 1);

        let request: UpdateStaffRequest = serde_json::from_str(r#"{"role": "owner"}"#).unwrap();
        assert!(request.into_update(3).is_err());
    }

    #[test]
    fn test_login_data_keys() {
        let body = serde_json::to_value(LoginData {
            access_token: "t".to_string(),
            id: 1,
            email: "a@b.test".to_string(),
            role: "admin".to_string(),
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({"accessToken": "t", "id": 1, "email": "a@b.test", "role": "admin"})
        );
    }

    #[test]
    fn test_user_serialization_hides_hash() {
        let body = serde_json::to_value(stored("hunter22")).unwrap();
        assert!(body.get("password_hash").is_none());
        assert_eq!(body["email"], "amy@shop.test");
    }
}
