//! # JWT Authentication
//!
//! Token issue/validation plus the axum pieces that guard `/api/*` routes.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Request ──► require_auth (middleware)                                  │
//! │                │                                                        │
//! │                ├── OPTIONS ─────────────────────────► next (no user)   │
//! │                ├── no / malformed Authorization ────► 401              │
//! │                ├── bad signature / expired ─────────► 401              │
//! │                └── valid ──► extensions.insert(AuthUser) ──► next      │
//! │                                                                         │
//! │  Handler args:                                                          │
//! │    AuthUser   ← read from extensions (401 if absent)                    │
//! │    AdminUser  ← AuthUser + role == admin (403 otherwise)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{FromRequestParts, Request, State};
use axum::http::{header, request::Parts, Method};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use stock_core::{CoreError, Role, User};
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Account email at issue time
    pub email: String,

    /// `staff` or `admin`
    pub role: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// JWT token manager.
pub struct JwtManager {
    secret: String,
    access_lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: impl Into<String>, access_lifetime_secs: i64) -> Self {
        JwtManager {
            secret: secret.into(),
            access_lifetime_secs,
        }
    }

    /// Generate an access token for `user`.
    pub fn generate_access_token(&self, user: &User) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_lifetime_secs);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role().as_str().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            tracing::error!("Failed to generate token: {}", e);
            ApiError::internal("Failed to generate token")
        })
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            tracing::debug!("Rejected token: {}", e);
            ApiError::unauthorized("Invalid or expired token")
        })?;

        Ok(token_data.claims)
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// =============================================================================
// Authenticated caller
// =============================================================================

/// The caller behind a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl TryFrom<Claims> for AuthUser {
    type Error = ApiError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;
        let role = Role::parse(&claims.role)
            .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

        Ok(AuthUser {
            id,
            email: claims.email,
            role,
        })
    }
}

/// Resolves the caller for one request.
///
/// `Ok(None)` only for `OPTIONS`, which passes through unauthenticated.
pub fn authenticate(
    jwt: &JwtManager,
    method: &Method,
    auth_header: Option<&str>,
) -> Result<Option<AuthUser>, ApiError> {
    if *method == Method::OPTIONS {
        return Ok(None);
    }

    let header =
        auth_header.ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;
    let token = extract_bearer_token(header)
        .ok_or_else(|| ApiError::unauthorized("Invalid authorization header"))?;

    let claims = jwt.validate_token(token)?;
    AuthUser::try_from(claims).map(Some)
}

/// Middleware guarding every protected route.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if let Some(user) = authenticate(&state.jwt, request.method(), auth_header)? {
        tracing::trace!(user_id = user.id, "Authenticated request");
        request.extensions_mut().insert(user);
    }

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

/// An authenticated caller with the `admin` role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(CoreError::PermissionDenied {
                required: Role::Admin.to_string(),
            }
            .into());
        }
        Ok(AdminUser(user))
    }
}
