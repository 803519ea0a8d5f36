use crate::errors::ApiError;
use crate::store::UserStore;
use axum::http::{HeaderMap, header};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub username: String,
    pub exp: usize,
}

pub fn create_token(user_id: i32, username: &str, secret: &str) -> Result<String, ApiError> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| ApiError::InternalError("Failed to calculate expiration".into()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::InternalError(format!("Token Creation failed: {}", e)))
}

pub fn validate_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Unauthorized)
}

/// Reads the bearer token of a request.
///
/// No `Authorization` header means an anonymous viewer. A header that is
/// present but not a valid bearer token is rejected.
pub fn claims_from_headers(headers: &HeaderMap, secret: &str) -> Result<Option<Claims>, ApiError> {
    let Some(auth_header) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let auth_header = auth_header.to_str().map_err(|_| ApiError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    validate_token(token, secret).map(Some)
}

/// Resolves the viewer of a request against the user store.
///
/// A signed token only counts while its user still exists under the same
/// username; ids may be handed out again after the store is reset.
pub async fn resolve_viewer(
    headers: &HeaderMap,
    secret: &str,
    users: &dyn UserStore,
) -> Result<Option<i32>, ApiError> {
    let Some(claims) = claims_from_headers(headers, secret)? else {
        return Ok(None);
    };
    let user_id = claims.sub.parse().map_err(|_| ApiError::Unauthorized)?;

    match users.user_by_id(user_id).await? {
        Some(user) if user.username == claims.username => Ok(Some(user.id)),
        _ => {
            debug!("Rejected token for user {} ({})", user_id, claims.username);
            Err(ApiError::Unauthorized)
        }
    }
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, ApiError> {
    bcrypt::hash(password, cost)
        .map_err(|e| ApiError::InternalError(format!("Password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    bcrypt::verify(password, hash)
        .map_err(|e| ApiError::InternalError(format!("Password verification failed: {}", e)))
}
