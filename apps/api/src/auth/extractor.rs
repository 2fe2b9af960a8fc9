use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::debug;
use uuid::Uuid;

use crate::auth::jwt::JwtService;
use crate::errors::AppError;

/// Verified caller identity, taken from an `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    JwtService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jwt = JwtService::from_ref(state);
        authenticate(&parts.headers, &jwt)
    }
}

fn authenticate(headers: &HeaderMap, jwt: &JwtService) -> Result<AuthUser, AppError> {
    let Some(token) = bearer_token(headers) else {
        debug!("Missing or malformed Authorization header");
        return Err(AppError::Unauthorized);
    };

    let claims = jwt.verify(token).ok_or(AppError::Unauthorized)?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Validation("Invalid user".to_string()))?;

    Ok(AuthUser {
        user_id,
        email: claims.email,
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
