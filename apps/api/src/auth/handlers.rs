//! Axum route handlers for signup and login.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::users::{create_user, find_by_email, normalize_email};
use crate::errors::AppError;
use crate::models::user::PublicUser;
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub success: bool,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: PublicUser,
}

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<SignupResponse>, AppError> {
    let Json(request) = body?;
    let email = normalize_email(&request.email);
    validate_credentials(&email, &request.password)?;

    let password_hash = hash_password(request.password).await?;
    let user = create_user(&state.db, &email, &password_hash).await?;

    Ok(Json(SignupResponse {
        success: true,
        user: PublicUser::from(&user),
    }))
}

/// POST /api/v1/auth/login
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn handle_login(
    State(state): State<AppState>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(request) = body?;
    let email = normalize_email(&request.email);

    let Some(user) = find_by_email(&state.db, &email).await? else {
        warn!("Login attempt for unknown email");
        return Err(AppError::Unauthorized);
    };

    if !verify_password(request.password, user.password_hash.clone()).await? {
        warn!("Login attempt with wrong password for user {}", user.id);
        return Err(AppError::Unauthorized);
    }

    let token = state
        .jwt
        .issue(user.id, &user.email)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign token: {e}")))?;

    info!("User {} logged in", user.id);

    Ok(Json(LoginResponse {
        success: true,
        token,
        user: PublicUser::from(&user),
    }))
}

fn validate_credentials(email: &str, password: &str) -> Result<(), AppError> {
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
