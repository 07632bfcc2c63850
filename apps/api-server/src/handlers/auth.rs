//! Authentication handlers.

use std::sync::Arc;

use actix_web::{HttpResponse, web};

use chronicle_core::domain::User;
use chronicle_core::ports::{PasswordService, TokenService, UserStore};
use chronicle_shared::dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /auth/register
pub async fn register(
    state: web::Data<AppState>,
    tokens: web::Data<Arc<dyn TokenService>>,
    passwords: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Validate input
    if req.username.is_empty() {
        return Err(AppError::Validation(
            "missing required field: username".to_string(),
        ));
    }
    if req.email.is_empty() || !req.email.contains('@') {
        return Err(AppError::Validation("invalid email address".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }

    if state
        .users
        .find_by_username(&req.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("username already taken".to_string()));
    }

    let password_hash = passwords
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = state
        .users
        .save(User::new(req.username, req.email, password_hash))
        .await?;

    let token = tokens
        .generate_token(&user.username, user.role)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(username = %user.username, "user registered");
    Ok(HttpResponse::Created().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: tokens.expiration_seconds(),
    }))
}

/// POST /auth/login
pub async fn login(
    state: web::Data<AppState>,
    tokens: web::Data<Arc<dyn TokenService>>,
    passwords: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = passwords
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        return Err(AppError::Unauthorized);
    }

    let token = tokens
        .generate_token(&user.username, user.role)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: tokens.expiration_seconds(),
    }))
}

/// GET /auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_username(&identity.username)
        .await?
        .ok_or_else(|| AppError::Forbidden("unknown user".to_string()))?;

    Ok(HttpResponse::Ok().json(UserResponse {
        username: user.username,
        email: user.email,
        role: user.role,
        created_at: user.created_at.to_rfc3339(),
    }))
}
