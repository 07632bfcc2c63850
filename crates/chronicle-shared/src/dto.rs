//! Data Transfer Objects - request/response types for the API.

use chronicle_core::domain::Role;
use serde::{Deserialize, Serialize};

/// Body of `POST /posts`. The author is the authenticated caller, never a
/// client-supplied field. Absent fields deserialize to empty strings and
/// are rejected by the store's validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: String,
}

/// Body of `PUT /posts/{id}`. Category falls back to the empty string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: String,
}

/// Body of `POST /posts/{id}/comments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub comment: String,
}

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Response containing an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
}
