use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Post;

/// Access level of an account. Admins bypass ownership checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Lenient parse used when reading back persisted rows; anything
    /// unrecognized demotes to an ordinary user.
    pub fn parse(s: &str) -> Self {
        match s {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// User entity - an account that can authenticate and own posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create an ordinary, unblocked user with fresh timestamps.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            username,
            email,
            password_hash,
            role: Role::User,
            blocked: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owner-or-admin rule: admins may touch any post, everyone else only
    /// their own.
    pub fn may_modify(&self, post: &Post) -> bool {
        self.is_admin() || self.username == post.author
    }
}
