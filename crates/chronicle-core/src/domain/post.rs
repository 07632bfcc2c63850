use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Post identifiers are plain integers: the file-backed store hands them out
/// sequentially, PostgreSQL generates them.
pub type PostId = i64;

/// Post entity - a single blog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    /// Username of the creator; ownership checks compare against this.
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A reader comment attached to a post. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub body: String,
    pub posted_at: DateTime<Utc>,
}

/// Fields supplied when creating a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub author: String,
    pub content: String,
    pub category: String,
}

/// Fields overwritten by an update. The author and creation timestamp are
/// immutable and deliberately absent here.
#[derive(Debug, Clone)]
pub struct PostUpdate {
    pub title: String,
    pub content: String,
    pub category: String,
}

impl NewPost {
    /// Reject drafts with a required field absent. An empty string counts as
    /// absent - that is what a missing JSON field deserializes to.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.title.is_empty() {
            return Err(StoreError::MissingField("title"));
        }
        if self.author.is_empty() {
            return Err(StoreError::MissingField("author"));
        }
        if self.content.is_empty() {
            return Err(StoreError::MissingField("content"));
        }
        Ok(())
    }
}

impl Post {
    /// Materialize a validated draft under the given id. Both timestamps are
    /// stamped from the same instant.
    pub fn new(id: PostId, draft: NewPost) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: draft.title,
            author: draft.author,
            content: draft.content,
            category: draft.category,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the mutable fields and refresh the modification timestamp.
    pub fn apply(&mut self, changes: PostUpdate) {
        self.title = changes.title;
        self.content = changes.content;
        self.category = changes.category;
        self.updated_at = Utc::now();
    }
}

impl Comment {
    pub fn new(author: String, body: String) -> Self {
        Self {
            author,
            body,
            posted_at: Utc::now(),
        }
    }
}
