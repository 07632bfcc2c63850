use async_trait::async_trait;

use crate::domain::{Comment, NewPost, Post, PostId, PostUpdate, User};
use crate::error::StoreError;

/// Durable CRUD on post records. The store owns the canonical collection;
/// callers never retain a copy across requests.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts in ascending id order, optionally restricted to an exact
    /// category match. An empty result is not an error.
    async fn list(&self, category: Option<&str>) -> Result<Vec<Post>, StoreError>;

    /// The post with that id, or `StoreError::NotFound`.
    async fn get(&self, id: PostId) -> Result<Post, StoreError>;

    /// Validate the draft, assign a fresh id, stamp both timestamps and
    /// persist. Nothing is stored when validation fails.
    async fn create(&self, draft: NewPost) -> Result<Post, StoreError>;

    /// Overwrite title/content/category and refresh the modification
    /// timestamp. The creation timestamp and author never change.
    async fn update(&self, id: PostId, changes: PostUpdate) -> Result<Post, StoreError>;

    /// Remove the record. Idempotent: deleting an absent id is Ok.
    async fn delete(&self, id: PostId) -> Result<(), StoreError>;

    /// Append a comment and return the updated post. Does not refresh the
    /// post's modification timestamp.
    async fn add_comment(&self, id: PostId, comment: Comment) -> Result<Post, StoreError>;
}

/// Account persistence, keyed by the unique username.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Insert or overwrite the record for `user.username`.
    async fn save(&self, user: User) -> Result<User, StoreError>;
}
