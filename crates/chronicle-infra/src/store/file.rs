//! File-backed stores.
//!
//! The on-disk layout is a single JSON document per collection, mapping the
//! string form of the key to the record, rewritten wholesale after every
//! mutation. All writers are serialized through one async `RwLock` held
//! across the in-memory change and the file rewrite, so concurrent
//! mutations never interleave partial writes.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use chronicle_core::domain::{Comment, NewPost, Post, PostId, PostUpdate, User};
use chronicle_core::error::StoreError;
use chronicle_core::ports::{PostStore, UserStore};

/// Posts keyed by id, mirrored to a JSON file.
pub struct FilePostStore {
    path: PathBuf,
    posts: RwLock<BTreeMap<PostId, Post>>,
}

impl FilePostStore {
    /// Load the collection from `path`, starting empty when the file does
    /// not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let posts = load_document::<Post>(&path)?
            .into_iter()
            .map(|(key, post)| {
                key.parse::<PostId>().map(|id| (id, post)).map_err(|_| {
                    StoreError::Persistence(format!(
                        "non-numeric post id {:?} in {}",
                        key,
                        path.display()
                    ))
                })
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(Self {
            path,
            posts: RwLock::new(posts),
        })
    }

    /// Next id: one past the numeric maximum, 1 for an empty collection.
    /// Comparison is numeric; the ids on disk are strings only because JSON
    /// object keys are.
    fn next_id(posts: &BTreeMap<PostId, Post>) -> PostId {
        posts.keys().max().copied().unwrap_or(0) + 1
    }

    fn persist(&self, posts: &BTreeMap<PostId, Post>) -> Result<(), StoreError> {
        let document: BTreeMap<String, &Post> = posts
            .iter()
            .map(|(id, post)| (id.to_string(), post))
            .collect();
        write_document(&self.path, &document)
    }
}

#[async_trait]
impl PostStore for FilePostStore {
    async fn list(&self, category: Option<&str>) -> Result<Vec<Post>, StoreError> {
        let posts = self.posts.read().await;
        // BTreeMap iteration already yields ascending ids.
        Ok(posts
            .values()
            .filter(|post| category.is_none_or(|c| post.category == c))
            .cloned()
            .collect())
    }

    async fn get(&self, id: PostId) -> Result<Post, StoreError> {
        let posts = self.posts.read().await;
        posts.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, draft: NewPost) -> Result<Post, StoreError> {
        draft.validate()?;

        let mut posts = self.posts.write().await;
        // Mutate a copy: a failed rewrite must leave both the file and the
        // served collection at the pre-mutation state.
        let mut next = posts.clone();
        let id = Self::next_id(&next);
        let post = Post::new(id, draft);
        next.insert(id, post.clone());
        self.persist(&next)?;
        *posts = next;

        tracing::debug!(post_id = id, "post created");
        Ok(post)
    }

    async fn update(&self, id: PostId, changes: PostUpdate) -> Result<Post, StoreError> {
        let mut posts = self.posts.write().await;
        let mut next = posts.clone();
        let post = {
            let existing = next.get_mut(&id).ok_or(StoreError::NotFound(id))?;
            existing.apply(changes);
            existing.clone()
        };
        self.persist(&next)?;
        *posts = next;

        tracing::debug!(post_id = id, "post updated");
        Ok(post)
    }

    async fn delete(&self, id: PostId) -> Result<(), StoreError> {
        let mut posts = self.posts.write().await;
        if !posts.contains_key(&id) {
            return Ok(());
        }
        let mut next = posts.clone();
        next.remove(&id);
        self.persist(&next)?;
        *posts = next;

        tracing::debug!(post_id = id, "post deleted");
        Ok(())
    }

    async fn add_comment(&self, id: PostId, comment: Comment) -> Result<Post, StoreError> {
        let mut posts = self.posts.write().await;
        let mut next = posts.clone();
        let post = {
            let existing = next.get_mut(&id).ok_or(StoreError::NotFound(id))?;
            existing.comments.push(comment);
            existing.clone()
        };
        self.persist(&next)?;
        *posts = next;

        Ok(post)
    }
}

/// Accounts keyed by username, mirrored to a JSON file.
pub struct FileUserStore {
    path: PathBuf,
    users: RwLock<BTreeMap<String, User>>,
}

impl FileUserStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let users = load_document::<User>(&path)?;

        Ok(Self {
            path,
            users: RwLock::new(users),
        })
    }
}

#[async_trait]
impl UserStore for FileUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(username).cloned())
    }

    async fn save(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        let mut next = users.clone();
        next.insert(user.username.clone(), user.clone());
        write_document(&self.path, &next)?;
        *users = next;

        tracing::debug!(username = %user.username, "user saved");
        Ok(user)
    }
}

fn load_document<T: DeserializeOwned>(path: &Path) -> Result<BTreeMap<String, T>, StoreError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| StoreError::Persistence(format!("read {}: {e}", path.display())))?;
    if raw.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(&raw)
        .map_err(|e| StoreError::Persistence(format!("parse {}: {e}", path.display())))
}

fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<(), StoreError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .map_err(|e| StoreError::Persistence(format!("create {}: {e}", dir.display())))?;
    }
    let raw = serde_json::to_string(document)
        .map_err(|e| StoreError::Persistence(format!("serialize {}: {e}", path.display())))?;
    fs::write(path, raw)
        .map_err(|e| StoreError::Persistence(format!("write {}: {e}", path.display())))
}
