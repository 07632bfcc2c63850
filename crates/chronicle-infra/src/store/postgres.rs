//! PostgreSQL store implementations.
//!
//! Per-row write guarantees of the database stand in for the file store's
//! whole-document rewrite.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, IntoActiveModel, NotSet, QueryFilter,
    QueryOrder, Set,
};

use chronicle_core::domain::{Comment, NewPost, Post, PostId, PostUpdate, User};
use chronicle_core::error::StoreError;
use chronicle_core::ports::{PostStore, UserStore};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};

fn query_err(e: sea_orm::DbErr) -> StoreError {
    StoreError::Persistence(e.to_string())
}

/// PostgreSQL post store. Ids come from the table's sequence.
pub struct PostgresPostStore {
    db: DbConn,
}

impl PostgresPostStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn list(&self, category: Option<&str>) -> Result<Vec<Post>, StoreError> {
        let mut query = PostEntity::find().order_by_asc(post::Column::Id);
        if let Some(category) = category {
            query = query.filter(post::Column::Category.eq(category));
        }

        let rows = query.all(&self.db).await.map_err(query_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: PostId) -> Result<Post, StoreError> {
        let row = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        row.map(Into::into).ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, draft: NewPost) -> Result<Post, StoreError> {
        draft.validate()?;

        let now = Utc::now();
        let row = post::ActiveModel {
            id: NotSet,
            title: Set(draft.title),
            author: Set(draft.author),
            content: Set(draft.content),
            category: Set(draft.category),
            comments: Set(post::comments_json(&[])),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await
        .map_err(query_err)?;

        tracing::debug!(post_id = row.id, "post created");
        Ok(row.into())
    }

    async fn update(&self, id: PostId, changes: PostUpdate) -> Result<Post, StoreError> {
        let row = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?
            .ok_or(StoreError::NotFound(id))?;

        let mut active = row.into_active_model();
        active.title = Set(changes.title);
        active.content = Set(changes.content);
        active.category = Set(changes.category);
        active.updated_at = Set(Utc::now().into());

        let row = active.update(&self.db).await.map_err(query_err)?;

        tracing::debug!(post_id = id, "post updated");
        Ok(row.into())
    }

    async fn delete(&self, id: PostId) -> Result<(), StoreError> {
        // rows_affected of zero is fine: delete is idempotent.
        PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        Ok(())
    }

    async fn add_comment(&self, id: PostId, comment: Comment) -> Result<Post, StoreError> {
        let row = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?
            .ok_or(StoreError::NotFound(id))?;

        let mut existing: Post = row.into();
        existing.comments.push(comment);

        // Only the comments column changes; updated_at stays put.
        let active = post::ActiveModel {
            id: Set(id),
            comments: Set(post::comments_json(&existing.comments)),
            ..Default::default()
        };
        let row = active.update(&self.db).await.map_err(query_err)?;

        Ok(row.into())
    }
}

/// PostgreSQL user store, keyed on the username.
pub struct PostgresUserStore {
    db: DbConn,
}

impl PostgresUserStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = UserEntity::find_by_id(username.to_string())
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(row.map(Into::into))
    }

    async fn save(&self, user: User) -> Result<User, StoreError> {
        let existing = UserEntity::find_by_id(user.username.clone())
            .one(&self.db)
            .await
            .map_err(query_err)?;

        let active: user::ActiveModel = user.into();
        let row = if existing.is_some() {
            active.update(&self.db).await.map_err(query_err)?
        } else {
            active.insert(&self.db).await.map_err(query_err)?
        };

        Ok(row.into())
    }
}
