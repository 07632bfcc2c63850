//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use chronicle_core::domain::{Comment, Post};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub author: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub category: String,
    pub comments: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for Post {
    fn from(model: Model) -> Self {
        // A malformed comments payload degrades to an empty list instead of
        // failing the whole read.
        let comments: Vec<Comment> = serde_json::from_value(model.comments).unwrap_or_default();
        Self {
            id: model.id,
            title: model.title,
            author: model.author,
            content: model.content,
            category: model.category,
            comments,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            title: Set(post.title),
            author: Set(post.author),
            content: Set(post.content),
            category: Set(post.category),
            comments: Set(comments_json(&post.comments)),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}

pub(crate) fn comments_json(comments: &[Comment]) -> Json {
    serde_json::to_value(comments).unwrap_or_else(|_| Json::Array(Vec::new()))
}
