use chronicle_core::domain::Post;
use chronicle_core::error::StoreError;
use chronicle_core::ports::PostStore;
use sea_orm::{DatabaseBackend, MockDatabase};

use crate::store::entity::post;
use crate::store::postgres::PostgresPostStore;

fn sample_row(id: i64) -> post::Model {
    let now = chrono::Utc::now();
    post::Model {
        id,
        title: "Test Post".to_owned(),
        author: "tester".to_owned(),
        content: "Content".to_owned(),
        category: String::new(),
        comments: serde_json::json!([]),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn get_maps_row_to_domain_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![sample_row(7)]])
        .into_connection();

    let store = PostgresPostStore::new(db);
    let found: Post = store.get(7).await.unwrap();

    assert_eq!(found.id, 7);
    assert_eq!(found.title, "Test Post");
    assert!(found.comments.is_empty());
}

#[tokio::test]
async fn get_unknown_id_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let store = PostgresPostStore::new(db);

    assert!(matches!(
        store.get(3).await,
        Err(StoreError::NotFound(3))
    ));
}

#[tokio::test]
async fn list_maps_all_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![sample_row(1), sample_row(2)]])
        .into_connection();

    let store = PostgresPostStore::new(db);
    let posts = store.list(None).await.unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, 1);
    assert_eq!(posts[1].id, 2);
}
