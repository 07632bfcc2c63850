//! Post CRUD handlers - the mapping from store outcomes to status codes,
//! and nothing else.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use chronicle_core::domain::{Comment, NewPost, PostId, PostUpdate};
use chronicle_core::ports::PostStore;
use chronicle_shared::dto::{CommentRequest, CreatePostRequest, UpdatePostRequest};

use crate::middleware::access::{authorize_owner_or_admin, require_active};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    category: Option<String>,
}

/// GET /posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    // `?category=` means "no filter".
    let category = query.category.as_deref().filter(|c| !c.is_empty());
    let posts = state.posts.list(category).await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<PostId>) -> AppResult<HttpResponse> {
    let post = state.posts.get(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// POST /posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let user = require_active(&state, &identity).await?;
    let req = body.into_inner();

    // The author is always the authenticated caller.
    let post = state
        .posts
        .create(NewPost {
            title: req.title,
            author: user.username,
            content: req.content,
            category: req.category,
        })
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// PUT /posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<PostId>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let user = require_active(&state, &identity).await?;
    let id = path.into_inner();
    authorize_owner_or_admin(&state, &user, id).await?;

    let req = body.into_inner();
    let post = state
        .posts
        .update(
            id,
            PostUpdate {
                title: req.title,
                content: req.content,
                category: req.category,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /posts/{id}
pub async fn remove(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let user = require_active(&state, &identity).await?;
    let id = path.into_inner();
    authorize_owner_or_admin(&state, &user, id).await?;

    state.posts.delete(id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /posts/{id}/comments
pub async fn comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<PostId>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let user = require_active(&state, &identity).await?;
    let id = path.into_inner();
    let req = body.into_inner();

    let post = state
        .posts
        .add_comment(id, Comment::new(user.username, req.comment))
        .await?;

    Ok(HttpResponse::Created().json(post))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::dev::ServiceResponse;
    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::{Value, json};
    use tempfile::TempDir;

    use chronicle_core::domain::{Role, User};
    use chronicle_core::ports::{TokenService, UserStore};
    use chronicle_infra::{FilePostStore, FileUserStore, JwtConfig, JwtTokenService};

    use crate::handlers::configure_routes;
    use crate::state::AppState;

    fn token_service() -> Arc<dyn TokenService> {
        Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: "test".to_string(),
        }))
    }

    async fn seeded_state(dir: &TempDir) -> AppState {
        let posts = FilePostStore::open(dir.path().join("posts.json")).unwrap();
        let users = FileUserStore::open(dir.path().join("users.json")).unwrap();
        let state = AppState {
            posts: Arc::new(posts),
            users: Arc::new(users),
        };

        for (name, role, blocked) in [
            ("alice", Role::User, false),
            ("bob", Role::User, false),
            ("root", Role::Admin, false),
            ("mallory", Role::User, true),
        ] {
            let mut user = User::new(
                name.to_string(),
                format!("{name}@example.com"),
                "hash".to_string(),
            );
            user.role = role;
            user.blocked = blocked;
            state.users.save(user).await.unwrap();
        }

        state
    }

    fn test_app(
        state: AppState,
        tokens: Arc<dyn TokenService>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .app_data(web::Data::new(tokens))
            .configure(configure_routes)
    }

    fn bearer(tokens: &Arc<dyn TokenService>, username: &str, role: Role) -> (&'static str, String) {
        let token = tokens.generate_token(username, role).unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    async fn body_json(response: ServiceResponse) -> Value {
        let body = test::read_body(response).await;
        serde_json::from_slice(&body).expect("JSON body")
    }

    #[actix_web::test]
    async fn list_starts_empty() {
        let dir = TempDir::new().unwrap();
        let app = test::init_service(test_app(seeded_state(&dir).await, token_service())).await;

        let response = test::call_service(&app, test::TestRequest::get().uri("/posts").to_request())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[actix_web::test]
    async fn unauthenticated_mutation_is_forbidden() {
        let dir = TempDir::new().unwrap();
        let app = test::init_service(test_app(seeded_state(&dir).await, token_service())).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/posts")
                .set_json(json!({"title": "A", "content": "hi"}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert!(body.get("error").is_some());
    }

    #[actix_web::test]
    async fn create_then_get_round_trips() {
        let dir = TempDir::new().unwrap();
        let tokens = token_service();
        let app = test::init_service(test_app(seeded_state(&dir).await, tokens.clone())).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/posts")
                .insert_header(bearer(&tokens, "alice", Role::User))
                .set_json(json!({"title": "A", "content": "hi", "category": ""}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["id"], json!(1));
        assert_eq!(created["author"], json!("alice"));
        assert_eq!(created["created_at"], created["updated_at"]);

        let response =
            test::call_service(&app, test::TestRequest::get().uri("/posts/1").to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["title"], json!("A"));
    }

    #[actix_web::test]
    async fn create_missing_title_is_server_error() {
        let dir = TempDir::new().unwrap();
        let tokens = token_service();
        let app = test::init_service(test_app(seeded_state(&dir).await, tokens.clone())).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/posts")
                .insert_header(bearer(&tokens, "alice", Role::User))
                .set_json(json!({"content": "hi"}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("title"));
    }

    #[actix_web::test]
    async fn get_unknown_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let app = test::init_service(test_app(seeded_state(&dir).await, token_service())).await;

        let response =
            test::call_service(&app, test::TestRequest::get().uri("/posts/42").to_request()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"error": "post 42 not found"})
        );
    }

    #[actix_web::test]
    async fn only_owner_or_admin_may_update() {
        let dir = TempDir::new().unwrap();
        let tokens = token_service();
        let app = test::init_service(test_app(seeded_state(&dir).await, tokens.clone())).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/posts")
                .insert_header(bearer(&tokens, "alice", Role::User))
                .set_json(json!({"title": "A", "content": "hi"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let update = json!({"title": "B", "content": "bye", "category": ""});

        let response = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/posts/1")
                .insert_header(bearer(&tokens, "bob", Role::User))
                .set_json(&update)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // The admin role bypasses ownership unconditionally.
        let response = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/posts/1")
                .insert_header(bearer(&tokens, "root", Role::Admin))
                .set_json(&update)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["title"], json!("B"));
        assert_eq!(body["author"], json!("alice"));
    }

    #[actix_web::test]
    async fn update_unknown_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let tokens = token_service();
        let app = test::init_service(test_app(seeded_state(&dir).await, tokens.clone())).await;

        let response = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/posts/9")
                .insert_header(bearer(&tokens, "alice", Role::User))
                .set_json(json!({"title": "B", "content": "bye"}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn blocked_user_may_not_mutate() {
        let dir = TempDir::new().unwrap();
        let tokens = token_service();
        let app = test::init_service(test_app(seeded_state(&dir).await, tokens.clone())).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/posts")
                .insert_header(bearer(&tokens, "mallory", Role::User))
                .set_json(json!({"title": "A", "content": "hi"}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await,
            json!({"error": "user is blocked"})
        );
    }

    #[actix_web::test]
    async fn delete_returns_no_content_then_not_found() {
        let dir = TempDir::new().unwrap();
        let tokens = token_service();
        let app = test::init_service(test_app(seeded_state(&dir).await, tokens.clone())).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/posts")
                .insert_header(bearer(&tokens, "alice", Role::User))
                .set_json(json!({"title": "A", "content": "hi"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri("/posts/1")
                .insert_header(bearer(&tokens, "alice", Role::User))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(test::read_body(response).await.is_empty());

        // The post is gone, so the ownership lookup now answers 404.
        let response = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri("/posts/1")
                .insert_header(bearer(&tokens, "alice", Role::User))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn list_filters_on_category() {
        let dir = TempDir::new().unwrap();
        let tokens = token_service();
        let app = test::init_service(test_app(seeded_state(&dir).await, tokens.clone())).await;

        for (title, category) in [("A", "news"), ("B", "")] {
            let response = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/posts")
                    .insert_header(bearer(&tokens, "alice", Role::User))
                    .set_json(json!({"title": title, "content": "hi", "category": category}))
                    .to_request(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/posts?category=news")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let posts = body_json(response).await;
        assert_eq!(posts.as_array().unwrap().len(), 1);
        assert_eq!(posts[0]["title"], json!("A"));

        // An empty parameter is no filter at all.
        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/posts?category=").to_request(),
        )
        .await;
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn any_authenticated_user_may_comment() {
        let dir = TempDir::new().unwrap();
        let tokens = token_service();
        let app = test::init_service(test_app(seeded_state(&dir).await, tokens.clone())).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/posts")
                .insert_header(bearer(&tokens, "alice", Role::User))
                .set_json(json!({"title": "A", "content": "hi"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/posts/1/comments")
                .insert_header(bearer(&tokens, "bob", Role::User))
                .set_json(json!({"comment": "nice one"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["comments"][0]["author"], json!("bob"));
        assert_eq!(body["comments"][0]["body"], json!("nice one"));

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/posts/99/comments")
                .insert_header(bearer(&tokens, "bob", Role::User))
                .set_json(json!({"comment": "lost"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
