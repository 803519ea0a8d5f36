/// GraphQL API Integration Tests
///
/// Drives the full router (auth header handling, rate limiting, schema) with
/// in-memory storage.
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use blog_api::{AppState, config::AppConfig, routes};
use serde_json::{Value, json};
use std::num::NonZeroU32;
use tower::ServiceExt;

fn test_config() -> AppConfig {
    AppConfig {
        bcrypt_cost: 4,
        asset_base_url: "http://cdn.test/images".to_string(),
        ..AppConfig::new("integration-secret")
    }
}

fn app() -> Router {
    routes::router(AppState::in_memory(test_config()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn graphql(app: &Router, token: Option<&str>, query: &str, variables: Value) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = json!({ "query": query, "variables": variables }).to_string();
    send(app, request.body(Body::from(body)).unwrap()).await
}

async fn register(app: &Router, username: &str) -> (i64, String) {
    let (status, body) = graphql(
        app,
        None,
        "mutation Register($options: RegisterInput!) { register(options: $options) { errors { field message } user { id } token } }",
        json!({ "options": {
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "password1"
        }}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["register"]["errors"], Value::Null, "{}", body);

    let id = body["data"]["register"]["user"]["id"].as_i64().unwrap();
    let token = body["data"]["register"]["token"].as_str().unwrap().to_string();
    (id, token)
}

async fn create_post(app: &Router, token: &str, title: &str) -> Value {
    let (_, body) = graphql(
        app,
        Some(token),
        "mutation Create($input: PostInput!) { createPost(input: $input) { errors { field } post { id } } }",
        json!({ "input": { "title": title, "description": "desc", "body": format!("{} body", title) } }),
    )
    .await;
    body["data"]["createPost"]["post"].clone()
}

const FEED: &str = "query Feed($limit: Int!, $cursor: String) {
    feed(limit: $limit, cursor: $cursor) {
        hasMore
        posts { id title body createdAt author { username email avatarUrl } }
    }
}";

#[tokio::test]
async fn test_health() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "up");
}

#[tokio::test]
async fn test_graphiql_page() {
    let request = Request::builder().uri("/graphql").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_feed_pages_and_visibility() {
    let app = app();
    let (_, alice_token) = register(&app, "alice1").await;
    let (_, bob_token) = register(&app, "bobby1").await;

    for title in ["a1", "a2", "a3"] {
        create_post(&app, &alice_token, title).await;
    }
    create_post(&app, &bob_token, "b1").await;

    // Anonymous: bodies and emails are blanked
    let (status, body) = graphql(&app, None, FEED, json!({ "limit": 3 })).await;
    assert_eq!(status, StatusCode::OK);
    let feed = &body["data"]["feed"];
    assert_eq!(feed["hasMore"], true);
    let titles: Vec<&str> = feed["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|post| post["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["b1", "a3", "a2"]);
    for post in feed["posts"].as_array().unwrap() {
        assert_eq!(post["body"], "");
        assert_eq!(post["author"]["email"], "");
        assert_eq!(post["author"]["avatarUrl"], "");
    }

    // Second page continues from the last createdAt
    let cursor = feed["posts"][2]["createdAt"].as_str().unwrap().to_string();
    let (_, body) = graphql(&app, None, FEED, json!({ "limit": 3, "cursor": cursor })).await;
    let feed = &body["data"]["feed"];
    assert_eq!(feed["hasMore"], false);
    assert_eq!(feed["posts"].as_array().unwrap().len(), 1);
    assert_eq!(feed["posts"][0]["title"], "a1");

    // Signed in as bob: bodies visible, only bob's own email visible
    let (_, body) = graphql(&app, Some(&bob_token), FEED, json!({ "limit": 20 })).await;
    let posts = body["data"]["feed"]["posts"].as_array().unwrap().clone();
    assert_eq!(posts.len(), 4);
    for post in &posts {
        assert_eq!(post["body"], format!("{} body", post["title"].as_str().unwrap()));
        let expected_email = if post["author"]["username"] == "bobby1" {
            "bobby1@example.com"
        } else {
            ""
        };
        assert_eq!(post["author"]["email"], expected_email);
    }
}

#[tokio::test]
async fn test_malformed_cursor_is_a_request_error() {
    let (status, body) = graphql(&app(), None, FEED, json!({ "limit": 5, "cursor": "page-two" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], Value::Null);
    assert_eq!(body["errors"][0]["extensions"]["code"], "INVALID_CURSOR");
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let (status, body) = graphql(&app(), Some("not-a-jwt"), FEED, json!({ "limit": 5 })).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_token_from_before_restart_is_rejected() {
    // Same signing secret, fresh storage: user ids start over
    let before = app();
    let (old_id, old_token) = register(&before, "mallory").await;

    let after = app();
    let (new_id, _) = register(&after, "alice1").await;
    assert_eq!(old_id, new_id);

    let (status, body) = graphql(&after, Some(&old_token), "{ me { username email } }", json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = graphql(
        &after,
        Some(&old_token),
        "mutation Create($input: PostInput!) { createPost(input: $input) { post { id } } }",
        json!({ "input": { "title": "t", "description": "d", "body": "b" } }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = graphql(&after, None, FEED, json!({ "limit": 5 })).await;
    assert_eq!(body["data"]["feed"]["posts"], json!([]));
}

#[tokio::test]
async fn test_token_for_unknown_user_is_rejected() {
    let before = app();
    let (_, token) = register(&before, "ghost1").await;

    let (status, body) = graphql(&app(), Some(&token), "{ me { id } }", json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_post_lifecycle() {
    let app = app();
    let (alice_id, token) = register(&app, "alice1").await;

    let created = create_post(&app, &token, "draft").await;
    let id = created["id"].as_i64().unwrap();

    let (_, body) = graphql(
        &app,
        Some(&token),
        "mutation Rename($id: Int!) { updatePost(id: $id, title: \"final\") { title author { id } } }",
        json!({ "id": id }),
    )
    .await;
    assert_eq!(body["data"]["updatePost"]["title"], "final");
    assert_eq!(body["data"]["updatePost"]["author"]["id"], alice_id);

    let (_, body) = graphql(&app, None, "query One($id: Int!) { post(id: $id) { title body } }", json!({ "id": id })).await;
    assert_eq!(body["data"]["post"], json!({ "title": "final", "body": "" }));

    let (_, body) = graphql(&app, Some(&token), "mutation Drop($id: Int!) { deletePost(id: $id) }", json!({ "id": id })).await;
    assert_eq!(body["data"]["deletePost"], true);

    let (_, body) = graphql(&app, None, "query One($id: Int!) { post(id: $id) { title } }", json!({ "id": id })).await;
    assert_eq!(body["data"]["post"], Value::Null);
}

#[tokio::test]
async fn test_rate_limit() {
    let config = AppConfig {
        rate_limit_per_second: NonZeroU32::new(2).unwrap(),
        ..test_config()
    };
    let app = routes::router(AppState::in_memory(config));

    let health = || Request::builder().uri("/health").body(Body::empty()).unwrap();
    assert_eq!(send(&app, health()).await.0, StatusCode::OK);
    assert_eq!(send(&app, health()).await.0, StatusCode::OK);

    let (status, body) = send(&app, health()).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "RATE_LIMITED");
}
