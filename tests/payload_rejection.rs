use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use foodgram_api::{
    config::AppConfig, middleware::auth::issue_token, routes::create_api_router, state::AppState,
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "test-secret";

// The pool never connects: every request here is rejected before a query runs.
fn app() -> anyhow::Result<Router> {
    let database_url = "postgres://foodgram@localhost/unused";
    let pool = PgPoolOptions::new().connect_lazy(database_url)?;
    let config = AppConfig {
        database_url: database_url.into(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: SECRET.into(),
        page_size: 6,
        body_limit_bytes: 5 * 1024 * 1024,
        max_connections: 1,
    };
    Ok(create_api_router().with_state(AppState::new(pool, config)))
}

async fn send(request: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let response = app()?.oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

fn post_recipe(body: &str) -> anyhow::Result<Request<Body>> {
    let token = issue_token(Uuid::new_v4(), "user", SECRET)?;
    Ok(Request::builder()
        .method("POST")
        .uri("/recipes")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))?)
}

#[tokio::test]
async fn recipe_without_tags_and_ingredients_is_bad_request() -> anyhow::Result<()> {
    let (status, body) =
        send(post_recipe(r#"{"name":"x","text":"y","cooking_time":10,"image":"i"}"#)?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert!(body["message"].is_string());
    Ok(())
}

#[tokio::test]
async fn ill_typed_cooking_time_is_bad_request() -> anyhow::Result<()> {
    let (status, _) = send(post_recipe(
        r#"{"name":"x","text":"y","cooking_time":"ten","image":"i","tags":[],"ingredients":[]}"#,
    )?)
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn syntactically_broken_json_is_bad_request() -> anyhow::Result<()> {
    let (status, body) = send(post_recipe(r#"{"name":"#)?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn register_without_json_content_type_is_bad_request() -> anyhow::Result<()> {
    let request = Request::builder()
        .method("POST")
        .uri("/users")
        .body(Body::from(r#"{"email":"a@example.com"}"#))?;
    let (status, _) = send(request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn unparsable_query_string_is_bad_request() -> anyhow::Result<()> {
    let request = Request::builder()
        .uri("/recipes?page=abc")
        .body(Body::empty())?;
    let (status, body) = send(request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["error"].is_string());
    Ok(())
}
