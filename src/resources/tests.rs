use super::*;
use crate::app::{Bot, ConnectionPool, Listener};
use crate::config::SiteConfig;
use crate::error::ResourceError;
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;

async fn users_me(headers: HeaderMap) -> Response {
    match headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()) {
        Some("Bot good-token") => Json(serde_json::json!({
            "id": "42",
            "username": "sitebot",
        }))
        .into_response(),
        Some("Bot flaky-token") => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

/// Stand-in for the bot platform API on a random local port
async fn spawn_stub_api() -> String {
    let app = Router::new().route("/users/@me", get(users_me));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn create_test_context() -> AppContext {
    AppContext::new(
        Arc::new(SiteConfig::default()),
        Arc::new(DiscordBot::new("http://127.0.0.1:9").unwrap()),
        Arc::new(DatabaseConnection::new()),
        Arc::new(RedisConnection::new()),
        true,
    )
}

#[tokio::test]
async fn test_bot_login_and_close() {
    let api_base = spawn_stub_api().await;
    let bot = DiscordBot::new(api_base).unwrap();

    assert!(!bot.is_logged_in());
    bot.login("good-token").await.unwrap();

    let user = bot.user().unwrap();
    assert_eq!(user.id, "42");
    assert_eq!(user.username, "sitebot");

    bot.close().await.unwrap();
    assert!(!bot.is_logged_in());

    // Closing an already closed session is harmless
    bot.close().await.unwrap();
}

#[tokio::test]
async fn test_bot_rejects_bad_token() {
    let api_base = spawn_stub_api().await;
    let bot = DiscordBot::new(format!("{}/", api_base)).unwrap();

    match bot.login("wrong-token").await {
        Err(ResourceError::Bot { message }) => assert!(message.contains("Improper token")),
        other => panic!("Expected bot error, got {:?}", other),
    }
    assert!(!bot.is_logged_in());

    match bot.login("flaky-token").await {
        Err(ResourceError::Bot { message }) => assert!(message.contains("503")),
        other => panic!("Expected bot error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_server_serves_health_and_stops() {
    let server = HttpServer::new(create_test_context());

    server.start("127.0.0.1", 0).await.unwrap();
    let addr = server.local_addr().await.unwrap();

    let response = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let health: HealthResponse = response.json().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    assert!(health.debug);
    assert!(!health.bot);
    assert!(!health.database);
    assert!(!health.cache);

    server.stop().await.unwrap();
    assert!(server.local_addr().await.is_none());
    assert!(reqwest::get(format!("http://{}/health", addr)).await.is_err());

    // Stopping twice is a no-op
    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_http_server_rejects_second_start() {
    let server = HttpServer::new(create_test_context());
    server.start("127.0.0.1", 0).await.unwrap();

    assert!(matches!(
        server.start("127.0.0.1", 0).await,
        Err(ResourceError::Listener { .. })
    ));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_http_server_bind_failure_surfaces_at_start() {
    let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = occupied.local_addr().unwrap().port();

    let server = HttpServer::new(create_test_context());
    assert!(matches!(
        server.start("127.0.0.1", port).await,
        Err(ResourceError::Io(_))
    ));
    assert!(server.local_addr().await.is_none());
}

#[tokio::test]
async fn test_pools_close_before_create() {
    let database = DatabaseConnection::new();
    assert!(database.pool().is_none());
    assert!(!database.is_connected());
    database.close().await;

    let cache = RedisConnection::new();
    assert!(cache.connection().is_none());
    assert!(!cache.is_connected());
    cache.close().await;
}
