// src/tests/test_discord.rs
// DiscordNotifier against an in-process stand-in for the chat REST API

use crate::error::RelayError;
use crate::notify::discord::DiscordNotifier;
use crate::notify::{Notification, Notifier};
use crate::tests::fixtures::at;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const TOKEN: &str = "test-token";

#[derive(Default)]
struct FakeApi {
    posted: Mutex<Vec<(String, Value)>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bot {}", TOKEN))
        .unwrap_or(false)
}

async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "401: Unauthorized"})));
    }
    (StatusCode::OK, Json(json!({"id": "1", "username": "relay-bot"})))
}

async fn channel(headers: HeaderMap, Path(id): Path<String>) -> StatusCode {
    if !authorized(&headers) {
        StatusCode::UNAUTHORIZED
    } else if id == "100" {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn messages(
    State(api): State<Arc<FakeApi>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    if id != "100" {
        return StatusCode::NOT_FOUND;
    }
    api.posted.lock().unwrap().push((id, body));
    StatusCode::OK
}

async fn serve_fake_api() -> (String, Arc<FakeApi>) {
    let api = Arc::new(FakeApi::default());
    let router = Router::new()
        .route("/users/@me", get(me))
        .route("/channels/:id", get(channel))
        .route("/channels/:id/messages", post(messages))
        .with_state(api.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), api)
}

fn notifier(base: &str, token: &str) -> DiscordNotifier {
    DiscordNotifier::new(
        base,
        token,
        vec!["100".to_string(), "200".to_string()],
        Duration::from_secs(2),
    )
    .unwrap()
}

#[tokio::test]
async fn test_connect_resolves_known_channels() {
    let (base, _api) = serve_fake_api().await;
    let discord = notifier(&base, TOKEN);

    assert!(!discord.is_online().await);
    discord.connect().await.unwrap();

    assert!(discord.is_online().await);
    assert!(discord.resolves("100").await);
    assert!(!discord.resolves("200").await);
}

#[tokio::test]
async fn test_bad_token_stays_offline() {
    let (base, _api) = serve_fake_api().await;
    let discord = notifier(&base, "wrong");

    assert!(matches!(
        discord.connect().await,
        Err(RelayError::Notification(_))
    ));
    assert!(!discord.is_online().await);
    assert!(!discord.resolves("100").await);
}

#[tokio::test]
async fn test_send_posts_embed() {
    let (base, api) = serve_fake_api().await;
    let discord = notifier(&base, TOKEN);
    discord.connect().await.unwrap();

    let notification = Notification::ip_blocked("6.6.6.6", &at(0));
    discord.send(&notification, "100").await.unwrap();

    let posted = api.posted.lock().unwrap().clone();
    assert_eq!(posted.len(), 1);
    let embed = &posted[0].1["embeds"][0];
    assert_eq!(embed["title"], notification.title.as_str());
    assert_eq!(embed["color"], notification.color);
    assert_eq!(embed["footer"]["text"], notification.footer.as_str());
}

#[tokio::test]
async fn test_send_to_missing_channel_unresolves_it() {
    let (base, _api) = serve_fake_api().await;
    let discord = notifier(&base, TOKEN);
    discord.connect().await.unwrap();

    let notification = Notification::unmatched_end("1.1.1.1");
    let result = discord.send(&notification, "200").await;

    assert!(matches!(result, Err(RelayError::DestinationUnavailable(_))));
    assert!(!discord.resolves("200").await);
}
