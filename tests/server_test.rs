//! Router tests: the webhook is always acknowledged with 201 and processed
//! in the background.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{ header, Request, StatusCode };
use sms_relay::commands::CommandRegistry;
use sms_relay::config::AllowList;
use sms_relay::history::Conversation;
use sms_relay::server::api::{ parse_form, parse_json, router };
use sms_relay::webhook::{ Dispatcher, RelaySettings };
use tokio::sync::Mutex;
use tower::ServiceExt;

use mock_clients::{ MockChatClient, RecordingSms };

fn app(sms: Arc<RecordingSms>) -> axum::Router {
    let dispatcher = Dispatcher::new(
        Arc::new(Mutex::new(Conversation::new())),
        Arc::new(CommandRegistry::standard()),
        Arc::new(MockChatClient::replying("pong", "2024-01-01T00:00:00Z")),
        sms,
        RelaySettings {
            allow_list: AllowList::parse("+15551234567"),
            ..Default::default()
        }
    );
    router(Arc::new(dispatcher))
}

fn webhook(uri: &str, body: &'static str) -> Request<Body> {
    request(uri, "application/x-www-form-urlencoded", body)
}

fn request(uri: &str, content_type: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap()
}

async fn wait_for_sms(sms: &RecordingSms, count: usize) -> Vec<(String, String)> {
    for _ in 0..100 {
        let sent = sms.sent();
        if sent.len() >= count {
            return sent;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    sms.sent()
}

#[tokio::test]
async fn valid_webhook_is_acknowledged_and_relayed() {
    let sms = Arc::new(RecordingSms::default());
    let response = app(sms.clone())
        .oneshot(webhook("/", "From=%2B15551234567&Body=ping"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let sent = wait_for_sms(&sms, 1).await;
    assert_eq!(sent, vec![("+15551234567".to_string(), "pong".to_string())]);
}

#[tokio::test]
async fn webhook_alias_route_is_served() {
    let sms = Arc::new(RecordingSms::default());
    let response = app(sms.clone())
        .oneshot(webhook("/webhook", "From=%2B15551234567&Body=2"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(wait_for_sms(&sms, 1).await[0].1, "Chat cleared.");
}

#[tokio::test]
async fn invalid_webhook_is_still_acknowledged() {
    let sms = Arc::new(RecordingSms::default());

    for body in ["", "Body=hello", "From=%2B19999999999&Body=hello"] {
        let response = app(sms.clone()).oneshot(webhook("/", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(sms.sent().is_empty());
}

#[tokio::test]
async fn sinch_json_webhook_is_relayed() {
    let sms = Arc::new(RecordingSms::default());
    let body = r#"{"id":"01F","type":"mo_text","from":"+15551234567","to":"12345","body":"ping","received_at":"2024-01-01T00:00:00Z"}"#;
    let response = app(sms.clone())
        .oneshot(request("/", "application/json; charset=utf-8", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let sent = wait_for_sms(&sms, 1).await;
    assert_eq!(sent, vec![("+15551234567".to_string(), "pong".to_string())]);
}

#[tokio::test]
async fn unparseable_json_webhook_is_acknowledged_and_dropped() {
    let sms = Arc::new(RecordingSms::default());
    let response = app(sms.clone())
        .oneshot(request("/", "application/json", "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(sms.sent().is_empty());
}

#[test]
fn json_parsing_maps_lowercase_keys() {
    let form = parse_json(br#"{"from":"+15551234567","body":"hello"}"#);
    assert_eq!(form["From"], "+15551234567");
    assert_eq!(form["Body"], "hello");
    assert!(parse_json(br#"{"from":"+15551234567"}"#).get("Body").is_none());
}

#[test]
fn form_parsing_keeps_first_value() {
    let form = parse_form(b"From=%2B15551234567&Body=hello+world&Body=second");
    assert_eq!(form["From"], "+15551234567");
    assert_eq!(form["Body"], "hello world");
}
