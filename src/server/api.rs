use crate::webhook::{ DispatchOutcome, Dispatcher };
use crate::error::RelayError;
use std::collections::HashMap;
use std::sync::Arc;
use axum::{
    body::Bytes,
    routing::post,
    Router,
    extract::State,
    response::IntoResponse,
    http::{ header, HeaderMap, StatusCode },
};
use serde::Deserialize;
use url::form_urlencoded;
use log::{ debug, info, warn, error };

#[derive(Clone)]
struct AppState {
    dispatcher: Arc<Dispatcher>,
}

/// Inbound message as delivered by Sinch. Extra fields are ignored.
#[derive(Deserialize)]
struct SinchInbound {
    from: Option<String>,
    body: Option<String>,
}

pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route("/", post(webhook_handler))
        .route("/webhook", post(webhook_handler))
        .with_state(AppState { dispatcher })
}

/// Repeated keys keep their first value.
pub fn parse_form(body: &[u8]) -> HashMap<String, String> {
    let mut data = HashMap::new();
    for (key, value) in form_urlencoded::parse(body).into_owned() {
        data.entry(key).or_insert(value);
    }
    data
}

/// Maps a Sinch JSON delivery onto the `From`/`Body` fields the dispatcher
/// reads. An undecodable body yields an empty map.
pub fn parse_json(body: &[u8]) -> HashMap<String, String> {
    let mut data = HashMap::new();
    match serde_json::from_slice::<SinchInbound>(body) {
        Ok(inbound) => {
            if let Some(from) = inbound.from {
                data.insert("From".to_string(), from);
            }
            if let Some(body) = inbound.body {
                data.insert("Body".to_string(), body);
            }
        }
        Err(e) => warn!("Unable to parse JSON webhook body: {}", e),
    }
    data
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_ascii_lowercase().starts_with("application/json"))
        .unwrap_or(false)
}

/// Acknowledges with 201 straight away; the delivery is processed in the
/// background and its outcome only shows up in the logs.
async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes
) -> impl IntoResponse {
    info!("Received webhook request");
    let form = if is_json(&headers) { parse_json(&body) } else { parse_form(&body) };
    debug!("Webhook fields: {:?}", form.keys().collect::<Vec<_>>());

    let dispatcher = Arc::clone(&state.dispatcher);
    tokio::spawn(async move {
        match dispatcher.dispatch(&form).await {
            Ok(DispatchOutcome::Command(trigger)) => info!("Command '{}' completed", trigger),
            Ok(DispatchOutcome::Message) => info!("Reply relayed"),
            Err(RelayError::ValidationFailed(reason)) => warn!("Dropped webhook: {}", reason),
            Err(e) => error!("Webhook processing failed: {}", e),
        }
    });

    (StatusCode::CREATED, "Resource created")
}
