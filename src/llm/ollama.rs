use reqwest::Client as HttpClient;
use reqwest::StatusCode;
use serde::{ Deserialize, Serialize };
use async_trait::async_trait;
use std::time::Duration;
use log::debug;
use super::{ ChatClient, ChatReply, ChatRequestMessage };
use crate::error::RelayError;

#[derive(Debug)]
pub struct OllamaClient {
    http: HttpClient,
    base_url: String,
    completion_model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    stream: bool,
    messages: Vec<ChatRequestMessage>,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
    created_at: String,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, completion_model: &str, timeout: Duration) -> Result<Self, RelayError> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            completion_model: completion_model.to_string(),
        })
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    async fn chat(&self, messages: Vec<ChatRequestMessage>) -> Result<ChatReply, RelayError> {
        let url = format!("{}/api/chat", self.base_url);
        let req = ChatRequest {
            model: &self.completion_model,
            stream: false,
            messages,
        };
        debug!("POST {} with {} messages", url, req.messages.len());

        let resp = self.http.post(&url).json(&req).send().await?;
        if resp.status() != StatusCode::OK {
            return Err(RelayError::UpstreamFailure(
                format!("received non-200 response: {}", resp.status())
            ));
        }

        let body = resp.bytes().await?;
        let data: ChatResponse = serde_json::from_slice(&body)
            .map_err(|e| RelayError::MalformedResponse(e.to_string()))?;

        Ok(ChatReply {
            content: data.message.content,
            created_at: data.created_at,
        })
    }

    fn get_model(&self) -> String {
        self.completion_model.clone()
    }
}
