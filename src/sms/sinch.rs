use async_trait::async_trait;
use reqwest::Client as HttpClient;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use super::SmsSender;
use crate::error::RelayError;

#[derive(Debug)]
pub struct SinchClient {
    http: HttpClient,
    base_url: String,
    plan_id: String,
    api_key: String,
    sender_number: String,
}

#[derive(Serialize)]
struct BatchRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    body: &'a str,
}

impl SinchClient {
    pub fn new(
        base_url: &str,
        plan_id: &str,
        api_key: &str,
        sender_number: &str,
        timeout: Duration
    ) -> Result<Self, RelayError> {
        Ok(Self {
            http: HttpClient::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            plan_id: plan_id.to_string(),
            api_key: api_key.to_string(),
            sender_number: sender_number.to_string(),
        })
    }
}

#[async_trait]
impl SmsSender for SinchClient {
    async fn send(&self, to: &str, body: &str) -> Result<(), RelayError> {
        let url = format!("{}/{}/batches", self.base_url, self.plan_id);
        let req = BatchRequest { from: &self.sender_number, to: [to], body };

        let resp = self.http.post(&url).bearer_auth(&self.api_key).json(&req).send().await?;
        if resp.status() != StatusCode::CREATED {
            return Err(RelayError::UpstreamFailure(
                format!("sinch returned {}", resp.status())
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn posts_batch_with_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/plan-1/batches")
            .match_header("authorization", "Bearer key-abc")
            .match_body(Matcher::Json(json!({
                "from": "+15550000000",
                "to": ["+15551234567"],
                "body": "hi"
            })))
            .with_status(201)
            .create_async().await;

        let client = SinchClient::new(
            &server.url(), "plan-1", "key-abc", "+15550000000", Duration::from_secs(5)
        ).unwrap();
        client.send("+15551234567", "hi").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_201_is_upstream_failure() {
        let mut server = mockito::Server::new_async().await;
        server.mock("POST", "/plan-1/batches").with_status(200).create_async().await;

        let client = SinchClient::new(
            &server.url(), "plan-1", "key-abc", "+15550000000", Duration::from_secs(5)
        ).unwrap();
        let err = client.send("+15551234567", "hi").await.unwrap_err();
        assert!(matches!(err, RelayError::UpstreamFailure(_)));
    }
}
