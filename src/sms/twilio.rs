use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use super::SmsSender;
use crate::error::RelayError;

pub const DEFAULT_BASE_URL: &str = "https://api.twilio.com";

#[derive(Debug)]
pub struct TwilioClient {
    http: HttpClient,
    base_url: String,
    account_sid: String,
    auth_token: String,
    sender_number: String,
}

#[derive(Deserialize)]
struct MessageResource {
    sid: Option<String>,
    status: Option<String>,
}

impl TwilioClient {
    pub fn new(
        base_url: &str,
        account_sid: &str,
        auth_token: &str,
        sender_number: &str,
        timeout: Duration
    ) -> Result<Self, RelayError> {
        Ok(Self {
            http: HttpClient::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            account_sid: account_sid.to_string(),
            auth_token: auth_token.to_string(),
            sender_number: sender_number.to_string(),
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/2010-04-01/Accounts/{}/Messages.json", self.base_url, self.account_sid)
    }
}

#[async_trait]
impl SmsSender for TwilioClient {
    async fn send(&self, to: &str, body: &str) -> Result<(), RelayError> {
        let params = [("To", to), ("From", self.sender_number.as_str()), ("Body", body)];
        let resp = self.http
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send().await?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(RelayError::UpstreamFailure(
                format!("twilio returned {}: {}", status, detail)
            ));
        }

        match resp.json::<MessageResource>().await {
            Ok(msg) => debug!("Twilio accepted message sid={:?} status={:?}", msg.sid, msg.status),
            Err(e) => debug!("Twilio accepted message, response body unreadable: {}", e),
        }
        Ok(())
    }
}
