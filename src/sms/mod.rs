pub mod sinch;
pub mod twilio;

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use self::sinch::SinchClient;
use self::twilio::TwilioClient;
use crate::config::SmsSettings;
use crate::error::RelayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsProvider {
    Twilio,
    Sinch,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseSmsProviderError {
    message: String,
}

impl fmt::Display for ParseSmsProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseSmsProviderError {}

impl FromStr for SmsProvider {
    type Err = ParseSmsProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "twilio" => Ok(SmsProvider::Twilio),
            "sinch" => Ok(SmsProvider::Sinch),
            _ =>
                Err(ParseSmsProviderError {
                    message: format!("Invalid SMS provider: '{}'", s),
                }),
        }
    }
}

impl fmt::Display for SmsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmsProvider::Twilio => f.write_str("twilio"),
            SmsProvider::Sinch => f.write_str("sinch"),
        }
    }
}

/// Outbound SMS channel.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), RelayError>;
}

pub fn new_sender(
    settings: &SmsSettings,
    timeout: Duration
) -> Result<Arc<dyn SmsSender>, RelayError> {
    let sender: Arc<dyn SmsSender> = match settings {
        SmsSettings::Twilio { base_url, account_sid, auth_token, sender_number } => {
            Arc::new(TwilioClient::new(base_url, account_sid, auth_token, sender_number, timeout)?)
        }
        SmsSettings::Sinch { base_url, plan_id, api_key, sender_number } => {
            Arc::new(SinchClient::new(base_url, plan_id, api_key, sender_number, timeout)?)
        }
    };
    Ok(sender)
}
