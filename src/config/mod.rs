use crate::cli::Args;
use crate::sms::SmsProvider;
use std::collections::HashSet;
use std::net::{ IpAddr, SocketAddr };
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Sender identifiers permitted to use the relay. Membership is exact: a
/// configured "+1555123" does not admit "+15551234567".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList(HashSet<String>);

impl AllowList {
    pub fn parse(raw: &str) -> Self {
        Self(
            raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        )
    }

    pub fn contains(&self, sender: &str) -> bool {
        self.0.contains(sender)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmsSettings {
    Twilio {
        base_url: String,
        account_sid: String,
        auth_token: String,
        sender_number: String,
    },
    Sinch {
        base_url: String,
        plan_id: String,
        api_key: String,
        sender_number: String,
    },
}

impl SmsSettings {
    pub fn provider(&self) -> SmsProvider {
        match self {
            SmsSettings::Twilio { .. } => SmsProvider::Twilio,
            SmsSettings::Sinch { .. } => SmsProvider::Sinch,
        }
    }

    pub fn sender_number(&self) -> &str {
        match self {
            SmsSettings::Twilio { sender_number, .. } => sender_number,
            SmsSettings::Sinch { sender_number, .. } => sender_number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsSettings {
    pub cert_path: String,
    pub key_path: String,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub tls: Option<TlsSettings>,
    pub ollama_url: String,
    pub model: String,
    pub instructions: String,
    pub request_timeout: Duration,
    pub allow_list: AllowList,
    pub sms: SmsSettings,
    pub export_dir: PathBuf,
}

fn required(value: &Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ConfigError::Missing(name))
}

fn http_url(value: String, field: &'static str) -> Result<String, ConfigError> {
    let parsed = Url::parse(&value).map_err(|e| ConfigError::Invalid {
        field,
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(value),
        other =>
            Err(ConfigError::Invalid {
                field,
                reason: format!("unsupported scheme '{}'", other),
            }),
    }
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let port = args.port.ok_or(ConfigError::Missing("PORT"))?;
        let host: IpAddr = args.host
            .trim()
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                field: "HOST",
                reason: e.to_string(),
            })?;
        let model = required(&args.model, "MODEL")?;
        let ollama_url = http_url(required(&args.ollama_url, "OLLAMA_URL")?, "OLLAMA_URL")?;

        let allow_list = AllowList::parse(
            &required(&args.valid_phone_numbers, "VALID_PHONE_NUMBERS")?
        );
        if allow_list.is_empty() {
            return Err(ConfigError::Missing("VALID_PHONE_NUMBERS"));
        }

        let provider: SmsProvider = args.sms_provider
            .parse()
            .map_err(|e: crate::sms::ParseSmsProviderError| ConfigError::Invalid {
                field: "SMS_PROVIDER",
                reason: e.to_string(),
            })?;
        let sms = match provider {
            SmsProvider::Twilio =>
                SmsSettings::Twilio {
                    base_url: http_url(args.twilio_base_url.clone(), "TWILIO_BASE_URL")?,
                    account_sid: required(&args.twilio_account_sid, "TWILIO_ACCOUNT_SID")?,
                    auth_token: required(&args.twilio_auth_token, "TWILIO_AUTH_TOKEN")?,
                    sender_number: required(&args.twilio_sender_number, "TWILIO_SENDER_NUMBER")?,
                },
            SmsProvider::Sinch =>
                SmsSettings::Sinch {
                    base_url: http_url(required(&args.sinch_base_url, "SINCH_BASE_URL")?, "SINCH_BASE_URL")?,
                    plan_id: required(&args.sinch_plan_id, "SINCH_PLAN_ID")?,
                    api_key: required(&args.sinch_api_key, "SINCH_API_KEY")?,
                    sender_number: required(&args.sinch_sender_number, "SINCH_SENDER_NUMBER")?,
                },
        };

        let tls = if args.enable_tls {
            match (&args.tls_cert_path, &args.tls_key_path) {
                (Some(cert_path), Some(key_path)) =>
                    Some(TlsSettings {
                        cert_path: cert_path.clone(),
                        key_path: key_path.clone(),
                    }),
                (None, _) => {
                    return Err(ConfigError::Missing("TLS_CERT_PATH"));
                }
                (_, None) => {
                    return Err(ConfigError::Missing("TLS_KEY_PATH"));
                }
            }
        } else {
            None
        };

        if args.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "REQUEST_TIMEOUT_SECS",
                reason: "must be greater than zero".into(),
            });
        }

        Ok(Self {
            host,
            port,
            tls,
            ollama_url,
            model,
            instructions: args.ollama_instructions.clone(),
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            allow_list,
            sms,
            export_dir: PathBuf::from(&args.export_dir),
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
