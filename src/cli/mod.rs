use clap::Parser;
use crate::sms::twilio::DEFAULT_BASE_URL as DEFAULT_TWILIO_BASE_URL;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Port for the webhook server to listen on.
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Interface address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,

    /// Path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    // --- Inference Args ---
    /// Base URL of the Ollama server (e.g., http://localhost:11434)
    #[arg(long, env = "OLLAMA_URL")]
    pub ollama_url: Option<String>,

    /// Model name for chat completion (e.g., llama3)
    #[arg(long, env = "MODEL")]
    pub model: Option<String>,

    /// Instruction text prepended to the first message of every conversation.
    #[arg(long, env = "OLLAMA_INSTRUCTIONS", default_value = "")]
    pub ollama_instructions: String,

    /// Timeout in seconds applied to every outbound HTTP request.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    // --- SMS Provider Args ---
    /// SMS provider used for replies (twilio, sinch)
    #[arg(long, env = "SMS_PROVIDER", default_value = "twilio")]
    pub sms_provider: String,

    /// Comma separated phone numbers allowed to talk to the relay.
    #[arg(long, env = "VALID_PHONE_NUMBERS")]
    pub valid_phone_numbers: Option<String>,

    #[arg(long, env = "TWILIO_ACCOUNT_SID")]
    pub twilio_account_sid: Option<String>,

    #[arg(long, env = "TWILIO_AUTH_TOKEN")]
    pub twilio_auth_token: Option<String>,

    #[arg(long, env = "TWILIO_SENDER_NUMBER")]
    pub twilio_sender_number: Option<String>,

    #[arg(long, env = "TWILIO_BASE_URL", default_value = DEFAULT_TWILIO_BASE_URL)]
    pub twilio_base_url: String,

    /// Sinch REST base URL (e.g., https://us.sms.api.sinch.com/xms/v1)
    #[arg(long, env = "SINCH_BASE_URL")]
    pub sinch_base_url: Option<String>,

    #[arg(long, env = "SINCH_PLAN_ID")]
    pub sinch_plan_id: Option<String>,

    #[arg(long, env = "SINCH_API_KEY")]
    pub sinch_api_key: Option<String>,

    #[arg(long, env = "SINCH_SENDER_NUMBER")]
    pub sinch_sender_number: Option<String>,

    // --- General App Args ---
    /// Log verbosity (error, warn, info, debug, trace). RUST_LOG takes precedence.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// File that log output is appended to, in addition to stdout.
    #[arg(long, env = "LOG_FILE", default_value = "app.log")]
    pub log_file: String,

    /// Directory saved chat transcripts are written to.
    #[arg(long, env = "EXPORT_DIR", default_value = ".")]
    pub export_dir: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twilio_base_url_defaults_to_client_constant() {
        if std::env::var_os("TWILIO_BASE_URL").is_some() {
            return;
        }
        let args = Args::try_parse_from(["sms-relay", "--port", "8080"]).unwrap();
        assert_eq!(args.twilio_base_url, DEFAULT_TWILIO_BASE_URL);
        assert_eq!(args.port, Some(8080));
    }
}
