pub mod models;
pub mod server;
pub mod config;
pub mod llm;
pub mod cli;
pub mod history;
pub mod commands;
pub mod error;
pub mod logging;
pub mod sms;
pub mod webhook;

use commands::CommandRegistry;
use config::Config;
use history::Conversation;
use llm::ChatClient;
use llm::ollama::OllamaClient;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::Mutex;
use webhook::{ Dispatcher, RelaySettings };

pub async fn run(config: Config) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", config.bind_addr());
    info!("TLS Enabled: {}", config.tls.is_some());
    info!("Ollama URL: {}", config.ollama_url);
    info!("Model: {}", config.model);
    info!("SMS Provider: {}", config.sms.provider());
    info!("Sender Number: {}", config.sms.sender_number());
    info!("Allowed Senders: {}", config.allow_list.len());
    info!("Export Directory: {}", config.export_dir.display());
    info!("Request Timeout: {}s", config.request_timeout.as_secs());
    info!("-------------------------");

    let chat_client: Arc<dyn ChatClient> = Arc::new(
        OllamaClient::new(&config.ollama_url, &config.model, config.request_timeout)?
    );
    let sms = sms::new_sender(&config.sms, config.request_timeout)?;

    let dispatcher = Arc::new(
        Dispatcher::new(
            Arc::new(Mutex::new(Conversation::new())),
            Arc::new(CommandRegistry::standard()),
            chat_client,
            sms,
            RelaySettings {
                allow_list: config.allow_list.clone(),
                preamble: config.instructions.clone(),
                export_dir: config.export_dir.clone(),
            }
        )
    );

    let server = Server::new(config.bind_addr(), dispatcher, config.tls.clone());
    server.run().await?;

    Ok(())
}
