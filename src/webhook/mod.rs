pub mod flow;

use log::{ info, warn };
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use crate::commands::{ CommandContext, CommandRegistry };
use crate::config::AllowList;
use crate::error::RelayError;
use crate::history::Conversation;
use crate::llm::ChatClient;
use crate::sms::SmsSender;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Command(String),
    Message,
}

#[derive(Debug, Clone, Default)]
pub struct RelaySettings {
    pub allow_list: AllowList,
    pub preamble: String,
    pub export_dir: PathBuf,
}

/// Routes a validated webhook to a command or to the default message flow.
/// The conversation lock is held for the whole traversal so deliveries are
/// applied one at a time.
pub struct Dispatcher {
    conversation: Arc<Mutex<Conversation>>,
    registry: Arc<CommandRegistry>,
    chat_client: Arc<dyn ChatClient>,
    sms: Arc<dyn SmsSender>,
    settings: RelaySettings,
}

impl Dispatcher {
    pub fn new(
        conversation: Arc<Mutex<Conversation>>,
        registry: Arc<CommandRegistry>,
        chat_client: Arc<dyn ChatClient>,
        sms: Arc<dyn SmsSender>,
        settings: RelaySettings
    ) -> Self {
        Self { conversation, registry, chat_client, sms, settings }
    }

    pub fn conversation(&self) -> Arc<Mutex<Conversation>> {
        Arc::clone(&self.conversation)
    }

    pub async fn dispatch(
        &self,
        form: &HashMap<String, String>
    ) -> Result<DispatchOutcome, RelayError> {
        let sender = form
            .get("From")
            .ok_or_else(|| RelayError::ValidationFailed("missing From".into()))?;
        let message = form
            .get("Body")
            .ok_or_else(|| RelayError::ValidationFailed("missing Body".into()))?;

        if !self.settings.allow_list.contains(sender) {
            warn!("Received text from invalid phone number: {}", sender);
            return Err(RelayError::ValidationFailed(format!("sender {} not allowed", sender)));
        }

        let mut conversation = self.conversation.lock().await;

        if let Some(command) = self.registry.lookup(message.trim()) {
            let trigger = message.trim().to_lowercase();
            info!("Running command '{}' for {}", trigger, sender);
            let mut ctx = CommandContext {
                conversation: &mut *conversation,
                sms: self.sms.as_ref(),
                sender,
                registry: &self.registry,
                export_dir: &self.settings.export_dir,
            };
            command.execute(&mut ctx).await?;
            return Ok(DispatchOutcome::Command(trigger));
        }

        flow::handle_default_message(
            &mut *conversation,
            self.chat_client.as_ref(),
            self.sms.as_ref(),
            &self.settings.preamble,
            sender,
            message
        ).await?;
        Ok(DispatchOutcome::Message)
    }
}
