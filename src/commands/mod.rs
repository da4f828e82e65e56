use async_trait::async_trait;
use log::{ error, info };
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use crate::error::RelayError;
use crate::history::Conversation;
use crate::sms::SmsSender;

/// Everything a command may touch while it runs.
pub struct CommandContext<'a> {
    pub conversation: &'a mut Conversation,
    pub sms: &'a dyn SmsSender,
    pub sender: &'a str,
    pub registry: &'a CommandRegistry,
    pub export_dir: &'a Path,
}

#[async_trait]
pub trait Command: Send + Sync {
    fn description(&self) -> &str;

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), RelayError>;
}

/// Immutable trigger -> command table. Triggers are stored lowercase and
/// matched against the whole message body.
pub struct CommandRegistry {
    commands: BTreeMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new<I>(commands: I) -> Self where I: IntoIterator<Item = (String, Arc<dyn Command>)> {
        Self {
            commands: commands
                .into_iter()
                .map(|(trigger, command)| (trigger.to_lowercase(), command))
                .collect(),
        }
    }

    pub fn standard() -> Self {
        Self::new([
            ("list".to_string(), Arc::new(ListCommands) as Arc<dyn Command>),
            ("1".to_string(), Arc::new(SaveAndClearChat) as Arc<dyn Command>),
            ("2".to_string(), Arc::new(ClearChat) as Arc<dyn Command>),
        ])
    }

    pub fn lookup(&self, text: &str) -> Option<&dyn Command> {
        self.commands.get(&text.to_lowercase()).map(|c| c.as_ref())
    }

    pub fn list(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.commands.iter().map(|(trigger, command)| (trigger.as_str(), command.description()))
    }

    pub fn help_text(&self) -> String {
        let mut text = String::from("Available commands:\n");
        for (trigger, description) in self.list() {
            text.push_str(&format!("{}: {}\n", trigger, description));
        }
        text
    }
}

pub struct ListCommands;

#[async_trait]
impl Command for ListCommands {
    fn description(&self) -> &str {
        "Show available commands"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), RelayError> {
        ctx.sms.send(ctx.sender, &ctx.registry.help_text()).await
    }
}

pub struct SaveAndClearChat;

#[async_trait]
impl Command for SaveAndClearChat {
    fn description(&self) -> &str {
        "Save and clear chat"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), RelayError> {
        let path = match ctx.conversation.export_to_text(ctx.export_dir) {
            Ok(path) => path,
            Err(e) => {
                let notice = format!("Error saving chat: {}", e);
                if let Err(send_err) = ctx.sms.send(ctx.sender, &notice).await {
                    error!("Error sending SMS: {}", send_err);
                }
                return Err(e);
            }
        };

        ctx.conversation.clear();
        info!("Chat saved as {} and cleared.", path.display());
        ctx.sms.send(ctx.sender, "Chat saved and cleared.").await
    }
}

pub struct ClearChat;

#[async_trait]
impl Command for ClearChat {
    fn description(&self) -> &str {
        "Clear chat"
    }

    async fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<(), RelayError> {
        ctx.conversation.clear();
        info!("Chat cleared.");
        ctx.sms.send(ctx.sender, "Chat cleared.").await
    }
}
