use chrono::{ SecondsFormat, Utc };
use log::{ debug, error, info };
use crate::error::RelayError;
use crate::history::Conversation;
use crate::llm::{ build_messages, ChatClient };
use crate::models::chat::Role;
use crate::sms::SmsSender;

/// Handles a message that is not a command. The user turn is kept even if
/// a later step fails, and a failed SMS send does not remove the assistant
/// turn.
pub async fn handle_default_message(
    conversation: &mut Conversation,
    chat_client: &dyn ChatClient,
    sms: &dyn SmsSender,
    preamble: &str,
    sender: &str,
    message: &str
) -> Result<(), RelayError> {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    conversation.append(Role::User, message, timestamp);

    let messages = build_messages(preamble, conversation.snapshot());
    debug!("User message: {}", message);
    info!("Sending {} messages to model {}", messages.len(), chat_client.get_model());

    let reply = chat_client.chat(messages).await.map_err(|e| {
        error!("Error getting AI response: {}", e);
        e
    })?;

    debug!("AI response: {}", reply.content);
    conversation.append(Role::Assistant, reply.content.as_str(), reply.created_at);

    sms.send(sender, &reply.content).await.map_err(|e| {
        error!("Error sending SMS: {}", e);
        e
    })
}
