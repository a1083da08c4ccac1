//! Mention relay: forwards bot mentions to the webhook and replies with its answer.

use async_trait::async_trait;
use log::{debug, error, info, warn};

use crate::error::{RelayError, Result};
use crate::mention::extract_query;
use crate::types::InboundEvent;
use crate::webhook::{RelayPayload, WebhookClient};

/// What the relay needs from the conversation a message came from.
#[async_trait]
pub trait Conversation: Send + Sync {
    /// Shows the typing indicator in the channel.
    async fn start_typing(&self) -> Result<()>;

    /// Replies to the originating message.
    async fn reply(&self, content: &str) -> Result<()>;
}

/// Which branch the relay took for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Authored by a bot account.
    IgnoredBot,
    /// The relay's own account was not mentioned.
    NotMentioned,
    /// No webhook is configured, nothing was sent.
    WebhookMissing,
    /// The webhook's reply was posted.
    Replied,
    /// The webhook call failed and an apology was posted.
    Failed(&'static str),
}

pub struct MentionRelay {
    bot_user_id: u64,
    webhook: Option<WebhookClient>,
}

impl MentionRelay {
    #[must_use]
    pub fn new(bot_user_id: u64, webhook: Option<WebhookClient>) -> Self {
        Self {
            bot_user_id,
            webhook,
        }
    }

    /// Runs one inbound event through the relay.
    ///
    /// Webhook failures are answered in the conversation and never returned;
    /// only errors from the conversation itself propagate.
    pub async fn handle<C>(&self, conversation: &C, event: &InboundEvent) -> Result<RelayOutcome>
    where
        C: Conversation + ?Sized,
    {
        if event.author.is_bot {
            return Ok(RelayOutcome::IgnoredBot);
        }
        if !event.mentions_user(self.bot_user_id) {
            return Ok(RelayOutcome::NotMentioned);
        }

        info!(
            "Mention from {} ({}) in channel {} at {}, message {}: {}",
            event.author.tag,
            event.author.id,
            event.channel_id,
            event.created_at.to_rfc3339(),
            event.message_id,
            event.content
        );

        let Some(webhook) = &self.webhook else {
            warn!(
                "Cannot relay message {}: webhook URL is not configured",
                event.message_id
            );
            return Ok(RelayOutcome::WebhookMissing);
        };

        if let Err(e) = conversation.start_typing().await {
            debug!("Failed to broadcast typing indicator: {e}");
        }

        let question = extract_query(&event.content);
        info!("Extracted question: \"{question}\"");

        let payload = RelayPayload::new(event, question);
        match serde_json::to_string(&payload) {
            Ok(json) => info!("Sending payload to {}: {json}", webhook.url()),
            Err(e) => debug!("Could not render payload for logging: {e}"),
        }

        match webhook.relay(&payload).await {
            Ok(reply) => {
                conversation.reply(&reply).await?;
                info!(
                    "Replied to {} in channel {}: {}",
                    event.author.tag, event.channel_id, reply
                );
                Ok(RelayOutcome::Replied)
            }
            Err(e) => {
                log_failure(event, &e);
                conversation.reply(&e.user_message()).await?;
                Ok(RelayOutcome::Failed(e.kind()))
            }
        }
    }
}

fn log_failure(event: &InboundEvent, err: &RelayError) {
    match err {
        RelayError::Format { body } => warn!(
            "Webhook answered message {} without a usable 'reply' field: {}",
            event.message_id, body
        ),
        RelayError::Status { status, body } => error!(
            "Webhook call for message {} failed with status {}: {}",
            event.message_id,
            status.as_u16(),
            body
        ),
        RelayError::Unreachable { timed_out, source } => error!(
            "No response from webhook for message {} (timed out: {}): {}",
            event.message_id, timed_out, source
        ),
        RelayError::Setup(detail) => error!(
            "Error setting up webhook request for message {}: {}",
            event.message_id, detail
        ),
    }
}
