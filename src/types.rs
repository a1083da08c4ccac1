//! Platform-neutral view of an incoming message.

use chrono::{DateTime, Timelike, Utc};
use poise::serenity_prelude::Message as SerenityMessage;

/// Author of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: u64,
    /// Display tag, e.g. `name` or `name#1234`
    pub tag: String,
    /// Set for bot and webhook accounts
    pub is_bot: bool,
}

/// One message received from the session, consumed by the relay.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub author: Author,
    pub content: String,
    pub mentions: Vec<u64>,
    pub channel_id: u64,
    pub message_id: u64,
    pub created_at: DateTime<Utc>,
}

impl InboundEvent {
    /// Returns true when `user_id` is among the mentioned users.
    #[must_use]
    pub fn mentions_user(&self, user_id: u64) -> bool {
        self.mentions.contains(&user_id)
    }
}

impl From<&SerenityMessage> for InboundEvent {
    fn from(message: &SerenityMessage) -> Self {
        // Serenity timestamps are bounded to years 1..=9999, well inside chrono's range.
        let created_at = DateTime::from_timestamp(
            message.timestamp.unix_timestamp(),
            message.timestamp.nanosecond(),
        )
        .expect("message timestamp fits in chrono's range");

        Self {
            author: Author {
                id: message.author.id.get(),
                tag: message.author.tag(),
                is_bot: message.author.bot,
            },
            content: message.content.clone(),
            mentions: message.mentions.iter().map(|user| user.id.get()).collect(),
            channel_id: message.channel_id.get(),
            message_id: message.id.get(),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::SecondsFormat;
    use poise::serenity_prelude::{ChannelId, MessageId, Timestamp, User, UserId};

    use super::*;

    fn user(id: u64, name: &str) -> User {
        let mut user = User::default();
        user.id = UserId::new(id);
        user.name = name.to_string();
        user
    }

    #[test]
    fn converts_serenity_message() {
        let mut message = SerenityMessage::default();
        message.id = MessageId::new(8);
        message.channel_id = ChannelId::new(7);
        message.author = user(42, "alice");
        message.content = "<@999> ping".to_string();
        message.mentions = vec![user(999, "relay")];
        message.timestamp = Timestamp::from_millis(1_714_566_600_123).unwrap();

        let event = InboundEvent::from(&message);

        assert_eq!(event.author.id, 42);
        assert_eq!(event.author.tag, "alice");
        assert!(!event.author.is_bot);
        assert_eq!(event.content, "<@999> ping");
        assert!(event.mentions_user(999));
        assert_eq!(event.channel_id, 7);
        assert_eq!(event.message_id, 8);
        assert_eq!(
            event.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            "2024-05-01T12:30:00.123Z"
        );
    }

    #[test]
    fn bot_authors_are_flagged() {
        let mut message = SerenityMessage::default();
        message.author = user(5, "other-bot");
        message.author.bot = true;

        assert!(InboundEvent::from(&message).author.is_bot);
    }
}
