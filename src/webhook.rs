//! Client for the automation webhook that answers relayed mentions.

use std::time::Duration;

use log::{debug, info};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::RelayError;
use crate::types::InboundEvent;

/// How long to wait for the webhook before giving up.
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_millis(20_000);

/// Request body posted to the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayPayload {
    pub question: String,
    pub user_id: String,
    pub user_name: String,
    pub channel_id: String,
    pub message_id: String,
    /// ISO-8601 creation time of the originating message
    pub timestamp: String,
}

impl RelayPayload {
    /// Builds the payload for `event` carrying the extracted `question`.
    #[must_use]
    pub fn new(event: &InboundEvent, question: String) -> Self {
        Self {
            question,
            user_id: event.author.id.to_string(),
            user_name: event.author.tag.clone(),
            channel_id: event.channel_id.to_string(),
            message_id: event.message_id.to_string(),
            timestamp: event
                .created_at
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        }
    }
}

/// Parsed webhook answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayResult {
    pub reply: Option<String>,
}

impl RelayResult {
    /// Reads a result out of a raw response body.
    ///
    /// Bodies that are not JSON objects, and `reply` values that are not
    /// strings, produce a result without a reply.
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        let reply = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(mut fields)) => match fields.remove("reply") {
                Some(Value::String(reply)) => Some(reply),
                _ => None,
            },
            _ => None,
        };
        Self { reply }
    }

    /// The reply text, if present and non-blank.
    #[must_use]
    pub fn usable_reply(&self) -> Option<&str> {
        self.reply
            .as_deref()
            .filter(|reply| !reply.trim().is_empty())
    }
}

pub struct WebhookClient {
    client: reqwest::Client,
    url: Url,
    timeout: Duration,
}

impl WebhookClient {
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self::with_timeout(url, WEBHOOK_TIMEOUT)
    }

    #[must_use]
    pub fn with_timeout(url: Url, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            timeout,
        }
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Posts `payload` and returns the reply text.
    pub async fn relay(&self, payload: &RelayPayload) -> Result<String, RelayError> {
        debug!("Posting payload to webhook {}", self.url);

        let response = self
            .client
            .post(self.url.clone())
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            // The status line arrived, so a broken body still counts as a status failure.
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<body unavailable: {e}>"));
            return Err(RelayError::Status { status, body });
        }

        let body = response.text().await.map_err(classify_send_error)?;
        info!("Webhook responded with status {status}: {body}");

        RelayResult::from_body(&body)
            .usable_reply()
            .map(str::to_string)
            .ok_or(RelayError::Format { body })
    }
}

fn classify_send_error(err: reqwest::Error) -> RelayError {
    if err.is_builder() {
        RelayError::Setup(err.to_string())
    } else {
        RelayError::Unreachable {
            timed_out: err.is_timeout(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::types::Author;

    fn event() -> InboundEvent {
        InboundEvent {
            author: Author {
                id: 42,
                tag: "alice".to_string(),
                is_bot: false,
            },
            content: "<@999> ping".to_string(),
            mentions: vec![999],
            channel_id: 7,
            message_id: 8,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn payload_uses_camel_case_fields() -> serde_json::Result<()> {
        let payload = RelayPayload::new(&event(), "ping".to_string());
        let json = serde_json::to_value(&payload)?;
        assert_eq!(
            json,
            serde_json::json!({
                "question": "ping",
                "userId": "42",
                "userName": "alice",
                "channelId": "7",
                "messageId": "8",
                "timestamp": "2024-05-01T12:30:00.000Z",
            })
        );
        Ok(())
    }

    #[test]
    fn string_reply_is_usable() {
        let result = RelayResult::from_body(r#"{"reply":"It is sunny."}"#);
        assert_eq!(result.usable_reply(), Some("It is sunny."));
    }

    #[test]
    fn reply_is_not_trimmed() {
        let result = RelayResult::from_body(r#"{"reply":"  padded  "}"#);
        assert_eq!(result.usable_reply(), Some("  padded  "));
    }

    #[test]
    fn blank_or_non_string_reply_is_unusable() {
        for body in [
            r#"{"reply":""}"#,
            r#"{"reply":"   "}"#,
            r#"{"reply":42}"#,
            r#"{"reply":null}"#,
            r#"{"reply":["a"]}"#,
            r#"{"answer":"hi"}"#,
            r#""just a string""#,
            "[1,2,3]",
            r#"["hi"]"#,
            "not json",
            "",
        ] {
            assert!(
                RelayResult::from_body(body).usable_reply().is_none(),
                "body: {body}"
            );
        }
    }

    #[test]
    fn extra_fields_are_ignored() {
        let result = RelayResult::from_body(r#"{"reply":"pong","meta":{"took":3}}"#);
        assert_eq!(result.usable_reply(), Some("pong"));
    }
}
