use reqwest::StatusCode;
use strum::IntoStaticStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Serenity error: {0}")]
    Serenity(Box<poise::serenity_prelude::Error>),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<poise::serenity_prelude::Error> for BotError {
    fn from(err: poise::serenity_prelude::Error) -> Self {
        BotError::Serenity(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

/// Failure of a single webhook call.
///
/// Every variant is recovered locally: it is logged and turned into one
/// reply to the user via [`RelayError::user_message`].
#[derive(Error, Debug, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum RelayError {
    /// No response arrived: connection refused, DNS failure or timeout.
    #[error("webhook unreachable (timed out: {timed_out}): {source}")]
    Unreachable {
        timed_out: bool,
        #[source]
        source: reqwest::Error,
    },

    /// A response arrived with a non-success status.
    #[error("webhook returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The request could not be built or sent for a local reason.
    #[error("webhook request setup failed: {0}")]
    Setup(String),

    /// A success response without a usable `reply` field.
    #[error("webhook response has no usable reply: {body}")]
    Format { body: String },
}

impl RelayError {
    /// Short label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    /// Returns a user-friendly error message suitable for displaying in Discord
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            RelayError::Unreachable { .. } => {
                "Sorry, I couldn't reach the AI brain right now (it might be busy, offline, or timed out). Please try again later.".to_string()
            }
            RelayError::Status { status, .. } => format!(
                "Sorry, there was an error communicating with the AI brain (Status: {}). Please check the logs or try again later.",
                status.as_u16()
            ),
            RelayError::Setup(_) => {
                "Sorry, something went wrong on my end before I could talk to the AI brain. Please tell an admin.".to_string()
            }
            RelayError::Format { .. } => {
                "I got a response from the AI, but couldn't format it properly. Maybe try again?"
                    .to_string()
            }
        }
    }
}
