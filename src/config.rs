use std::env;

use log::{debug, error, info, warn};
use url::Url;

use crate::error::{BotError, Result};

const DISCORD_TOKEN_VAR: &str = "DISCORD_TOKEN";
const WEBHOOK_URL_VAR: &str = "N8N_WEBHOOK_URL";

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    /// `None` keeps the bot online but disables the mention relay.
    pub webhook_url: Option<Url>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        Self::from_values(
            env::var(DISCORD_TOKEN_VAR).ok(),
            env::var(WEBHOOK_URL_VAR).ok(),
        )
    }

    fn from_values(discord_token: Option<String>, webhook_url: Option<String>) -> Result<Self> {
        let discord_token = discord_token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                error!("{DISCORD_TOKEN_VAR} is missing from the environment, the bot cannot start");
                BotError::Config(format!("{DISCORD_TOKEN_VAR} is not set"))
            })?;

        let webhook_url = match webhook_url.as_deref().map(str::trim) {
            None | Some("") => {
                warn!(
                    "{WEBHOOK_URL_VAR} is not set, mention relay is disabled until it is configured"
                );
                None
            }
            Some(raw) => Some(parse_webhook_url(raw)?),
        };

        info!("Configuration loaded successfully");
        debug!("Discord token length: {} characters", discord_token.len());
        debug!(
            "Webhook URL: {}",
            webhook_url.as_ref().map_or("<unset>", Url::as_str)
        );

        Ok(Self {
            discord_token,
            webhook_url,
        })
    }
}

fn parse_webhook_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| {
        error!("Failed to parse {WEBHOOK_URL_VAR}: {e}");
        BotError::Config(format!("{WEBHOOK_URL_VAR} is not a valid URL: {e}"))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => {
            error!("{WEBHOOK_URL_VAR} uses unsupported scheme '{scheme}'");
            Err(BotError::Config(format!(
                "{WEBHOOK_URL_VAR} must be an http or https URL, got '{scheme}'"
            )))
        }
    }
}
