//! Discord session setup and event routing.

use std::error::Error as StdError;

use async_trait::async_trait;
use log::{debug, error, info};
use poise::{
    Framework, FrameworkOptions,
    serenity_prelude::{
        ActivityData, ClientBuilder, Context, FullEvent, GatewayIntents, Http,
        Message as SerenityMessage,
    },
};

use crate::config::Config;
use crate::error::Result;
use crate::relay::{Conversation, MentionRelay, RelayOutcome};
use crate::types::InboundEvent;
use crate::webhook::WebhookClient;

type EventResult = std::result::Result<(), Box<dyn StdError + Send + Sync>>;

pub struct Data {
    relay: MentionRelay,
}

/// The channel and message a mention arrived in.
struct DiscordConversation<'a> {
    http: &'a Http,
    message: &'a SerenityMessage,
}

#[async_trait]
impl Conversation for DiscordConversation<'_> {
    async fn start_typing(&self) -> Result<()> {
        self.message.channel_id.broadcast_typing(self.http).await?;
        Ok(())
    }

    async fn reply(&self, content: &str) -> Result<()> {
        self.message.reply(self.http, content).await?;
        Ok(())
    }
}

/// Run the Discord bot.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Config::from_env()?;

    debug!("Setting up gateway intents");
    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;

    let webhook_url = config.webhook_url;

    debug!("Building framework");
    let framework = Framework::builder()
        .options(FrameworkOptions {
            event_handler: |ctx, event, _framework, data| Box::pin(event_handler(ctx, event, data)),
            ..Default::default()
        })
        .setup(move |ctx, ready, _framework| {
            Box::pin(async move {
                info!("Logged in as {} (ID: {})", ready.user.tag(), ready.user.id);
                info!(
                    "Webhook URL configured: {}",
                    if webhook_url.is_some() { "yes" } else { "no" }
                );
                ctx.set_activity(Some(ActivityData::listening("@mentions")));

                let webhook = webhook_url.map(WebhookClient::new);
                Ok(Data {
                    relay: MentionRelay::new(ready.user.id.get(), webhook),
                })
            })
        })
        .build();

    debug!("Creating Discord client");
    let mut client = ClientBuilder::new(config.discord_token, intents)
        .framework(framework)
        .await?;
    let shard_manager = client.shard_manager.clone();

    info!("Logging in to Discord");

    tokio::select! {
        result = client.start() => {
            result?;
        }
        signal = shutdown_signal() => {
            match signal {
                Ok(name) => info!("{name} received, shutting down..."),
                Err(e) => error!("Failed to listen for shutdown signals, shutting down: {e}"),
            }
            shard_manager.shutdown_all().await;
        }
    }

    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;

    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|()| "SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
        _ = quit.recv() => Ok("SIGQUIT"),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|()| "Ctrl-C")
}

async fn event_handler(ctx: &Context, event: &FullEvent, data: &Data) -> EventResult {
    if let FullEvent::Message { new_message } = event {
        let conversation = DiscordConversation {
            http: &ctx.http,
            message: new_message,
        };

        match data
            .relay
            .handle(&conversation, &InboundEvent::from(new_message))
            .await
        {
            Ok(RelayOutcome::IgnoredBot | RelayOutcome::NotMentioned) => {}
            Ok(outcome) => debug!("Message {} handled: {:?}", new_message.id, outcome),
            Err(e) => error!(
                "Error handling message {} from {}: {}",
                new_message.id,
                new_message.author.tag(),
                e
            ),
        }
    }
    Ok(())
}
