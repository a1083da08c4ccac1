#[tokio::main]
async fn main() -> mention_relay::error::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("mention_relay=info,serenity=warn"),
    )
    .init();
    log::info!("Starting mention-relay Discord bot");

    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        log::debug!("A rustls crypto provider was already installed");
    }

    match mention_relay::run().await {
        Ok(()) => {
            log::info!("Bot shut down successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Bot encountered an error: {}", e);
            Err(e)
        }
    }
}
