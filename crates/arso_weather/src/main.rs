use std::path::Path;

use anyhow::Context;
use anyhow::anyhow;
use arso_weather::ArsoIntegration;
use arso_weather::Config;
use arso_weather::Integration;
use arso_weather::feed::ReqwestFeedClient;
use arso_weather::integration;
use arso_weather::integration::FromIntegrationMessage;
use tracing::error;
use tracing::info;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_CONFIG_PATH: &str = "arso-weather.toml";

fn load_config() -> anyhow::Result<(Config, Option<String>)> {
    match std::env::args().nth(1) {
        Some(path) => {
            let config = Config::from_file(&path)
                .with_context(|| format!("Failed to load config from {}", path))?;
            Ok((config, Some(path)))
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            let config = Config::from_file(DEFAULT_CONFIG_PATH)?;
            Ok((config, Some(DEFAULT_CONFIG_PATH.to_string())))
        }
        None => Ok((Config::default(), None)),
    }
}

fn log_message(msg: &FromIntegrationMessage) {
    match msg {
        FromIntegrationMessage::EntityDiscovered {
            platform,
            integration_name,
            ..
        } => info!(
            "Discovered {} entity {} from {}",
            platform,
            msg.entity_id(),
            integration_name
        ),
        FromIntegrationMessage::WeatherUpdated { state, .. } => {
            info!("{} updated: {}", msg.entity_id(), state)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, config_path) = load_config()?;

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(config.logging.targets())
        .init();

    info!("arso-weatherd starting");
    match &config_path {
        Some(path) => info!("Loaded config from: {}", path),
        None => info!("No config file found, using defaults"),
    }

    let client = ReqwestFeedClient::new(config.station.request_timeout())
        .context("Failed to create HTTP client")?;
    let mut arso = ArsoIntegration::new(client, &config.station)
        .context("Invalid station configuration")?;

    let (tx, mut rx) = integration::channel();
    arso.setup(tx)
        .await
        .map_err(|e| anyhow!("Failed to set up {} integration: {}", arso.name(), e))?;

    info!("Integration started, press Ctrl+C to exit");

    loop {
        tokio::select! {
            msg = rx.recv() => match msg {
                Some(msg) => log_message(&msg),
                None => {
                    error!("Integration channel closed");
                    break;
                }
            },
            signal = tokio::signal::ctrl_c() => {
                match signal {
                    Ok(()) => info!("Received shutdown signal"),
                    Err(e) => error!("Failed to listen for shutdown signal: {}", e),
                }
                break;
            }
        }
    }

    arso.shutdown()
        .await
        .map_err(|e| anyhow!("Failed to shut down {} integration: {}", arso.name(), e))?;

    info!("arso-weatherd shutdown complete");
    Ok(())
}
