//! Batbot - Telegram battery notification bot
//!
//! Single binary that loads configuration once, then runs the command
//! dispatcher and the periodic battery monitor until terminated.

use std::sync::Arc;

use anyhow::Result;
use batbot_core::{Cli, Config, SharedSensor, SysfsBattery};
use clap::Parser;
use teloxide::Bot;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (RUST_LOG and friends)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bot=debug,monitor=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting batbot");

    // Load configuration once; every service gets it from here
    let cli = Cli::parse();
    let config = Config::load(&cli)?;

    let sensor: SharedSensor = Arc::new(SysfsBattery::new());
    let bot = Bot::new(&config.bot_token);

    // Shutdown coordination
    let shutdown = CancellationToken::new();

    let monitor_handle = spawn_monitor(
        bot.clone(),
        config.clone(),
        sensor.clone(),
        shutdown.clone(),
    );
    let bot_handle = spawn_bot(bot, config, sensor, shutdown.clone());

    tracing::info!("All services started");

    // Run until a signal arrives or a service hits a fatal error and
    // cancels the token itself
    tokio::select! {
        _ = wait_for_shutdown() => {
            tracing::info!("Shutdown signal received");
            shutdown.cancel();
        }
        _ = shutdown.cancelled() => {}
    }

    let (monitor_result, bot_result) = tokio::join!(monitor_handle, bot_handle);
    monitor_result??;
    bot_result??;

    tracing::info!("All services stopped");
    Ok(())
}

fn spawn_monitor(
    bot: Bot,
    config: Config,
    sensor: SharedSensor,
    shutdown: CancellationToken,
) -> tokio::task::JoinHandle<Result<()>> {
    tokio::spawn(async move {
        let result = monitor::run_monitor(bot, config, sensor, Some(shutdown.clone())).await;

        if let Err(ref e) = result {
            tracing::error!("Monitor service exited: {:?}", e);
            shutdown.cancel();
        }

        result
    })
}

fn spawn_bot(
    bot: Bot,
    config: Config,
    sensor: SharedSensor,
    shutdown: CancellationToken,
) -> tokio::task::JoinHandle<Result<()>> {
    tokio::spawn(async move {
        tokio::select! {
            result = bot::run_bot(bot, config, sensor) => {
                tracing::error!("Bot service exited: {:?}", result);
                shutdown.cancel();
                result
            }
            _ = shutdown.cancelled() => {
                tracing::info!("Bot service shutting down");
                Ok(())
            }
        }
    })
}

async fn wait_for_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
