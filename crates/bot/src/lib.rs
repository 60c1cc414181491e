//! Batbot Bot - Telegram command surface for the battery notifier
//!
//! This crate provides the command handlers and the dispatcher entry point.

pub mod commands;
pub mod handlers;

use anyhow::Result;
use batbot_core::{Config, SharedSensor};
use commands::Command;
use teloxide::dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler};
use teloxide::dptree;
use teloxide::prelude::*;

/// Build the message handler schema.
///
/// Exported so integration tests can dispatch mocked updates through the
/// production tree.
pub fn build_handler_tree() -> UpdateHandler<teloxide::RequestError> {
    Update::filter_message().branch(
        dptree::entry()
            .filter_command::<Command>()
            .endpoint(handle_command),
    )
}

/// Run the Telegram bot service
///
/// This function initializes the bot dispatcher and runs until it exits or
/// encounters an error. It does not handle Ctrl+C signals - that should be
/// handled by the caller.
pub async fn run_bot(bot: Bot, config: Config, sensor: SharedSensor) -> Result<()> {
    tracing::info!("Bot initialized, starting dispatcher");

    // Note: NOT using enable_ctrlc_handler() - shutdown is managed by the caller
    Dispatcher::builder(bot, build_handler_tree())
        .dependencies(dptree::deps![config, sensor])
        .build()
        .dispatch()
        .await;

    Ok(())
}

/// Route commands to their handlers
async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    config: Config,
    sensor: SharedSensor,
) -> ResponseResult<()> {
    tracing::info!("Handling command: {:?}", cmd);

    let result = match cmd {
        Command::Start => handlers::handle_start(bot, msg, &config).await,
        Command::Battery => handlers::handle_battery(bot, &config, sensor).await,
        Command::Help => handlers::handle_help(bot, msg).await,
    };

    if let Err(e) = result {
        tracing::error!("Error handling command: {}", e);
    }

    Ok(())
}
