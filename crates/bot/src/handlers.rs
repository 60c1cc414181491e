//! Command handlers
//!
//! Implementation of all bot command handlers

use anyhow::Result;
use batbot_core::{BatteryStatus, Config, SharedSensor};
use teloxide::prelude::*;
use teloxide::types::ChatId;
use teloxide::utils::command::BotCommands;

use crate::commands::Command;

/// Handle the /start command
pub async fn handle_start(bot: Bot, msg: Message, config: &Config) -> Result<()> {
    bot.send_message(msg.chat.id, welcome_text(config)).await?;

    tracing::info!("Chat {} started the bot", msg.chat.id);

    Ok(())
}

/// Handle the /battery command
///
/// The status report always goes to the authorized user's chat, no matter
/// which chat issued the command.
pub async fn handle_battery(bot: Bot, config: &Config, sensor: SharedSensor) -> Result<()> {
    let status = sensor.read()?;

    bot.send_message(ChatId(config.authorized_user), status_text(config, status))
        .await?;

    Ok(())
}

/// Handle the /help command
pub async fn handle_help(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;

    Ok(())
}

fn welcome_text(config: &Config) -> String {
    format!(
        "Hello, I'm a battery bot @ {}.\n\
         Use /battery to check the status.\n\
         I'll update you every {} seconds if the battery level drops below {}.",
        config.hostname, config.check_frequency, config.battery_threshold
    )
}

fn status_text(config: &Config, status: BatteryStatus) -> String {
    let plugged = if status.plugged { "plugged" } else { "unplugged" };

    format!(
        "Battery of {} is at {}%. The charger is {}.",
        config.hostname, status.percent, plugged
    )
}
