//! Bot command definitions
//!
//! Defines all Telegram bot commands and their parsing logic

use teloxide::utils::command::BotCommands;

/// All bot commands
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Battery bot commands:")]
pub enum Command {
    #[command(description = "Start the bot and see welcome message")]
    Start,

    #[command(description = "Report the current battery status")]
    Battery,

    #[command(description = "Show help message")]
    Help,
}
