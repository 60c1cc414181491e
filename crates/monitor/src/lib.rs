//! Batbot Monitor - Periodic battery check
//!
//! Samples the battery on a fixed interval and alerts the authorized user
//! while the charge is below the configured threshold with the charger
//! unplugged.

use anyhow::Result;
use batbot_core::{BatteryStatus, Config, SharedSensor};
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Run the periodic battery check
///
/// The first check fires immediately, then every `check_frequency` seconds
/// until cancelled. An alert repeats on every qualifying tick; there is no
/// de-duplication or backoff. Sensor or send failures abort the loop - the
/// utility has no retry policy.
///
/// # Arguments
/// * `bot` - Telegram bot instance for sending alerts
/// * `config` - Resolved runtime configuration
/// * `sensor` - Battery sensor handle
/// * `shutdown` - Optional cancellation token for graceful shutdown
pub async fn run_monitor(
    bot: Bot,
    config: Config,
    sensor: SharedSensor,
    shutdown: Option<CancellationToken>,
) -> Result<()> {
    let period = Duration::from_secs(config.check_frequency);

    info!(
        "Starting monitor: threshold={}%, check_frequency={}s",
        config.battery_threshold, config.check_frequency
    );

    loop {
        // Check for shutdown signal
        if let Some(ref token) = shutdown
            && token.is_cancelled()
        {
            info!("Monitor received shutdown signal");
            break;
        }

        check_battery(&bot, &config, &sensor).await?;

        match &shutdown {
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => {}
                    _ = tokio::time::sleep(period) => {}
                }
            }
            None => tokio::time::sleep(period).await,
        }
    }

    Ok(())
}

/// Run one check, alerting the authorized user when needed
async fn check_battery(bot: &Bot, config: &Config, sensor: &SharedSensor) -> Result<()> {
    let status = sensor.read()?;

    if should_alert(status, config.battery_threshold) {
        bot.send_message(ChatId(config.authorized_user), alert_text(config, status))
            .await?;
    }

    Ok(())
}

/// An alert fires only while the host runs on battery below the threshold.
fn should_alert(status: BatteryStatus, threshold: u8) -> bool {
    !status.plugged && status.percent < threshold
}

fn alert_text(config: &Config, status: BatteryStatus) -> String {
    format!("Battery of {} is at {}%", config.hostname, status.percent)
}
