//! Configuration loading
//!
//! Resolves the runtime configuration from command line flags or from the
//! `[bot]` section of an INI config file. The two sources are mutually
//! exclusive, selected by presence of `--config`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::Parser;

use crate::error::ConfigError;

/// Alert threshold in percent when `-b` is omitted.
const DEFAULT_BATTERY_THRESHOLD: u8 = 10;

/// Check frequency in seconds when `-f` is omitted.
const DEFAULT_CHECK_FREQUENCY: u64 = 60;

/// Command line arguments
///
/// Presence and numeric validation of the direct flags is delegated to
/// clap, which exits with a usage message on its own.
#[derive(Parser, Debug)]
#[command(name = "batbot", version, about = "Telegram battery notification bot")]
pub struct Cli {
    /// Telegram bot token
    #[arg(
        short = 't',
        long,
        required_unless_present = "config",
        conflicts_with = "config"
    )]
    pub telegram_token: Option<String>,

    /// Telegram user ID that receives alerts and status reports
    #[arg(
        short = 'u',
        long,
        required_unless_present = "config",
        conflicts_with = "config"
    )]
    pub telegram_user: Option<String>,

    /// Battery level alert threshold in percent [default: 10]
    #[arg(
        short = 'b',
        long,
        value_parser = clap::value_parser!(u8).range(0..=100),
        conflicts_with = "config"
    )]
    pub battery_threshold: Option<u8>,

    /// Level check frequency in seconds [default: 60]
    #[arg(short = 'f', long, conflicts_with = "config")]
    pub check_frequency: Option<u64>,

    /// Read config from an INI file with a [bot] section
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Resolved runtime configuration
///
/// Built exactly once in `main` and passed by value into the dispatcher
/// dependency map and the monitor. Read-only after construction.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Telegram bot token
    pub bot_token: String,

    /// Chat ID of the authorized user; alerts and status reports go here
    pub authorized_user: i64,

    /// Alert threshold in percent
    pub battery_threshold: u8,

    /// Periodic check frequency in seconds
    pub check_frequency: u64,

    /// Hostname named in every message, resolved from the OS
    pub hostname: String,
}

// bot_token is a credential and must never reach the logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"[redacted]")
            .field("authorized_user", &self.authorized_user)
            .field("battery_threshold", &self.battery_threshold)
            .field("check_frequency", &self.check_frequency)
            .field("hostname", &self.hostname)
            .finish()
    }
}

impl Config {
    /// Resolve configuration from parsed command line arguments.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::from_flags(cli)?,
        };

        tracing::info!("Config: {:?}", config);

        Ok(config)
    }

    /// Build from direct flags, applying defaults for the omitted ones.
    fn from_flags(cli: &Cli) -> Result<Self, ConfigError> {
        let bot_token = cli
            .telegram_token
            .clone()
            .ok_or(ConfigError::MissingKey("telegram_token"))?;
        let telegram_user = cli
            .telegram_user
            .clone()
            .ok_or(ConfigError::MissingKey("telegram_user"))?;

        Ok(Self {
            bot_token,
            authorized_user: parse_number("telegram_user", &telegram_user)?,
            battery_threshold: cli.battery_threshold.unwrap_or(DEFAULT_BATTERY_THRESHOLD),
            check_frequency: cli.check_frequency.unwrap_or(DEFAULT_CHECK_FREQUENCY),
            hostname: resolve_hostname()?,
        })
    }

    /// Build from the `[bot]` section of an INI file. All keys are required.
    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::new(
                &path.to_string_lossy(),
                config::FileFormat::Ini,
            ))
            .build()?;

        let bot_token = get_key(&settings, "telegram_token")?;
        let telegram_user = get_key(&settings, "telegram_user")?;
        let raw_threshold = get_key(&settings, "battery_threshold")?;
        let raw_frequency = get_key(&settings, "check_frequency")?;

        let battery_threshold: u8 = parse_number("battery_threshold", &raw_threshold)?;
        if battery_threshold > 100 {
            return Err(ConfigError::InvalidNumber {
                field: "battery_threshold",
                value: raw_threshold,
            });
        }

        Ok(Self {
            bot_token,
            authorized_user: parse_number("telegram_user", &telegram_user)?,
            battery_threshold,
            check_frequency: parse_number("check_frequency", &raw_frequency)?,
            hostname: resolve_hostname()?,
        })
    }
}

/// Fetch a key from the `[bot]` section, distinguishing a missing key from
/// an unreadable or malformed file.
fn get_key(settings: &config::Config, key: &'static str) -> Result<String, ConfigError> {
    settings
        .get_string(&format!("bot.{key}"))
        .map_err(|e| match e {
            config::ConfigError::NotFound(_) => ConfigError::MissingKey(key),
            other => ConfigError::File(other),
        })
}

fn parse_number<T: FromStr>(field: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Hostname as reported by the kernel.
fn resolve_hostname() -> Result<String, ConfigError> {
    let raw = fs::read_to_string("/proc/sys/kernel/hostname")
        .or_else(|_| fs::read_to_string("/etc/hostname"))
        .map_err(ConfigError::Hostname)?;

    Ok(raw.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(threshold: Option<u8>, frequency: Option<u64>) -> Cli {
        Cli {
            telegram_token: Some("123456:ABC-DEF".to_string()),
            telegram_user: Some("42".to_string()),
            battery_threshold: threshold,
            check_frequency: frequency,
            config: None,
        }
    }

    fn write_config_file(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("batbot.ini");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_flags_apply_defaults() {
        let config = Config::load(&flags(None, None)).unwrap();

        assert_eq!(config.bot_token, "123456:ABC-DEF");
        assert_eq!(config.authorized_user, 42);
        assert_eq!(config.battery_threshold, 10);
        assert_eq!(config.check_frequency, 60);
        assert!(!config.hostname.is_empty());
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = Config::load(&flags(Some(25), Some(300))).unwrap();

        assert_eq!(config.battery_threshold, 25);
        assert_eq!(config.check_frequency, 300);
    }

    #[test]
    fn test_cross_source_equivalence() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            "[bot]\n\
             telegram_token = 123456:ABC-DEF\n\
             telegram_user = 42\n\
             battery_threshold = 25\n\
             check_frequency = 300\n",
        );

        let from_file = Config::from_file(&path).unwrap();
        let from_flags = Config::from_flags(&flags(Some(25), Some(300))).unwrap();

        assert_eq!(from_file, from_flags);
    }

    #[test]
    fn test_missing_token_in_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            "[bot]\n\
             telegram_user = 42\n\
             battery_threshold = 25\n\
             check_frequency = 300\n",
        );

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey("telegram_token")));
    }

    #[test]
    fn test_non_numeric_threshold_in_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            "[bot]\n\
             telegram_token = 123456:ABC-DEF\n\
             telegram_user = 42\n\
             battery_threshold = lots\n\
             check_frequency = 300\n",
        );

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                field: "battery_threshold",
                ..
            }
        ));
    }

    #[test]
    fn test_threshold_out_of_range_in_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            "[bot]\n\
             telegram_token = 123456:ABC-DEF\n\
             telegram_user = 42\n\
             battery_threshold = 150\n\
             check_frequency = 300\n",
        );

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                field: "battery_threshold",
                ..
            }
        ));
    }

    #[test]
    fn test_non_numeric_user_from_flags() {
        let mut cli = flags(None, None);
        cli.telegram_user = Some("not-a-number".to_string());

        let err = Config::load(&cli).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                field: "telegram_user",
                ..
            }
        ));
    }

    #[test]
    fn test_unreadable_file() {
        let err = Config::from_file(Path::new("/nonexistent/batbot.ini")).unwrap_err();
        assert!(matches!(err, ConfigError::File(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config::load(&flags(None, None)).unwrap();
        let rendered = format!("{config:?}");

        assert!(!rendered.contains("ABC-DEF"));
        assert!(rendered.contains("[redacted]"));
    }

    #[test]
    fn test_cli_requires_token_and_user() {
        assert!(Cli::try_parse_from(["batbot", "-t", "123456:ABC-DEF", "-u", "42"]).is_ok());
        assert!(Cli::try_parse_from(["batbot", "-t", "123456:ABC-DEF"]).is_err());
        assert!(Cli::try_parse_from(["batbot"]).is_err());
    }

    #[test]
    fn test_cli_config_file_mode_is_exclusive() {
        assert!(Cli::try_parse_from(["batbot", "-c", "batbot.ini"]).is_ok());
        assert!(
            Cli::try_parse_from(["batbot", "-c", "batbot.ini", "-t", "123456:ABC-DEF"]).is_err()
        );
    }

    #[test]
    fn test_cli_rejects_non_numeric_flags() {
        assert!(
            Cli::try_parse_from(["batbot", "-t", "x", "-u", "42", "-b", "lots"]).is_err()
        );
        assert!(Cli::try_parse_from(["batbot", "-t", "x", "-u", "42", "-b", "150"]).is_err());
        assert!(Cli::try_parse_from(["batbot", "-t", "x", "-u", "42", "-f", "soon"]).is_err());
    }
}
