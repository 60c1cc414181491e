//! Batbot Core - Domain logic for the battery notification bot
//!
//! This crate contains configuration loading, the battery sensor and the
//! error types. It has no Telegram dependency.

pub mod battery;
pub mod config;
pub mod error;

pub use battery::{BatterySensor, BatteryStatus, SharedSensor, SysfsBattery};
pub use config::{Cli, Config};
pub use error::{BatteryError, ConfigError};
