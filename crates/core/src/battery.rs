//! Battery sensor
//!
//! Reads charge level and charger state from the kernel power supply
//! class (`/sys/class/power_supply`).

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::BatteryError;

/// Default sysfs mount point for power supply devices.
const SYSFS_POWER_SUPPLY: &str = "/sys/class/power_supply";

/// A single battery reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryStatus {
    /// Whether external power is connected
    pub plugged: bool,

    /// Charge percentage, clamped to 0-100
    pub percent: u8,
}

/// Read access to the host battery.
///
/// Handlers and the monitor take the sensor through this trait so tests
/// can substitute a stub reading.
pub trait BatterySensor: Send + Sync {
    /// Read the current battery status.
    fn read(&self) -> Result<BatteryStatus, BatteryError>;
}

/// Shared sensor handle for the dispatcher dependency map.
pub type SharedSensor = Arc<dyn BatterySensor>;

/// Sensor backed by the kernel power supply class.
#[derive(Debug, Clone)]
pub struct SysfsBattery {
    root: PathBuf,
}

impl SysfsBattery {
    /// Sensor over the default sysfs mount point.
    pub fn new() -> Self {
        Self {
            root: PathBuf::from(SYSFS_POWER_SUPPLY),
        }
    }

    /// Sensor over an alternate root directory. Used by tests.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// First `BAT*` entry under the root, or `Unavailable` when the host
    /// has no battery (desktop hardware).
    fn battery_dir(&self) -> Result<PathBuf, BatteryError> {
        let entries = fs::read_dir(&self.root).map_err(|_| BatteryError::Unavailable)?;

        for entry in entries.flatten() {
            if entry.file_name().to_string_lossy().starts_with("BAT") {
                return Ok(entry.path());
            }
        }

        Err(BatteryError::Unavailable)
    }
}

impl Default for SysfsBattery {
    fn default() -> Self {
        Self::new()
    }
}

impl BatterySensor for SysfsBattery {
    fn read(&self) -> Result<BatteryStatus, BatteryError> {
        let dir = self.battery_dir()?;

        let capacity = fs::read_to_string(dir.join("capacity"))?;
        let status = fs::read_to_string(dir.join("status"))?;

        let percent: u8 = capacity
            .trim()
            .parse()
            .map_err(|_| BatteryError::Malformed(capacity.trim().to_string()))?;

        // The kernel reports Charging, Discharging, Not charging, Full or
        // Unknown; only Discharging means the host runs on battery.
        let plugged = status.trim() != "Discharging";

        let reading = BatteryStatus {
            plugged,
            percent: percent.min(100),
        };

        tracing::info!("Battery plugged: {} percent: {}", reading.plugged, reading.percent);

        Ok(reading)
    }
}
