//! Configuration and settings management
//!
//! Provides the settings structs, defaults and JSON persistence.
//! Configuration is organized into logical sections:
//! - Connection settings (serial port, baud rate)
//! - Host loop settings (tick cadence)

use millstream_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serial connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Serial port device (e.g. "/dev/ttyUSB0", "COM3")
    pub port: String,
    /// Baud rate for the serial link
    pub baud_rate: u32,
    /// Read timeout in milliseconds; reads behave as polls, so this stays short
    pub timeout_ms: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: 115200,
            timeout_ms: 10,
        }
    }
}

/// Host tick loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostSettings {
    /// Interval between update ticks in milliseconds
    pub tick_interval_ms: u64,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Serial connection section
    pub connection: ConnectionSettings,
    /// Host loop section
    pub host: HostSettings,
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::settings(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| Error::settings(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Load settings from a file, falling back to defaults if it is missing
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.exists() {
            match Self::load(path) {
                Ok(settings) => return settings,
                Err(e) => {
                    tracing::warn!("Ignoring unreadable settings file: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| Error::settings(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(path, text)
            .map_err(|e| Error::settings(format!("Failed to write {}: {}", path.display(), e)))
    }
}
