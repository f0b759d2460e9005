//! Ingestion configuration.
//!
//! Loaded from ~/.config/royale/config.toml; a missing file yields the
//! defaults, and the CLI can override any field per invocation.

use std::path::PathBuf;

use chrono::Duration;
use chrono_tz::Tz;
use config::{Config, File};
use serde::Deserialize;

use crate::error::{RoyaleError, RoyaleResult};
use crate::sync::DEFAULT_BATCH_SIZE;
use crate::window::{DEFAULT_BUFFER_MINUTES, DEFAULT_HORIZON_DAYS, WindowPolicy};

/// Which window policy the ingestion run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    Strict,
    Relaxed,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Reference timezone for window bounds and display formatting.
    pub timezone: Tz,
    pub window: WindowMode,
    pub buffer_minutes: i64,
    pub horizon_days: i64,
    pub batch_size: usize,
    /// Target collection in the document store.
    pub collection: String,
    /// Store backend name (resolved to a `royale-store-<name>` binary).
    pub store: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            timezone: chrono_tz::America::New_York,
            window: WindowMode::Strict,
            buffer_minutes: DEFAULT_BUFFER_MINUTES,
            horizon_days: DEFAULT_HORIZON_DAYS,
            batch_size: DEFAULT_BATCH_SIZE,
            collection: "classSchedules".to_string(),
            store: "file".to_string(),
        }
    }
}

impl IngestConfig {
    pub fn config_path() -> RoyaleResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| RoyaleError::Config("Could not determine config directory".into()))?
            .join("royale");

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> RoyaleResult<Self> {
        let config_path = Self::config_path()?;

        Config::builder()
            .add_source(File::from(config_path).required(false))
            .build()
            .map_err(|e| RoyaleError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| RoyaleError::Config(e.to_string()))
    }

    pub fn window_policy(&self) -> WindowPolicy {
        match self.window {
            WindowMode::Strict => WindowPolicy::Strict {
                buffer: Duration::minutes(self.buffer_minutes),
                horizon: Duration::days(self.horizon_days),
            },
            WindowMode::Relaxed => WindowPolicy::Relaxed {
                horizon_days: self.horizon_days,
            },
        }
    }
}
