//! syncd configuration file.
//!
//! ```toml
//! global_context = 0
//!
//! [board_mode]
//! poll_interval_ms = 1000
//! max_attempts = 600
//!
//! [[linecards]]
//! hardware_info = "P230C"
//! linecard_index = 1
//! default_ports = 4
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sonic_lai::oid::GLOBAL_CONTEXT_MAX;
use sonic_lai_vs::{LinecardConfig, LinecardConfigContainer};

use crate::error::{Result, SyncdError};

/// Board-mode convergence polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardModeConfig {
    /// Delay between read-backs, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Read-backs before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncdConfig {
    /// Execution domain stamped into every object id.
    #[serde(default)]
    pub global_context: u32,

    #[serde(default)]
    pub board_mode: BoardModeConfig,

    #[serde(default)]
    pub linecards: Vec<LinecardConfig>,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_attempts() -> u32 {
    600
}

impl Default for BoardModeConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl BoardModeConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl SyncdConfig {
    /// Loads and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content).map_err(|e| {
            SyncdError::config(format!("{}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| SyncdError::config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SyncdError::config(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if u64::from(self.global_context) > GLOBAL_CONTEXT_MAX {
            return Err(SyncdError::config(format!(
                "global_context {} exceeds {}",
                self.global_context, GLOBAL_CONTEXT_MAX
            )));
        }

        let mut seen = HashSet::new();
        for linecard in &self.linecards {
            if !seen.insert(linecard.hardware_info.as_str()) {
                return Err(SyncdError::config(format!(
                    "duplicate linecard hardware_info '{}'",
                    linecard.hardware_info
                )));
            }
        }

        Ok(())
    }

    /// Hardware descriptor lookup handed to the id allocator.
    pub fn linecard_container(&self) -> LinecardConfigContainer {
        self.linecards.iter().cloned().collect()
    }
}
