//! Per-card hardware configuration, looked up by hardware descriptor.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Static description of one line card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinecardConfig {
    /// Opaque descriptor passed in `LAI_LINECARD_ATTR_HARDWARE_INFO`.
    pub hardware_info: String,

    /// Slot occupied by the card.
    pub linecard_index: u32,

    /// Ports the card exposes before any configuration is applied.
    #[serde(default = "default_ports")]
    pub default_ports: u32,

    /// Board mode the card boots in.
    #[serde(default)]
    pub board_mode: i32,
}

fn default_ports() -> u32 {
    2
}

impl LinecardConfig {
    pub fn new(hardware_info: impl Into<String>, linecard_index: u32) -> Self {
        Self {
            hardware_info: hardware_info.into(),
            linecard_index,
            default_ports: default_ports(),
            board_mode: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LinecardConfigContainer {
    configs: HashMap<String, LinecardConfig>,
}

impl LinecardConfigContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a config, returning the one it replaced.
    pub fn insert(&mut self, config: LinecardConfig) -> Option<LinecardConfig> {
        self.configs.insert(config.hardware_info.clone(), config)
    }

    pub fn get_config(&self, hardware_info: &str) -> Option<&LinecardConfig> {
        self.configs.get(hardware_info)
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LinecardConfig> {
        self.configs.values()
    }
}

impl FromIterator<LinecardConfig> for LinecardConfigContainer {
    fn from_iter<I: IntoIterator<Item = LinecardConfig>>(iter: I) -> Self {
        let mut container = Self::new();
        for config in iter {
            container.insert(config);
        }
        container
    }
}
