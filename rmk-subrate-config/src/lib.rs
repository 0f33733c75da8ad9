use std::path::Path;

use serde_derive::Deserialize;
use serde_inline_default::serde_inline_default;

pub mod defaults;
pub mod error;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use validation::validate_config;

/// Top-level view of a keyboard config file, only the `[subrate]` section is read.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SubrateTomlFile {
    #[serde(default)]
    pub subrate: SubrateTomlConfig,
}

/// `[subrate]` section
#[serde_inline_default]
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SubrateTomlConfig {
    /// Supervision timeout shared by all tiers, in 10ms units
    #[serde_inline_default(defaults::SUPERVISION_TIMEOUT)]
    pub supervision_timeout: u16,
    /// Idle dwell time before the dormant tier is entered
    #[serde_inline_default(defaults::DORMANT_DELAY_MS)]
    pub dormant_delay_ms: u32,
    /// Whether split peripherals request the fast ACTIVE profile on local activity
    #[serde_inline_default(defaults::PERIPHERAL_FAST_ACTIVE)]
    pub peripheral_fast_active: bool,
    #[serde_inline_default(TierTomlConfig::from(defaults::ACTIVE_TIER))]
    pub active: TierTomlConfig,
    #[serde_inline_default(TierTomlConfig::from(defaults::IDLE_TIER))]
    pub idle: TierTomlConfig,
    #[serde_inline_default(TierTomlConfig::from(defaults::DORMANT_TIER))]
    pub dormant: TierTomlConfig,
    /// Host connection parameters used while dormant, setting it enables the host parameter split
    pub host_dormant: Option<HostConnTomlConfig>,
    /// Host connection parameters restored when leaving dormant
    pub host_active: Option<HostConnTomlConfig>,
}

/// This separate Default impl is needed when `[subrate]` section is not set
impl Default for SubrateTomlConfig {
    fn default() -> Self {
        Self {
            supervision_timeout: defaults::SUPERVISION_TIMEOUT,
            dormant_delay_ms: defaults::DORMANT_DELAY_MS,
            peripheral_fast_active: defaults::PERIPHERAL_FAST_ACTIVE,
            active: defaults::ACTIVE_TIER.into(),
            idle: defaults::IDLE_TIER.into(),
            dormant: defaults::DORMANT_TIER.into(),
            host_dormant: None,
            host_active: None,
        }
    }
}

impl SubrateTomlConfig {
    /// Host parameters applied when leaving dormant, falling back to the stack's preferred ones
    pub fn host_active_or_default(&self) -> HostConnTomlConfig {
        self.host_active.clone().unwrap_or_else(|| defaults::HOST_ACTIVE.into())
    }
}

/// Subrate parameters of a single tier
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TierTomlConfig {
    pub min: u16,
    pub max: u16,
    pub max_latency: u16,
    pub continuation_number: u16,
}

impl From<(u16, u16, u16, u16)> for TierTomlConfig {
    fn from((min, max, max_latency, continuation_number): (u16, u16, u16, u16)) -> Self {
        Self {
            min,
            max,
            max_latency,
            continuation_number,
        }
    }
}

/// Connection parameters requested on host links
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HostConnTomlConfig {
    /// 1.25ms units
    pub interval_min: u16,
    /// 1.25ms units
    pub interval_max: u16,
    pub latency: u16,
    /// 10ms units
    pub timeout: u16,
}

impl From<(u16, u16, u16, u16)> for HostConnTomlConfig {
    fn from((interval_min, interval_max, latency, timeout): (u16, u16, u16, u16)) -> Self {
        Self {
            interval_min,
            interval_max,
            latency,
            timeout,
        }
    }
}

impl SubrateTomlFile {
    /// Parse a config string, `path` is used for error messages only.
    pub fn from_toml_str(content: &str, path: &str) -> ConfigResult<Self> {
        toml::from_str::<SubrateTomlFile>(content).map_err(|e| ConfigError::TomlParse {
            path: path.to_string(),
            message: e.message().to_string(),
        })
    }

    /// Read and parse a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path_str = path.as_ref().display().to_string();
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead {
            path: path_str.clone(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content, &path_str)
    }
}
