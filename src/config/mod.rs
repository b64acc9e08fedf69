//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::docker::DEFAULT_PLUGIN_ENDPOINT;
use crate::domain::{ShareUnits, DEFAULT_UNIT_PROC};
use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Device selection settings
    pub device: DeviceConfig,
    /// Share unit settings
    pub share: ShareConfig,
    /// Docker binding settings
    pub docker: DockerConfig,
}

/// General configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,
}

/// Device selection configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Restrict to these device indices
    pub visible: Option<Vec<u32>>,
    /// Target device by name (partial match)
    pub name: Option<String>,
    /// Target device by UUID
    pub uuid: Option<String>,
}

/// Share unit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Device memory per share unit, in MiB
    pub unit_memory_mib: u64,
    /// CUDA cores per share unit
    pub unit_proc: u32,
    /// Share granularity
    pub quantum: Decimal,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            unit_memory_mib: 1024,
            unit_proc: DEFAULT_UNIT_PROC,
            quantum: Decimal::new(1, 2),
        }
    }
}

impl ShareConfig {
    /// Convert to the ShareUnits domain object
    pub fn to_units(&self) -> Result<ShareUnits, DomainError> {
        ShareUnits::new(
            self.unit_memory_mib * 1024 * 1024,
            self.unit_proc,
            self.quantum,
        )
    }
}

/// Docker binding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    /// Endpoint of the nvidia-docker v1 plugin daemon
    pub nvidia_plugin_endpoint: String,
    /// Use the nvidia runtime (v2) instead of the volume plugin (v1)
    pub prefer_v2: bool,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            nvidia_plugin_endpoint: DEFAULT_PLUGIN_ENDPOINT.to_string(),
            prefer_v2: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.share.unit_memory_mib, 1024);
        assert_eq!(config.share.quantum, dec!(0.01));
        assert!(config.docker.prefer_v2);
        assert!(config.device.visible.is_none());
    }

    #[test]
    fn test_share_config_to_units() {
        let config = ShareConfig::default();
        let units = config.to_units().unwrap();
        assert_eq!(units.unit_memory, 1024 * 1024 * 1024);
        assert_eq!(units.unit_proc, DEFAULT_UNIT_PROC);
    }

    #[test]
    fn test_share_config_rejects_zero_unit() {
        let config = ShareConfig {
            unit_memory_mib: 0,
            ..ShareConfig::default()
        };
        assert!(config.to_units().is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [general]
            verbose = true

            [device]
            visible = [0, 2]

            [share]
            unit_memory_mib = 2048
            quantum = "0.25"

            [docker]
            prefer_v2 = false
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.general.verbose);
        assert_eq!(config.device.visible, Some(vec![0, 2]));
        assert_eq!(config.share.unit_memory_mib, 2048);
        assert_eq!(config.share.quantum, dec!(0.25));
        assert!(!config.docker.prefer_v2);
    }
}
