//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::config::{Config, ConfigFile};

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from a file
    pub fn with_file(mut self, path: Option<&str>) -> Self {
        let file_config = if let Some(path) = path {
            ConfigFile::load(path).ok()
        } else {
            ConfigFile::load_default()
        };

        if let Some(cfg) = file_config {
            self.config = cfg;
        }

        self
    }

    /// Override with CLI verbose flag
    pub fn with_verbose(mut self, verbose: Option<bool>) -> Self {
        if let Some(v) = verbose {
            self.config.general.verbose = v;
        }
        self
    }

    /// Override with CLI visible-device list
    pub fn with_visible_devices(mut self, devices: Option<Vec<u32>>) -> Self {
        if let Some(d) = devices {
            self.config.device.visible = Some(d);
        }
        self
    }

    /// Override with CLI device name
    pub fn with_device_name(mut self, name: Option<String>) -> Self {
        if let Some(n) = name {
            self.config.device.name = Some(n);
        }
        self
    }

    /// Override with CLI device UUID
    pub fn with_device_uuid(mut self, uuid: Option<String>) -> Self {
        if let Some(u) = uuid {
            self.config.device.uuid = Some(u);
        }
        self
    }

    /// Override with CLI plugin endpoint
    pub fn with_plugin_endpoint(mut self, endpoint: Option<String>) -> Self {
        if let Some(e) = endpoint {
            self.config.docker.nvidia_plugin_endpoint = e;
        }
        self
    }

    /// Override the v1/v2 binding preference
    pub fn with_prefer_v2(mut self, prefer_v2: Option<bool>) -> Self {
        if let Some(p) = prefer_v2 {
            self.config.docker.prefer_v2 = p;
        }
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ConfigBuilder::new().build();
        assert!(!config.general.verbose);
        assert!(config.docker.prefer_v2);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ConfigBuilder::new()
            .with_verbose(Some(true))
            .with_visible_devices(Some(vec![0, 1]))
            .with_prefer_v2(Some(false))
            .build();

        assert!(config.general.verbose);
        assert_eq!(config.device.visible, Some(vec![0, 1]));
        assert!(!config.docker.prefer_v2);
    }

    #[test]
    fn test_builder_none_keeps_existing() {
        let config = ConfigBuilder::new()
            .with_visible_devices(None)
            .with_device_name(None)
            .build();

        assert!(config.device.visible.is_none());
        assert!(config.device.name.is_none());
    }
}
