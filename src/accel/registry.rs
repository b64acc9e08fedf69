//! Accelerator registry
//!
//! The host agent discovers accelerator implementations by key at
//! startup. Registration replaces any previous entry under the same key.

use crate::accel::cuda::{CudaAccelerator, CUDA_SLOT_KEY};
use crate::accel::traits::Accelerator;
use crate::config::Config;
use crate::docker::NvidiaDockerClient;
use crate::error::{AppError, Result};
use crate::nvml::NvmlManager;

use std::collections::HashMap;
use std::sync::Arc;

/// Registry of accelerator implementations by key
#[derive(Default)]
pub struct AcceleratorRegistry {
    entries: HashMap<String, Arc<dyn Accelerator>>,
}

impl AcceleratorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an accelerator under a key, replacing any previous entry
    pub fn register(&mut self, key: impl Into<String>, accel: Arc<dyn Accelerator>) {
        let key = key.into();
        if self.entries.insert(key.clone(), accel).is_some() {
            log::warn!("Replacing accelerator registered under '{}'", key);
        }
    }

    /// Look up an accelerator by key
    pub fn get(&self, key: &str) -> Option<Arc<dyn Accelerator>> {
        self.entries.get(key).cloned()
    }

    /// Look up an accelerator by key, erroring when absent
    pub fn require(&self, key: &str) -> Result<Arc<dyn Accelerator>> {
        self.get(key)
            .ok_or_else(|| AppError::UnknownAccelerator(key.to_string()))
    }

    /// Registered keys, unordered
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}

/// Initialize the registry with the CUDA accelerator
///
/// This is the plugin entry point the host agent invokes once at startup.
pub async fn init(config: &Config) -> Result<AcceleratorRegistry> {
    let manager = NvmlManager::new()?;

    let accel = CudaAccelerator::new(manager)
        .with_units(config.share.to_units()?)
        .with_visible_mask(config.device.visible.clone())
        .with_prefer_v2(config.docker.prefer_v2)
        .with_plugin_client(NvidiaDockerClient::new(&config.docker.nvidia_plugin_endpoint));

    let mut registry = AcceleratorRegistry::new();
    registry.register(CUDA_SLOT_KEY, Arc::new(accel));

    log::info!("Registered accelerator '{}'", CUDA_SLOT_KEY);
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockManager;

    fn mock_accel(count: u32) -> Arc<dyn Accelerator> {
        Arc::new(CudaAccelerator::new(MockManager::new(count)))
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = AcceleratorRegistry::new();
        registry.register("cuda", mock_accel(1));

        assert!(registry.get("cuda").is_some());
        assert!(registry.get("rocm").is_none());
    }

    #[test]
    fn test_require_unknown_key() {
        let registry = AcceleratorRegistry::new();
        let err = match registry.require("cuda") {
            Ok(_) => panic!("expected require to fail for unknown key"),
            Err(e) => e,
        };
        assert!(matches!(err, AppError::UnknownAccelerator(_)));
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = AcceleratorRegistry::new();
        registry.register("cuda", mock_accel(1));
        registry.register("cuda", mock_accel(2));

        let accel = registry.get("cuda").unwrap();
        assert_eq!(accel.list_devices().unwrap().len(), 2);
    }
}
