//! Device discovery service
//!
//! Enumerates detection records from a device manager, honoring the
//! configured visible-device mask.

use crate::domain::DeviceInfo;
use crate::error::{AppError, Result};
use crate::nvml::{GpuDevice, GpuManager};

/// Discovery service over a device manager
pub struct DiscoveryService {
    visible: Option<Vec<u32>>,
}

impl DiscoveryService {
    /// Create a discovery service without a mask
    pub fn new() -> Self {
        Self { visible: None }
    }

    /// Restrict discovery to the given device indices
    pub fn with_visible_mask(mut self, mask: Option<Vec<u32>>) -> Self {
        self.visible = mask;
        self
    }

    /// Enumerate all visible devices
    pub fn discover<M: GpuManager>(&self, manager: &M) -> Result<Vec<DeviceInfo>> {
        let count = manager.device_count()?;
        let mut devices = Vec::with_capacity(count as usize);

        for i in 0..count {
            if let Some(mask) = &self.visible {
                if !mask.contains(&i) {
                    log::debug!("Device {} masked out by configuration", i);
                    continue;
                }
            }
            let device = manager.device_by_index(i)?;
            devices.push(device.info()?);
        }

        Ok(devices)
    }

    /// Enumerate devices, erroring when none are visible
    pub fn discover_nonempty<M: GpuManager>(&self, manager: &M) -> Result<Vec<DeviceInfo>> {
        let devices = self.discover(manager)?;
        if devices.is_empty() {
            return Err(AppError::NoDevicesFound);
        }
        Ok(devices)
    }
}

impl Default for DiscoveryService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockManager;

    #[test]
    fn test_discover_all() {
        let manager = MockManager::new(2);
        let devices = DiscoveryService::new().discover(&manager).unwrap();
        assert_eq!(devices.len(), 2);
    }

    #[test]
    fn test_discover_masked() {
        let manager = MockManager::new(4);
        let devices = DiscoveryService::new()
            .with_visible_mask(Some(vec![1, 3]))
            .discover(&manager)
            .unwrap();

        let ids: Vec<u32> = devices.iter().map(|d| d.device_id.index()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_discover_nonempty_fails_on_full_mask() {
        let manager = MockManager::new(2);
        let result = DiscoveryService::new()
            .with_visible_mask(Some(vec![]))
            .discover_nonempty(&manager);

        assert!(matches!(result, Err(AppError::NoDevicesFound)));
    }
}
