//! CUDA accelerator implementation
//!
//! Bridges the NVML detection layer to the accelerator contract: masked
//! enumeration, share capacity per device, and container bindings for
//! both nvidia-docker generations.

use crate::accel::traits::Accelerator;
use crate::docker::{ContainerBinding, NvidiaDockerClient};
use crate::domain::{DeviceInfo, DeviceShareMap, ShareUnits, SlotKey};
use crate::error::{AppError, DomainError, Result};
use crate::nvml::GpuManager;
use crate::services::DiscoveryService;

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Slot key this plugin registers under
pub const CUDA_SLOT_KEY: &str = "cuda";

/// CUDA accelerator over any device manager
pub struct CudaAccelerator<M> {
    manager: M,
    units: ShareUnits,
    discovery: DiscoveryService,
    prefer_v2: bool,
    plugin_client: NvidiaDockerClient,
}

impl<M: GpuManager> CudaAccelerator<M> {
    /// Create an accelerator with default units and no device mask
    pub fn new(manager: M) -> Self {
        Self {
            manager,
            units: ShareUnits::default(),
            discovery: DiscoveryService::new(),
            prefer_v2: true,
            plugin_client: NvidiaDockerClient::local(),
        }
    }

    /// Set the share unit definition
    pub fn with_units(mut self, units: ShareUnits) -> Self {
        self.units = units;
        self
    }

    /// Restrict enumeration to the given device indices
    pub fn with_visible_mask(mut self, mask: Option<Vec<u32>>) -> Self {
        self.discovery = DiscoveryService::new().with_visible_mask(mask);
        self
    }

    /// Choose between the nvidia runtime (v2) and the volume plugin (v1)
    pub fn with_prefer_v2(mut self, prefer_v2: bool) -> Self {
        self.prefer_v2 = prefer_v2;
        self
    }

    /// Set the v1 plugin daemon client
    pub fn with_plugin_client(mut self, client: NvidiaDockerClient) -> Self {
        self.plugin_client = client;
        self
    }

    /// The share unit definition in effect
    pub fn units(&self) -> &ShareUnits {
        &self.units
    }

    /// The underlying device manager
    pub fn manager(&self) -> &M {
        &self.manager
    }

    /// Enumerate devices together with their share capacity
    pub fn device_shares(&self) -> Result<Vec<(DeviceInfo, Decimal)>> {
        let devices = self.list_devices()?;
        Ok(devices
            .into_iter()
            .map(|info| {
                let share = self.units.device_share(&info);
                (info, share)
            })
            .collect())
    }
}

#[async_trait]
impl<M: GpuManager> Accelerator for CudaAccelerator<M> {
    fn slot_key(&self) -> SlotKey {
        SlotKey::from(CUDA_SLOT_KEY)
    }

    fn list_devices(&self) -> Result<Vec<DeviceInfo>> {
        self.discovery.discover(&self.manager)
    }

    async fn container_binding(&self, allocation: &DeviceShareMap) -> Result<ContainerBinding> {
        let devices = self.list_devices()?;
        let by_id: HashMap<u32, &DeviceInfo> = devices
            .iter()
            .map(|info| (info.device_id.index(), info))
            .collect();

        let mut ids = Vec::with_capacity(allocation.len());
        let mut uuids = Vec::with_capacity(allocation.len());

        for (device_id, share) in allocation.iter() {
            if share <= Decimal::ZERO {
                continue;
            }
            let info = by_id
                .get(&device_id.index())
                .ok_or(DomainError::UnknownDevice(device_id.index()))?;
            ids.push(device_id.to_string());
            uuids.push(info.uuid.clone());
        }

        if self.prefer_v2 {
            return Ok(ContainerBinding::v2(&uuids, &ids));
        }

        let params = self
            .plugin_client
            .cli_params()
            .await
            .map_err(AppError::Docker)?;

        let (mut device_nodes, per_gpu) = params.split_devices();
        for node in per_gpu {
            if gpu_node_index(&node).is_some_and(|idx| ids.iter().any(|id| id == &idx)) {
                device_nodes.push(node);
            }
        }

        Ok(ContainerBinding::v1(
            params.volume_driver,
            params.volumes,
            device_nodes,
            &ids,
        ))
    }
}

/// Numeric suffix of a /dev/nvidiaN node, as a string
fn gpu_node_index(path: &str) -> Option<String> {
    path.rsplit('/')
        .next()
        .and_then(|name| name.strip_prefix("nvidia"))
        .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()))
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DeviceId;
    use crate::mock::MockManager;
    use rust_decimal_macros::dec;

    #[test]
    fn test_slot_key() {
        let accel = CudaAccelerator::new(MockManager::new(1));
        assert_eq!(accel.slot_key().as_str(), "cuda");
    }

    #[test]
    fn test_list_devices_unmasked() {
        let accel = CudaAccelerator::new(MockManager::new(3));
        let devices = accel.list_devices().unwrap();
        assert_eq!(devices.len(), 3);
        assert_eq!(devices[2].device_id, DeviceId::new(2));
    }

    #[test]
    fn test_list_devices_masked() {
        let accel =
            CudaAccelerator::new(MockManager::new(4)).with_visible_mask(Some(vec![0, 2]));
        let devices = accel.list_devices().unwrap();

        let ids: Vec<u32> = devices.iter().map(|d| d.device_id.index()).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn test_device_shares() {
        // Mock devices report 16 GiB / 3584 cores: memory is the binding
        // factor at 1 GiB + 128 cores per unit.
        let accel = CudaAccelerator::new(MockManager::new(1));
        let shares = accel.device_shares().unwrap();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].1, dec!(16.00));
    }

    #[tokio::test]
    async fn test_v2_binding_from_allocation() {
        let accel = CudaAccelerator::new(MockManager::new(2));

        let mut allocation = DeviceShareMap::new();
        allocation.add(DeviceId::new(1), dec!(0.5));

        let binding = accel.container_binding(&allocation).await.unwrap();
        assert_eq!(binding.env_value("CUDA_VISIBLE_DEVICES"), Some("1"));
        assert_eq!(binding.env_value("NVIDIA_VISIBLE_DEVICES"), Some("GPU-MOCK-0001"));
        assert_eq!(binding.runtime.as_deref(), Some("nvidia"));
    }

    #[tokio::test]
    async fn test_binding_rejects_masked_device() {
        let accel =
            CudaAccelerator::new(MockManager::new(2)).with_visible_mask(Some(vec![0]));

        let mut allocation = DeviceShareMap::new();
        allocation.add(DeviceId::new(1), dec!(1));

        let err = accel.container_binding(&allocation).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::UnknownDevice(1))
        ));
    }

    #[tokio::test]
    async fn test_empty_allocation_blocks_all() {
        let accel = CudaAccelerator::new(MockManager::new(2));
        let binding = accel
            .container_binding(&DeviceShareMap::new())
            .await
            .unwrap();
        assert_eq!(binding.env_value("CUDA_VISIBLE_DEVICES"), Some(""));
        assert_eq!(binding.env_value("NVIDIA_VISIBLE_DEVICES"), Some("void"));
    }

    #[test]
    fn test_gpu_node_index() {
        assert_eq!(gpu_node_index("/dev/nvidia0"), Some("0".to_string()));
        assert_eq!(gpu_node_index("/dev/nvidia15"), Some("15".to_string()));
        assert_eq!(gpu_node_index("/dev/nvidiactl"), None);
        assert_eq!(gpu_node_index("/dev/nvidia-uvm"), None);
    }
}
