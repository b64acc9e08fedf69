//! Mock implementations for testing
//!
//! Provides mock device and manager for unit testing without real hardware.

use crate::domain::{ComputeCapability, MemorySize};
use crate::error::NvmlError;
use crate::nvml::{GpuDevice, GpuManager};

/// Mock CUDA device for testing
#[derive(Debug, Clone)]
pub struct MockDevice {
    index: u32,
    name: String,
    uuid: String,
    memory: MemorySize,
    pci_bus_id: String,
    numa_node: Option<u32>,
    processing_units: u32,
    compute_capability: Option<ComputeCapability>,
}

impl MockDevice {
    /// Create a new mock device with default values
    pub fn new(index: u32) -> Self {
        Self {
            index,
            name: format!("Mock GPU {}", index),
            uuid: format!("GPU-MOCK-{:04}", index),
            memory: MemorySize::from_gib(16),
            pci_bus_id: format!("00000000:{:02X}:00.0", index + 1),
            numa_node: Some(0),
            processing_units: 3584,
            compute_capability: Some(ComputeCapability::new(7, 0)),
        }
    }

    /// Builder: set name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder: set UUID
    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = uuid.into();
        self
    }

    /// Builder: set memory size
    pub fn with_memory(mut self, memory: MemorySize) -> Self {
        self.memory = memory;
        self
    }

    /// Builder: set processing unit count
    pub fn with_processing_units(mut self, units: u32) -> Self {
        self.processing_units = units;
        self
    }

    /// Builder: set NUMA node
    pub fn with_numa_node(mut self, node: Option<u32>) -> Self {
        self.numa_node = node;
        self
    }
}

impl GpuDevice for MockDevice {
    fn index(&self) -> u32 {
        self.index
    }

    fn name(&self) -> Result<String, NvmlError> {
        Ok(self.name.clone())
    }

    fn uuid(&self) -> Result<String, NvmlError> {
        Ok(self.uuid.clone())
    }

    fn memory_total(&self) -> Result<MemorySize, NvmlError> {
        Ok(self.memory)
    }

    fn pci_bus_id(&self) -> Result<String, NvmlError> {
        Ok(self.pci_bus_id.clone())
    }

    fn numa_node(&self) -> Result<Option<u32>, NvmlError> {
        Ok(self.numa_node)
    }

    fn processing_units(&self) -> Result<u32, NvmlError> {
        Ok(self.processing_units)
    }

    fn compute_capability(&self) -> Result<Option<ComputeCapability>, NvmlError> {
        Ok(self.compute_capability)
    }
}

/// Mock device manager for testing
pub struct MockManager {
    devices: Vec<MockDevice>,
    driver_version: String,
    nvml_version: String,
    cuda_version: (u32, u32),
}

impl MockManager {
    /// Create a new mock manager with the specified number of devices
    pub fn new(device_count: u32) -> Self {
        let devices = (0..device_count).map(MockDevice::new).collect();

        Self {
            devices,
            driver_version: "418.39".to_string(),
            nvml_version: "10.418.39".to_string(),
            cuda_version: (10, 1),
        }
    }

    /// Create a mock manager with custom devices
    pub fn with_devices(devices: Vec<MockDevice>) -> Self {
        Self {
            devices,
            driver_version: "418.39".to_string(),
            nvml_version: "10.418.39".to_string(),
            cuda_version: (10, 1),
        }
    }

    /// Builder: set the reported driver version
    pub fn with_driver_version(mut self, version: impl Into<String>) -> Self {
        self.driver_version = version.into();
        self
    }

    /// Builder: set the reported CUDA version
    pub fn with_cuda_version(mut self, version: (u32, u32)) -> Self {
        self.cuda_version = version;
        self
    }
}

impl GpuManager for MockManager {
    type Device = MockDevice;

    fn device_count(&self) -> Result<u32, NvmlError> {
        Ok(self.devices.len() as u32)
    }

    fn device_by_index(&self, index: u32) -> Result<Self::Device, NvmlError> {
        self.devices
            .get(index as usize)
            .cloned()
            .ok_or(NvmlError::DeviceNotFound(index))
    }

    fn device_by_uuid(&self, uuid: &str) -> Result<Self::Device, NvmlError> {
        self.devices
            .iter()
            .find(|d| d.uuid == uuid)
            .cloned()
            .ok_or_else(|| NvmlError::DeviceNotFoundByUuid(uuid.to_string()))
    }

    fn device_by_name(&self, name: &str) -> Result<Self::Device, NvmlError> {
        let name_lower = name.to_lowercase();
        self.devices
            .iter()
            .find(|d| d.name.to_lowercase().contains(&name_lower))
            .cloned()
            .ok_or_else(|| NvmlError::Unknown(format!("No device found matching: {}", name)))
    }

    fn driver_version(&self) -> Result<String, NvmlError> {
        Ok(self.driver_version.clone())
    }

    fn nvml_version(&self) -> Result<String, NvmlError> {
        Ok(self.nvml_version.clone())
    }

    fn cuda_driver_version(&self) -> Result<(u32, u32), NvmlError> {
        Ok(self.cuda_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_device_creation() {
        let device = MockDevice::new(0);
        assert_eq!(device.index(), 0);
        assert_eq!(device.uuid().unwrap(), "GPU-MOCK-0000");
        assert_eq!(device.memory_total().unwrap().as_mib(), 16 * 1024);
    }

    #[test]
    fn test_mock_device_builder() {
        let device = MockDevice::new(1)
            .with_name("Mock V100")
            .with_memory(MemorySize::from_gib(32))
            .with_numa_node(None);

        assert_eq!(device.name().unwrap(), "Mock V100");
        assert_eq!(device.memory_total().unwrap().as_mib(), 32 * 1024);
        assert_eq!(device.numa_node().unwrap(), None);
    }

    #[test]
    fn test_mock_manager_device_count() {
        let manager = MockManager::new(2);
        assert_eq!(manager.device_count().unwrap(), 2);
    }

    #[test]
    fn test_mock_manager_device_by_index() {
        let manager = MockManager::new(2);
        assert_eq!(manager.device_by_index(1).unwrap().index(), 1);
        assert!(manager.device_by_index(5).is_err());
    }

    #[test]
    fn test_mock_manager_device_by_uuid() {
        let manager = MockManager::new(2);
        let device = manager.device_by_uuid("GPU-MOCK-0001").unwrap();
        assert_eq!(device.index(), 1);

        assert!(manager.device_by_uuid("GPU-INVALID").is_err());
    }

    #[test]
    fn test_mock_manager_device_by_name() {
        let manager = MockManager::new(2);
        let device = manager.device_by_name("gpu 0").unwrap();
        assert_eq!(device.index(), 0);
    }

    #[test]
    fn test_mock_manager_all_devices() {
        let manager = MockManager::new(3);
        assert_eq!(manager.all_devices().unwrap().len(), 3);
    }

    #[test]
    fn test_mock_device_info() {
        let manager = MockManager::new(1);
        let info = manager.device_by_index(0).unwrap().info().unwrap();

        assert_eq!(info.device_id.index(), 0);
        assert_eq!(info.numa_node, Some(0));
        assert_eq!(info.processing_units, 3584);
        assert!(info.compute_capability.is_some());
    }
}
