//! Trait definitions for device detection
//!
//! These traits abstract over NVML to enable testing with mocks.

use crate::domain::{ComputeCapability, DeviceId, DeviceInfo, MemorySize};
use crate::error::NvmlError;

/// Trait for a single CUDA device
///
/// This trait abstracts the per-device queries needed for detection,
/// allowing for mock implementations in tests while using real NVML
/// in production.
pub trait GpuDevice: Send + Sync {
    /// Get the device index
    fn index(&self) -> u32;

    /// Get the device model name
    fn name(&self) -> Result<String, NvmlError>;

    /// Get the device UUID
    fn uuid(&self) -> Result<String, NvmlError>;

    /// Get total device memory
    fn memory_total(&self) -> Result<MemorySize, NvmlError>;

    /// Get the PCI bus id
    fn pci_bus_id(&self) -> Result<String, NvmlError>;

    /// Get the NUMA node the device is attached to
    ///
    /// Returns `Ok(None)` when the platform does not expose NUMA affinity
    /// for this device.
    fn numa_node(&self) -> Result<Option<u32>, NvmlError>;

    /// Get the number of CUDA cores
    fn processing_units(&self) -> Result<u32, NvmlError>;

    /// Get the CUDA compute capability
    ///
    /// Returns `Ok(None)` when the driver does not report it.
    fn compute_capability(&self) -> Result<Option<ComputeCapability>, NvmlError>;

    /// Build the aggregate detection record for this device
    fn info(&self) -> Result<DeviceInfo, NvmlError> {
        let mut info = DeviceInfo::new(
            DeviceId::new(self.index()),
            self.name()?,
            self.uuid()?,
        )
        .with_memory_size(self.memory_total()?)
        .with_processing_units(self.processing_units()?);

        if let Ok(bus_id) = self.pci_bus_id() {
            info = info.with_hw_location(bus_id);
        }
        if let Ok(node) = self.numa_node() {
            info = info.with_numa_node(node);
        }
        if let Ok(Some(cc)) = self.compute_capability() {
            info = info.with_compute_capability(cc);
        }

        Ok(info)
    }
}

/// Trait for managing multiple devices
///
/// This trait provides methods for discovering and accessing CUDA devices.
pub trait GpuManager: Send + Sync {
    /// The device type returned by this manager
    type Device: GpuDevice;

    /// Get the number of devices
    fn device_count(&self) -> Result<u32, NvmlError>;

    /// Get a device by index
    fn device_by_index(&self, index: u32) -> Result<Self::Device, NvmlError>;

    /// Get a device by UUID
    fn device_by_uuid(&self, uuid: &str) -> Result<Self::Device, NvmlError>;

    /// Get a device by name (partial match)
    fn device_by_name(&self, name: &str) -> Result<Self::Device, NvmlError>;

    /// Get all devices
    fn all_devices(&self) -> Result<Vec<Self::Device>, NvmlError> {
        let count = self.device_count()?;
        let mut devices = Vec::with_capacity(count as usize);
        for i in 0..count {
            devices.push(self.device_by_index(i)?);
        }
        Ok(devices)
    }

    /// Get driver version
    fn driver_version(&self) -> Result<String, NvmlError>;

    /// Get NVML version
    fn nvml_version(&self) -> Result<String, NvmlError>;

    /// Get the CUDA driver version as (major, minor)
    fn cuda_driver_version(&self) -> Result<(u32, u32), NvmlError>;
}
