//! Accelerator device domain types
//!
//! Provides the DeviceInfo record used for detection and accounting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable device identifier (NVML enumeration index)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DeviceId(u32);

impl DeviceId {
    /// Create a new device id
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw index value
    #[inline]
    pub const fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for DeviceId {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

/// Device memory size in bytes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MemorySize(u64);

impl MemorySize {
    /// Create from raw bytes
    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    /// Create from mebibytes
    pub const fn from_mib(mib: u64) -> Self {
        Self(mib * 1024 * 1024)
    }

    /// Create from gibibytes
    pub const fn from_gib(gib: u64) -> Self {
        Self(gib * 1024 * 1024 * 1024)
    }

    /// Get the size in bytes
    #[inline]
    pub const fn as_bytes(&self) -> u64 {
        self.0
    }

    /// Get the size in whole mebibytes
    #[inline]
    pub const fn as_mib(&self) -> u64 {
        self.0 / (1024 * 1024)
    }
}

impl fmt::Display for MemorySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gib = self.0 as f64 / (1024.0 * 1024.0 * 1024.0);
        if gib >= 1.0 {
            write!(f, "{:.1} GiB", gib)
        } else {
            write!(f, "{} MiB", self.as_mib())
        }
    }
}

/// CUDA compute capability (major.minor)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ComputeCapability {
    pub major: i32,
    pub minor: i32,
}

impl ComputeCapability {
    /// Create a new compute capability
    pub const fn new(major: i32, minor: i32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for ComputeCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Detected accelerator device record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device id (0-based enumeration index)
    pub device_id: DeviceId,
    /// Device model name (e.g., "NVIDIA A100-SXM4-40GB")
    pub model_name: String,
    /// Unique device UUID
    pub uuid: String,
    /// Hardware location (PCI bus id)
    pub hw_location: String,
    /// NUMA node the device is attached to, if any
    pub numa_node: Option<u32>,
    /// Total device memory
    pub memory_size: MemorySize,
    /// Processing units (CUDA core count)
    pub processing_units: u32,
    /// CUDA compute capability, when reported
    pub compute_capability: Option<ComputeCapability>,
}

impl DeviceInfo {
    /// Create a new device record with the required identity fields
    pub fn new(device_id: DeviceId, model_name: String, uuid: String) -> Self {
        Self {
            device_id,
            model_name,
            uuid,
            hw_location: String::new(),
            numa_node: None,
            memory_size: MemorySize::from_bytes(0),
            processing_units: 0,
            compute_capability: None,
        }
    }

    /// Set the hardware location
    pub fn with_hw_location(mut self, location: String) -> Self {
        self.hw_location = location;
        self
    }

    /// Set the NUMA node
    pub fn with_numa_node(mut self, node: Option<u32>) -> Self {
        self.numa_node = node;
        self
    }

    /// Set the memory size
    pub fn with_memory_size(mut self, size: MemorySize) -> Self {
        self.memory_size = size;
        self
    }

    /// Set the processing unit count
    pub fn with_processing_units(mut self, units: u32) -> Self {
        self.processing_units = units;
        self
    }

    /// Set the compute capability
    pub fn with_compute_capability(mut self, cc: ComputeCapability) -> Self {
        self.compute_capability = Some(cc);
        self
    }

    /// Get a short display name
    pub fn short_name(&self) -> &str {
        // Remove "NVIDIA " prefix if present
        self.model_name.strip_prefix("NVIDIA ").unwrap_or(&self.model_name)
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.device_id, self.model_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_info_display() {
        let info = DeviceInfo::new(
            DeviceId::new(0),
            "NVIDIA A100-SXM4-40GB".to_string(),
            "GPU-xxx".to_string(),
        );
        assert_eq!(info.to_string(), "[0] NVIDIA A100-SXM4-40GB");
    }

    #[test]
    fn test_device_info_short_name() {
        let info = DeviceInfo::new(
            DeviceId::new(0),
            "NVIDIA A100-SXM4-40GB".to_string(),
            "GPU-xxx".to_string(),
        );
        assert_eq!(info.short_name(), "A100-SXM4-40GB");
    }

    #[test]
    fn test_device_info_builder() {
        let info = DeviceInfo::new(DeviceId::new(1), "Test GPU".to_string(), "GPU-123".to_string())
            .with_memory_size(MemorySize::from_gib(16))
            .with_numa_node(Some(1))
            .with_processing_units(3584);

        assert_eq!(info.memory_size.as_mib(), 16 * 1024);
        assert_eq!(info.numa_node, Some(1));
        assert_eq!(info.processing_units, 3584);
    }

    #[test]
    fn test_memory_size_display() {
        assert_eq!(MemorySize::from_gib(40).to_string(), "40.0 GiB");
        assert_eq!(MemorySize::from_mib(512).to_string(), "512 MiB");
    }

    #[test]
    fn test_compute_capability_display() {
        assert_eq!(ComputeCapability::new(8, 0).to_string(), "8.0");
    }
}
