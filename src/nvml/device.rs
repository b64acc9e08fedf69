//! NVML device implementation
//!
//! Real implementation of GpuDevice trait using nvml-wrapper.

use crate::domain::{ComputeCapability, MemorySize};
use crate::error::NvmlError;
use crate::nvml::traits::GpuDevice;

use nvml_wrapper::Device;
use std::path::Path;

/// NVML device wrapper implementing GpuDevice trait
pub struct NvmlDevice<'a> {
    device: Device<'a>,
    index: u32,
}

impl<'a> NvmlDevice<'a> {
    /// Create a new NVML device wrapper
    pub fn new(device: Device<'a>, index: u32) -> Self {
        Self { device, index }
    }

    /// Convert NVML error to our error type
    fn convert_error(err: nvml_wrapper::error::NvmlError) -> NvmlError {
        use nvml_wrapper::error::NvmlError as NE;
        match err {
            NE::NotSupported => {
                NvmlError::NotSupported("Operation not supported by this GPU".to_string())
            }
            NE::NoPermission => {
                NvmlError::InsufficientPermissions("Insufficient permissions".to_string())
            }
            NE::NotFound => NvmlError::DeviceNotFound(0),
            NE::GpuLost => NvmlError::GpuLost,
            NE::InvalidArg => NvmlError::InvalidArgument("Invalid argument".to_string()),
            _ => NvmlError::Unknown(err.to_string()),
        }
    }
}

impl GpuDevice for NvmlDevice<'_> {
    fn index(&self) -> u32 {
        self.index
    }

    fn name(&self) -> Result<String, NvmlError> {
        self.device.name().map_err(Self::convert_error)
    }

    fn uuid(&self) -> Result<String, NvmlError> {
        self.device.uuid().map_err(Self::convert_error)
    }

    fn memory_total(&self) -> Result<MemorySize, NvmlError> {
        let mem = self.device.memory_info().map_err(Self::convert_error)?;
        Ok(MemorySize::from_bytes(mem.total))
    }

    fn pci_bus_id(&self) -> Result<String, NvmlError> {
        let pci = self.device.pci_info().map_err(Self::convert_error)?;
        Ok(pci.bus_id)
    }

    fn numa_node(&self) -> Result<Option<u32>, NvmlError> {
        let bus_id = self.pci_bus_id()?;
        Ok(numa_node_from_sysfs(&bus_id))
    }

    fn processing_units(&self) -> Result<u32, NvmlError> {
        self.device.num_cores().map_err(Self::convert_error)
    }

    fn compute_capability(&self) -> Result<Option<ComputeCapability>, NvmlError> {
        match self.device.cuda_compute_capability() {
            Ok(cc) => Ok(Some(ComputeCapability::new(cc.major, cc.minor))),
            Err(nvml_wrapper::error::NvmlError::NotSupported) => Ok(None),
            Err(e) => Err(Self::convert_error(e)),
        }
    }
}

/// Resolve the NUMA node for a PCI device via sysfs
///
/// NVML reports bus ids as "00000000:81:00.0" while sysfs uses the
/// short "0000:81:00.0" form. A value of -1 means no NUMA affinity.
fn numa_node_from_sysfs(bus_id: &str) -> Option<u32> {
    let short_id = normalize_bus_id(bus_id);
    let path = format!("/sys/bus/pci/devices/{}/numa_node", short_id);
    read_numa_node(Path::new(&path))
}

fn normalize_bus_id(bus_id: &str) -> String {
    let lower = bus_id.to_lowercase();
    match lower.split_once(':') {
        Some((domain, rest)) if domain.len() > 4 => {
            let trimmed = domain.trim_start_matches('0');
            let domain = if trimmed.is_empty() { "0000" } else { trimmed };
            format!("{:0>4}:{}", domain, rest)
        }
        _ => lower,
    }
}

fn read_numa_node(path: &Path) -> Option<u32> {
    let content = std::fs::read_to_string(path).ok()?;
    let node: i64 = content.trim().parse().ok()?;
    if node < 0 {
        None
    } else {
        Some(node as u32)
    }
}
