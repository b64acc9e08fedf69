//! List command implementation
//!
//! Lists all detected CUDA devices.

use crate::accel::Accelerator;
use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, DeviceList, DeviceListEntry};
use crate::commands::build_accelerator;
use crate::config::Config;
use crate::error::Result;
use crate::nvml::GpuManager;

/// Execute the list command
pub fn run_list(config: &Config, format: OutputFormat) -> Result<()> {
    let accel = build_accelerator(config)?;

    let driver_version = accel.manager().driver_version()?;
    let (cuda_major, cuda_minor) = accel.manager().cuda_driver_version()?;
    let devices = accel.list_devices()?;

    let list = DeviceList {
        devices: devices.iter().map(DeviceListEntry::from).collect(),
        driver_version,
        cuda_version: format!("{}.{}", cuda_major, cuda_minor),
    };

    print_output(&list, format)?;

    Ok(())
}
