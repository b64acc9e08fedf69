//! Info command implementation
//!
//! Shows detailed device information including share capacity.

use crate::accel::Accelerator;
use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, DeviceDetail};
use crate::commands::build_accelerator;
use crate::config::Config;
use crate::domain::DeviceInfo;
use crate::error::{AppError, Result};
use crate::nvml::{GpuDevice, GpuManager};

/// Execute the info command
pub fn run_info(config: &Config, format: OutputFormat, device_index: Option<u32>) -> Result<()> {
    let accel = build_accelerator(config)?;

    // UUID beats name beats index when several selectors are given.
    let selected: Vec<DeviceInfo> = if let Some(uuid) = &config.device.uuid {
        vec![accel.manager().device_by_uuid(uuid)?.info()?]
    } else if let Some(name) = &config.device.name {
        vec![accel.manager().device_by_name(name)?.info()?]
    } else if let Some(index) = device_index {
        vec![accel.manager().device_by_index(index)?.info()?]
    } else {
        accel.list_devices()?
    };

    if selected.is_empty() {
        return Err(AppError::NoDevicesFound);
    }

    for info in &selected {
        if let Some(mask) = &config.device.visible {
            if !mask.contains(&info.device_id.index()) {
                return Err(AppError::DeviceNotFound(format!(
                    "device {} is masked out by configuration",
                    info.device_id
                )));
            }
        }

        let detail = DeviceDetail {
            device_id: info.device_id.index(),
            name: info.model_name.clone(),
            uuid: info.uuid.clone(),
            hw_location: info.hw_location.clone(),
            numa_node: info.numa_node,
            memory: info.memory_size.to_string(),
            processing_units: info.processing_units,
            compute_capability: info.compute_capability.map(|cc| cc.to_string()),
            share_capacity: accel.units().device_share(info),
        };

        print_output(&detail, format)?;
    }

    Ok(())
}
