//! Binding command implementation
//!
//! Generates the container binding fragment for explicitly chosen
//! devices, granting each its full share capacity.

use crate::accel::Accelerator;
use crate::cli::args::{BindingArgs, OutputFormat};
use crate::cli::output::{print_output, AllocationReport};
use crate::commands::build_accelerator;
use crate::config::Config;
use crate::domain::{DeviceId, DeviceShareMap};
use crate::error::{AppError, Result};

/// Execute the binding command
pub async fn run_binding(config: &Config, format: OutputFormat, args: &BindingArgs) -> Result<()> {
    let accel = build_accelerator(config)?;
    let shares = accel.device_shares()?;

    let mut grant = DeviceShareMap::new();
    for index in &args.devices {
        let capacity = shares
            .iter()
            .find(|(info, _)| info.device_id.index() == *index)
            .map(|(_, capacity)| *capacity)
            .ok_or_else(|| AppError::DeviceNotFound(index.to_string()))?;
        // An explicitly chosen device is exposed even when its capacity
        // rounds to zero.
        grant.add(DeviceId::new(*index), capacity.max(accel.units().quantum));
    }

    let binding = accel.container_binding(&grant).await?;

    let report = AllocationReport {
        requested: grant.total(),
        grant,
        binding,
    };

    print_output(&report, format)?;

    Ok(())
}
