//! Allocate command implementation
//!
//! Simulates a share allocation and shows the container binding the
//! grant would produce.

use crate::accel::Accelerator;
use crate::cli::args::{AllocateArgs, OutputFormat};
use crate::cli::output::{print_output, AllocationReport};
use crate::commands::build_accelerator;
use crate::config::Config;
use crate::error::Result;
use crate::services::ShareAllocator;

/// Execute the allocate command
pub async fn run_allocate(
    config: &Config,
    format: OutputFormat,
    args: &AllocateArgs,
) -> Result<()> {
    let accel = build_accelerator(config)?;
    let devices = accel.list_devices()?;

    let mut allocator = ShareAllocator::new(accel.units().clone(), &devices);
    let grant = allocator.allocate(args.shares)?;

    let binding = accel.container_binding(&grant).await?;

    let report = AllocationReport {
        requested: args.shares,
        grant,
        binding,
    };

    print_output(&report, format)?;

    Ok(())
}
