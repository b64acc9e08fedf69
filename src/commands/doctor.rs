//! Doctor command implementation
//!
//! Checks the installed driver against the minimum required by the
//! detected CUDA version.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, CompatOutput};
use crate::compat::{self, DriverVersion};
use crate::config::Config;
use crate::error::Result;
use crate::nvml::{GpuManager, NvmlManager};

/// Execute the doctor command
pub fn run_doctor(_config: &Config, format: OutputFormat) -> Result<()> {
    let manager = NvmlManager::new()?;

    let driver_version = manager.driver_version()?;
    let nvml_version = manager.nvml_version()?;
    let cuda = manager.cuda_driver_version()?;

    let driver = DriverVersion::parse(&driver_version)?;
    let report = compat::check(driver, cuda);

    if !report.is_ok() {
        log::warn!("Compatibility check failed: {}", report.status);
    }

    let output = CompatOutput {
        driver_version,
        nvml_version,
        report,
    };

    print_output(&output, format)?;

    Ok(())
}
