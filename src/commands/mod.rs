//! Command handlers
//!
//! One handler per CLI subcommand.

pub mod allocate;
pub mod binding;
pub mod doctor;
pub mod info;
pub mod list;
pub mod shares;

pub use allocate::run_allocate;
pub use binding::run_binding;
pub use doctor::run_doctor;
pub use info::run_info;
pub use list::run_list;
pub use shares::run_shares;

use crate::accel::CudaAccelerator;
use crate::config::Config;
use crate::docker::NvidiaDockerClient;
use crate::error::Result;
use crate::nvml::NvmlManager;

/// Build the CUDA accelerator from configuration
pub(crate) fn build_accelerator(config: &Config) -> Result<CudaAccelerator<NvmlManager>> {
    let manager = NvmlManager::new()?;

    Ok(CudaAccelerator::new(manager)
        .with_units(config.share.to_units()?)
        .with_visible_mask(config.device.visible.clone())
        .with_prefer_v2(config.docker.prefer_v2)
        .with_plugin_client(NvidiaDockerClient::new(
            &config.docker.nvidia_plugin_endpoint,
        )))
}
