//! Accelerator plugin contract
//!
//! An accelerator exposes devices as schedulable slots and knows how to
//! bind an allocation into a workload container. Binding generation is
//! async: the legacy nvidia-docker path queries a helper daemon over HTTP.

use crate::docker::ContainerBinding;
use crate::domain::{DeviceInfo, DeviceShareMap, SlotKey};
use crate::error::Result;
use async_trait::async_trait;

/// Trait implemented by every accelerator plugin
#[async_trait]
pub trait Accelerator: Send + Sync {
    /// Slot key this accelerator registers its capacity under
    fn slot_key(&self) -> SlotKey;

    /// Enumerate the devices this accelerator manages
    ///
    /// The returned list honors any configured visible-device mask:
    /// masked devices must not appear here or in any downstream
    /// accounting.
    fn list_devices(&self) -> Result<Vec<DeviceInfo>>;

    /// Build the container create-options fragment for an allocation
    ///
    /// Every device holding a share in `allocation` is exposed to the
    /// container; an empty allocation produces a binding that blocks
    /// all devices.
    async fn container_binding(&self, allocation: &DeviceShareMap) -> Result<ContainerBinding>;
}
