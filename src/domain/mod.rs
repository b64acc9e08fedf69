//! Domain models for cuda-accel
//!
//! This module contains all domain types with validation.
//! Types are validated on construction (fail-fast pattern).

pub mod device;
pub mod share;
pub mod slot;

pub use device::{ComputeCapability, DeviceId, DeviceInfo, MemorySize};
pub use share::{ResourceSpec, ShareUnits, DEFAULT_UNIT_MEMORY, DEFAULT_UNIT_PROC};
pub use slot::{DeviceShareMap, SlotKey};
