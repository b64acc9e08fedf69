//! Container binding layer
//!
//! Generates the docker create-options fragment for allocated devices and
//! talks to the legacy nvidia-docker helper daemon where needed.

pub mod binding;
pub mod client;

pub use binding::{ContainerBinding, NVIDIA_RUNTIME};
pub use client::{CliParams, NvidiaDockerClient, DEFAULT_PLUGIN_ENDPOINT};
