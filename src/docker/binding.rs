//! Container create-options fragment
//!
//! The binding is the piece of a docker container-create request that
//! exposes allocated devices: environment variables, device nodes,
//! volumes, and the runtime selection. Field names follow the docker
//! remote API so the fragment can be merged into a create request as-is.

use serde::{Deserialize, Serialize};

/// Runtime name used by nvidia-docker v2
pub const NVIDIA_RUNTIME: &str = "nvidia";

/// Container resource binding for a set of allocated devices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerBinding {
    /// Environment variables ("KEY=value")
    #[serde(rename = "Env")]
    pub env: Vec<String>,

    /// Host device nodes to map into the container
    #[serde(rename = "Devices", skip_serializing_if = "Vec::is_empty", default)]
    pub devices: Vec<String>,

    /// Volumes to mount ("volume:path:mode")
    #[serde(rename = "Volumes", skip_serializing_if = "Vec::is_empty", default)]
    pub volumes: Vec<String>,

    /// Volume driver providing the driver volumes
    #[serde(rename = "VolumeDriver", skip_serializing_if = "Option::is_none", default)]
    pub volume_driver: Option<String>,

    /// Container runtime to select (v2 path)
    #[serde(rename = "Runtime", skip_serializing_if = "Option::is_none", default)]
    pub runtime: Option<String>,
}

impl ContainerBinding {
    /// Binding for the nvidia runtime (nvidia-docker v2)
    ///
    /// The runtime injects driver files and device nodes itself, keyed
    /// off `NVIDIA_VISIBLE_DEVICES`.
    pub fn v2(visible_uuids: &[String], visible_ids: &[String]) -> Self {
        let nvidia_visible = if visible_uuids.is_empty() {
            "void".to_string()
        } else {
            visible_uuids.join(",")
        };

        Self {
            env: vec![
                format!("NVIDIA_VISIBLE_DEVICES={}", nvidia_visible),
                format!("CUDA_VISIBLE_DEVICES={}", visible_ids.join(",")),
            ],
            runtime: Some(NVIDIA_RUNTIME.to_string()),
            ..Self::default()
        }
    }

    /// Binding for the legacy volume plugin (nvidia-docker v1)
    ///
    /// Device nodes and driver volumes come from the helper daemon's
    /// CLI parameters; only the allocated compute nodes are kept.
    pub fn v1(
        volume_driver: String,
        volumes: Vec<String>,
        devices: Vec<String>,
        visible_ids: &[String],
    ) -> Self {
        Self {
            env: vec![format!("CUDA_VISIBLE_DEVICES={}", visible_ids.join(","))],
            devices,
            volumes,
            volume_driver: Some(volume_driver),
            runtime: None,
        }
    }

    /// The value of an env entry, if present
    pub fn env_value(&self, key: &str) -> Option<&str> {
        let prefix = format!("{}=", key);
        self.env
            .iter()
            .find_map(|e| e.strip_prefix(prefix.as_str()))
    }
}
