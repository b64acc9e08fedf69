//! nvidia-docker v1 plugin client
//!
//! The legacy nvidia-docker setup runs a helper daemon that serves the
//! volume/device CLI parameters over HTTP. This client fetches them so
//! bindings can be generated without shelling out to nvidia-docker.

use crate::error::DockerError;
use serde::Deserialize;
use std::time::Duration;

/// Default endpoint of the nvidia-docker-plugin daemon
pub const DEFAULT_PLUGIN_ENDPOINT: &str = "http://localhost:3476";

/// CLI parameters reported by the plugin daemon
#[derive(Debug, Clone, Deserialize)]
pub struct CliParams {
    /// Volume driver name (e.g., "nvidia-docker")
    #[serde(rename = "VolumeDriver", default)]
    pub volume_driver: String,

    /// Driver volumes ("name:path:mode")
    #[serde(rename = "Volumes", default)]
    pub volumes: Vec<String>,

    /// Device nodes, control nodes first, then one per GPU
    #[serde(rename = "Devices", default)]
    pub devices: Vec<String>,
}

impl CliParams {
    /// Split device nodes into control nodes and per-GPU nodes
    ///
    /// Control nodes (/dev/nvidiactl, /dev/nvidia-uvm, ...) are needed by
    /// every container; numbered nodes only for allocated devices.
    pub fn split_devices(&self) -> (Vec<String>, Vec<String>) {
        let mut control = Vec::new();
        let mut per_gpu = Vec::new();

        for dev in &self.devices {
            if is_gpu_node(dev) {
                per_gpu.push(dev.clone());
            } else {
                control.push(dev.clone());
            }
        }

        (control, per_gpu)
    }
}

fn is_gpu_node(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .and_then(|name| name.strip_prefix("nvidia"))
        .is_some_and(|suffix| !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()))
}

/// HTTP client for the nvidia-docker-plugin daemon
#[derive(Debug, Clone)]
pub struct NvidiaDockerClient {
    base_url: String,
    http: reqwest::Client,
}

impl NvidiaDockerClient {
    /// Create a client against the given endpoint
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.into(),
            http,
        }
    }

    /// Create a client against the default local endpoint
    pub fn local() -> Self {
        Self::new(DEFAULT_PLUGIN_ENDPOINT)
    }

    /// Fetch the docker CLI parameters from the plugin daemon
    pub async fn cli_params(&self) -> Result<CliParams, DockerError> {
        let url = format!("{}/docker/cli/json", self.base_url.trim_end_matches('/'));

        log::debug!("Querying nvidia-docker plugin at {}", url);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DockerError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let params: CliParams = response
            .json()
            .await
            .map_err(|e| DockerError::MalformedResponse(e.to_string()))?;

        if params.volume_driver.is_empty() {
            return Err(DockerError::MalformedResponse(
                "missing VolumeDriver".to_string(),
            ));
        }

        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn sample_params() -> serde_json::Value {
        serde_json::json!({
            "VolumeDriver": "nvidia-docker",
            "Volumes": ["nvidia_driver_418.39:/usr/local/nvidia:ro"],
            "Devices": ["/dev/nvidiactl", "/dev/nvidia-uvm", "/dev/nvidia0", "/dev/nvidia1"]
        })
    }

    #[tokio::test]
    async fn test_cli_params_ok() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/docker/cli/json");
                then.status(200).json_body(sample_params());
            })
            .await;

        let client = NvidiaDockerClient::new(server.base_url());
        let params = client.cli_params().await.unwrap();

        mock.assert_async().await;
        assert_eq!(params.volume_driver, "nvidia-docker");
        assert_eq!(params.volumes.len(), 1);
        assert_eq!(params.devices.len(), 4);
    }

    #[tokio::test]
    async fn test_cli_params_http_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/docker/cli/json");
                then.status(500);
            })
            .await;

        let client = NvidiaDockerClient::new(server.base_url());
        let err = client.cli_params().await.unwrap_err();
        assert!(matches!(err, DockerError::UnexpectedStatus { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_cli_params_missing_driver() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/docker/cli/json");
                then.status(200).json_body(serde_json::json!({"Volumes": []}));
            })
            .await;

        let client = NvidiaDockerClient::new(server.base_url());
        let err = client.cli_params().await.unwrap_err();
        assert!(matches!(err, DockerError::MalformedResponse(_)));
    }

    #[test]
    fn test_split_devices() {
        let params = CliParams {
            volume_driver: "nvidia-docker".to_string(),
            volumes: vec![],
            devices: vec![
                "/dev/nvidiactl".to_string(),
                "/dev/nvidia-uvm".to_string(),
                "/dev/nvidia0".to_string(),
                "/dev/nvidia12".to_string(),
            ],
        };

        let (control, per_gpu) = params.split_devices();
        assert_eq!(control, vec!["/dev/nvidiactl", "/dev/nvidia-uvm"]);
        assert_eq!(per_gpu, vec!["/dev/nvidia0", "/dev/nvidia12"]);
    }
}
