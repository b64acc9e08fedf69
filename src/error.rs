//! Unified error types for cuda-accel
//!
//! This module defines all error types used throughout the plugin.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from NVML operations
    #[error("NVML error: {0}")]
    Nvml(#[from] NvmlError),

    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from domain type validation or share accounting
    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    /// Error talking to the docker-side helper endpoints
    #[error("Docker error: {0}")]
    Docker(#[from] DockerError),

    /// Device not found by id, name, or UUID
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// No CUDA devices detected in the system
    #[error("No CUDA devices detected")]
    NoDevicesFound,

    /// Accelerator key is not registered
    #[error("No accelerator registered under key '{0}'")]
    UnknownAccelerator(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from NVML wrapper operations
#[derive(Error, Debug)]
pub enum NvmlError {
    /// Failed to initialize NVML library
    #[error("Failed to initialize NVML: {0}")]
    InitializationFailed(String),

    /// NVML library not found
    #[error("NVML library not found. Is the NVIDIA driver installed?")]
    LibraryNotFound,

    /// Device not found at index
    #[error("CUDA device not found at index {0}")]
    DeviceNotFound(u32),

    /// Device not found by UUID
    #[error("CUDA device not found with UUID: {0}")]
    DeviceNotFoundByUuid(String),

    /// Operation not supported by this GPU
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// Insufficient permissions
    #[error("Insufficient permissions: {0}. Try running with sudo.")]
    InsufficientPermissions(String),

    /// GPU is lost (fallen off bus, etc.)
    #[error("GPU is lost or has become inaccessible")]
    GpuLost,

    /// Invalid argument passed to NVML
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unknown NVML error
    #[error("NVML error: {0}")]
    Unknown(String),
}

/// Errors from domain type validation and share accounting
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Requested share is not a positive multiple of the quantum
    #[error("Invalid share request: {0} (must be a positive multiple of the quantum)")]
    InvalidShare(String),

    /// Not enough free shares across all devices
    #[error("Insufficient capacity: requested {requested} shares, {available} available")]
    InsufficientCapacity { requested: String, available: String },

    /// Share unit sizes must be non-zero
    #[error("Invalid share unit: {0}")]
    InvalidShareUnit(String),

    /// Device id is not tracked by the allocator
    #[error("Unknown device id: {0}")]
    UnknownDevice(u32),

    /// Driver version string could not be parsed
    #[error("Invalid driver version: {0}")]
    InvalidDriverVersion(String),

    /// Invalid value provided
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Errors from the nvidia-docker plugin HTTP client
#[derive(Error, Debug)]
pub enum DockerError {
    /// HTTP transport failure
    #[error("Request to nvidia-docker plugin failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("nvidia-docker plugin returned HTTP {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// Response body did not match the expected shape
    #[error("Unexpected response from nvidia-docker plugin: {0}")]
    MalformedResponse(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_display() {
        let err = DomainError::InsufficientCapacity {
            requested: "3.50".to_string(),
            available: "2.00".to_string(),
        };
        assert!(err.to_string().contains("3.50"));
        assert!(err.to_string().contains("2.00"));
    }

    #[test]
    fn test_nvml_error_display() {
        let err = NvmlError::LibraryNotFound;
        assert!(err.to_string().contains("NVIDIA driver"));
    }

    #[test]
    fn test_unknown_device_display() {
        let err = DomainError::UnknownDevice(7);
        assert_eq!(err.to_string(), "Unknown device id: 7");
    }

    #[test]
    fn test_error_conversion() {
        let domain_err = DomainError::UnknownDevice(1);
        let app_err: AppError = domain_err.into();
        assert!(matches!(app_err, AppError::Domain(_)));
    }
}
