//! Driver/CUDA compatibility checking
//!
//! Each CUDA toolkit version requires a minimum Linux driver. The table
//! below mirrors NVIDIA's published minimums; `check` compares the
//! installed driver against the minimum for the detected CUDA version.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parsed NVIDIA driver version ("418.39" or "450.36.06")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DriverVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: Option<u32>,
}

impl DriverVersion {
    /// Create a version without a patch component
    pub const fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            patch: None,
        }
    }

    /// Create a version with a patch component
    pub const fn with_patch(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch: Some(patch),
        }
    }

    /// Parse a dotted driver version string
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(DomainError::InvalidDriverVersion(s.to_string()));
        }

        let parse_part = |p: &str| {
            p.parse::<u32>()
                .map_err(|_| DomainError::InvalidDriverVersion(s.to_string()))
        };

        Ok(Self {
            major: parse_part(parts[0])?,
            minor: parse_part(parts[1])?,
            patch: parts.get(2).map(|p| parse_part(p)).transpose()?,
        })
    }
}

impl fmt::Display for DriverVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{:02}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

/// Minimum Linux driver per CUDA toolkit version
const MIN_DRIVER_TABLE: &[((u32, u32), DriverVersion)] = &[
    ((8, 0), DriverVersion::new(367, 48)),
    ((9, 0), DriverVersion::new(384, 81)),
    ((9, 1), DriverVersion::new(387, 26)),
    ((9, 2), DriverVersion::new(396, 26)),
    ((10, 0), DriverVersion::new(410, 48)),
    ((10, 1), DriverVersion::new(418, 39)),
    ((11, 0), DriverVersion::with_patch(450, 36, 6)),
];

/// Minimum driver required by a CUDA toolkit version, if known
pub fn min_driver_for(cuda: (u32, u32)) -> Option<DriverVersion> {
    MIN_DRIVER_TABLE
        .iter()
        .find(|(version, _)| *version == cuda)
        .map(|(_, min)| *min)
}

/// Compatibility verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompatStatus {
    /// Driver meets or exceeds the minimum
    Ok,
    /// Driver is older than the minimum for this CUDA version
    DriverTooOld,
    /// CUDA version is not in the table
    UnknownCudaVersion,
}

impl fmt::Display for CompatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::DriverTooOld => write!(f, "Driver too old"),
            Self::UnknownCudaVersion => write!(f, "Unknown CUDA version"),
        }
    }
}

/// Result of a compatibility check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatReport {
    /// Installed driver version
    pub driver: DriverVersion,
    /// Detected CUDA version (major, minor)
    pub cuda: (u32, u32),
    /// Minimum driver for the detected CUDA version, when known
    pub min_driver: Option<DriverVersion>,
    /// Verdict
    pub status: CompatStatus,
}

impl CompatReport {
    /// True when the installed driver can serve the detected CUDA version
    pub fn is_ok(&self) -> bool {
        self.status == CompatStatus::Ok
    }
}

/// Check an installed driver against a detected CUDA version
pub fn check(driver: DriverVersion, cuda: (u32, u32)) -> CompatReport {
    let min_driver = min_driver_for(cuda);
    let status = match min_driver {
        Some(min) if driver >= min => CompatStatus::Ok,
        Some(_) => CompatStatus::DriverTooOld,
        None => CompatStatus::UnknownCudaVersion,
    };

    CompatReport {
        driver,
        cuda,
        min_driver,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_component() {
        let v = DriverVersion::parse("418.39").unwrap();
        assert_eq!(v, DriverVersion::new(418, 39));
    }

    #[test]
    fn test_parse_three_component() {
        let v = DriverVersion::parse("450.36.06").unwrap();
        assert_eq!(v, DriverVersion::with_patch(450, 36, 6));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(DriverVersion::parse("418").is_err());
        assert!(DriverVersion::parse("a.b").is_err());
        assert!(DriverVersion::parse("1.2.3.4").is_err());
    }

    #[test]
    fn test_version_ordering() {
        let old = DriverVersion::parse("396.26").unwrap();
        let new = DriverVersion::parse("418.39").unwrap();
        assert!(old < new);

        // Patch presence orders above its absence at equal major.minor
        let base = DriverVersion::parse("450.36").unwrap();
        let patched = DriverVersion::parse("450.36.06").unwrap();
        assert!(base < patched);
    }

    #[test]
    fn test_check_ok() {
        let report = check(DriverVersion::parse("418.39").unwrap(), (10, 1));
        assert!(report.is_ok());
    }

    #[test]
    fn test_check_driver_too_old() {
        let report = check(DriverVersion::parse("396.26").unwrap(), (10, 0));
        assert_eq!(report.status, CompatStatus::DriverTooOld);
        assert_eq!(report.min_driver, Some(DriverVersion::new(410, 48)));
    }

    #[test]
    fn test_check_unknown_cuda() {
        let report = check(DriverVersion::parse("560.35.03").unwrap(), (99, 0));
        assert_eq!(report.status, CompatStatus::UnknownCudaVersion);
        assert!(report.min_driver.is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(DriverVersion::new(418, 39).to_string(), "418.39");
        assert_eq!(DriverVersion::with_patch(450, 36, 6).to_string(), "450.36.06");
    }
}
