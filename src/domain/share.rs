//! Fractional share accounting
//!
//! A device's capacity is expressed in "shares": the number of resource
//! units it can host, where one unit is a fixed amount of device memory
//! paired with a fixed number of processing units. Capacity rounds down
//! to the quantum, demand rounds up, so any granted share is backed by
//! at least the resources it claims.

use crate::domain::device::{DeviceInfo, MemorySize};
use crate::error::DomainError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default resource unit: 1 GiB of device memory
pub const DEFAULT_UNIT_MEMORY: u64 = 1024 * 1024 * 1024;

/// Default resource unit: 128 CUDA cores (one SM on most architectures)
pub const DEFAULT_UNIT_PROC: u32 = 128;

/// Concrete resource amounts backing a share
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// Device memory
    pub memory: MemorySize,
    /// Processing units
    pub proc_units: u32,
}

impl ResourceSpec {
    /// Create a new resource spec
    pub const fn new(memory: MemorySize, proc_units: u32) -> Self {
        Self { memory, proc_units }
    }
}

impl fmt::Display for ResourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} cores", self.memory, self.proc_units)
    }
}

/// Share unit definition and conversion rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareUnits {
    /// Memory per unit, in bytes
    pub unit_memory: u64,
    /// Processing units per unit
    pub unit_proc: u32,
    /// Granularity of shares
    pub quantum: Decimal,
}

impl Default for ShareUnits {
    fn default() -> Self {
        Self {
            unit_memory: DEFAULT_UNIT_MEMORY,
            unit_proc: DEFAULT_UNIT_PROC,
            quantum: Decimal::new(1, 2), // 0.01
        }
    }
}

impl ShareUnits {
    /// Create share units, validating that neither unit is zero
    pub fn new(unit_memory: u64, unit_proc: u32, quantum: Decimal) -> Result<Self, DomainError> {
        if unit_memory == 0 {
            return Err(DomainError::InvalidShareUnit("unit_memory is zero".to_string()));
        }
        if unit_proc == 0 {
            return Err(DomainError::InvalidShareUnit("unit_proc is zero".to_string()));
        }
        if quantum <= Decimal::ZERO {
            return Err(DomainError::InvalidShareUnit(format!(
                "quantum {} is not positive",
                quantum
            )));
        }
        Ok(Self {
            unit_memory,
            unit_proc,
            quantum,
        })
    }

    /// Number of decimal places implied by the quantum
    fn scale(&self) -> u32 {
        self.quantum.normalize().scale()
    }

    /// Maximum share a device can host
    ///
    /// The binding factor is whichever unit runs out first; the result is
    /// quantized rounding down so capacity is never overstated.
    pub fn device_share(&self, info: &DeviceInfo) -> Decimal {
        let mem_shares =
            Decimal::from(info.memory_size.as_bytes()) / Decimal::from(self.unit_memory);
        let proc_shares = Decimal::from(info.processing_units) / Decimal::from(self.unit_proc);
        let common = mem_shares.min(proc_shares);
        common.round_dp_with_strategy(self.scale(), RoundingStrategy::ToZero)
    }

    /// Convert a share back into the concrete resources it reserves
    pub fn share_to_spec(&self, share: Decimal) -> ResourceSpec {
        let memory = (Decimal::from(self.unit_memory) * share)
            .to_u64()
            .unwrap_or(0);
        let proc_units = (Decimal::from(self.unit_proc) * share)
            .to_u32()
            .unwrap_or(0);
        ResourceSpec::new(MemorySize::from_bytes(memory), proc_units)
    }

    /// Shares required to satisfy a concrete resource request
    ///
    /// The binding factor is whichever unit demands more; the result is
    /// quantized rounding up so the grant always covers the request.
    pub fn spec_to_share(&self, spec: &ResourceSpec) -> Decimal {
        let mem_share =
            Decimal::from(spec.memory.as_bytes()) / Decimal::from(self.unit_memory);
        let proc_share = Decimal::from(spec.proc_units) / Decimal::from(self.unit_proc);
        let required = mem_share.max(proc_share);
        required.round_dp_with_strategy(self.scale(), RoundingStrategy::AwayFromZero)
    }

    /// Validate that a requested share is positive and quantum-aligned
    pub fn validate_request(&self, share: Decimal) -> Result<(), DomainError> {
        if share <= Decimal::ZERO {
            return Err(DomainError::InvalidShare(share.to_string()));
        }
        if (share % self.quantum) != Decimal::ZERO {
            return Err(DomainError::InvalidShare(share.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::device::DeviceId;
    use rust_decimal_macros::dec;

    fn device(mem_gib: u64, cores: u32) -> DeviceInfo {
        DeviceInfo::new(DeviceId::new(0), "Test GPU".to_string(), "GPU-0".to_string())
            .with_memory_size(MemorySize::from_gib(mem_gib))
            .with_processing_units(cores)
    }

    #[test]
    fn test_device_share_memory_bound() {
        // 4 GiB / 1 GiB unit = 4 shares; 1024 cores / 128 = 8 shares
        let units = ShareUnits::default();
        let share = units.device_share(&device(4, 1024));
        assert_eq!(share, dec!(4.00));
    }

    #[test]
    fn test_device_share_proc_bound() {
        // 16 GiB but only 256 cores: proc is the binding factor
        let units = ShareUnits::default();
        let share = units.device_share(&device(16, 256));
        assert_eq!(share, dec!(2.00));
    }

    #[test]
    fn test_device_share_rounds_down() {
        // 300 cores / 128 = 2.34375 -> 2.34
        let units = ShareUnits::default();
        let share = units.device_share(&device(16, 300));
        assert_eq!(share, dec!(2.34));
    }

    #[test]
    fn test_device_below_quantum_is_zero() {
        let units = ShareUnits::default();
        let share = units.device_share(&device(16, 1));
        assert_eq!(share, Decimal::ZERO);
    }

    #[test]
    fn test_share_to_spec() {
        let units = ShareUnits::default();
        let spec = units.share_to_spec(dec!(2.5));
        assert_eq!(spec.memory.as_mib(), 2560);
        assert_eq!(spec.proc_units, 320);
    }

    #[test]
    fn test_spec_to_share_rounds_up() {
        let units = ShareUnits::default();
        // 129 cores need 1.0078... units -> 1.01 shares
        let spec = ResourceSpec::new(MemorySize::from_mib(512), 129);
        assert_eq!(units.spec_to_share(&spec), dec!(1.01));
    }

    #[test]
    fn test_spec_roundtrip_covers_request() {
        let units = ShareUnits::default();
        let spec = ResourceSpec::new(MemorySize::from_mib(1536), 200);
        let share = units.spec_to_share(&spec);
        let granted = units.share_to_spec(share);
        assert!(granted.memory.as_bytes() >= spec.memory.as_bytes());
        assert!(granted.proc_units >= spec.proc_units);
    }

    #[test]
    fn test_validate_request() {
        let units = ShareUnits::default();
        assert!(units.validate_request(dec!(1.25)).is_ok());
        assert!(units.validate_request(dec!(0)).is_err());
        assert!(units.validate_request(dec!(-1)).is_err());
        assert!(units.validate_request(dec!(0.005)).is_err());
    }

    #[test]
    fn test_zero_units_rejected() {
        assert!(ShareUnits::new(0, 128, dec!(0.01)).is_err());
        assert!(ShareUnits::new(1024, 0, dec!(0.01)).is_err());
        assert!(ShareUnits::new(1024, 128, dec!(0)).is_err());
    }
}
