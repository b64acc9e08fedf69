//! Fractional share allocator
//!
//! Tracks free share capacity per device and places allocation requests
//! greedily, largest free capacity first. All arithmetic is exact
//! decimal; grants are always quantum-aligned because capacities and
//! requests both are.

use crate::domain::{DeviceId, DeviceInfo, DeviceShareMap, ShareUnits};
use crate::error::DomainError;

use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Per-device share bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DeviceCapacity {
    capacity: Decimal,
    free: Decimal,
}

/// Share allocator over a fixed set of devices
#[derive(Debug, Clone)]
pub struct ShareAllocator {
    units: ShareUnits,
    devices: BTreeMap<DeviceId, DeviceCapacity>,
}

impl ShareAllocator {
    /// Build an allocator from detected devices
    ///
    /// Devices whose capacity is below one quantum are tracked with zero
    /// capacity: they stay listable but are never allocated.
    pub fn new(units: ShareUnits, devices: &[DeviceInfo]) -> Self {
        let devices = devices
            .iter()
            .map(|info| {
                let capacity = units.device_share(info);
                (info.device_id, DeviceCapacity { capacity, free: capacity })
            })
            .collect();

        Self { units, devices }
    }

    /// The share unit definition in effect
    pub fn units(&self) -> &ShareUnits {
        &self.units
    }

    /// Total free shares across all devices
    pub fn free_total(&self) -> Decimal {
        self.devices.values().map(|d| d.free).sum()
    }

    /// Total capacity across all devices
    pub fn capacity_total(&self) -> Decimal {
        self.devices.values().map(|d| d.capacity).sum()
    }

    /// Free shares on one device
    pub fn free_of(&self, device_id: DeviceId) -> Result<Decimal, DomainError> {
        self.devices
            .get(&device_id)
            .map(|d| d.free)
            .ok_or(DomainError::UnknownDevice(device_id.index()))
    }

    /// Allocate the requested number of shares
    ///
    /// Placement is greedy: the device with the most free capacity is
    /// filled first, which keeps large contiguous grants possible for
    /// later requests. Fails without side effects when the request
    /// cannot be satisfied.
    pub fn allocate(&mut self, requested: Decimal) -> Result<DeviceShareMap, DomainError> {
        self.units.validate_request(requested)?;

        let available = self.free_total();
        if requested > available {
            return Err(DomainError::InsufficientCapacity {
                requested: requested.to_string(),
                available: available.to_string(),
            });
        }

        // Most-free-first; ties broken by device id for determinism.
        let mut order: Vec<(DeviceId, Decimal)> = self
            .devices
            .iter()
            .filter(|(_, d)| d.free > Decimal::ZERO)
            .map(|(id, d)| (*id, d.free))
            .collect();
        order.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut remaining = requested;
        let mut grant = DeviceShareMap::new();

        for (device_id, free) in order {
            if remaining <= Decimal::ZERO {
                break;
            }
            let take = free.min(remaining);
            grant.add(device_id, take);
            remaining -= take;
        }

        debug_assert_eq!(remaining, Decimal::ZERO);

        for (device_id, share) in grant.iter() {
            if let Some(dev) = self.devices.get_mut(&device_id) {
                dev.free -= share;
            }
        }

        log::debug!(
            "Allocated {} shares across {} device(s)",
            requested,
            grant.len()
        );
        Ok(grant)
    }

    /// Return shares from a previous grant
    ///
    /// Unknown devices in the grant are an error; over-release saturates
    /// at device capacity.
    pub fn release(&mut self, grant: &DeviceShareMap) -> Result<(), DomainError> {
        for (device_id, _) in grant.iter() {
            if !self.devices.contains_key(&device_id) {
                return Err(DomainError::UnknownDevice(device_id.index()));
            }
        }

        for (device_id, share) in grant.iter() {
            if let Some(dev) = self.devices.get_mut(&device_id) {
                dev.free = (dev.free + share).min(dev.capacity);
            }
        }

        Ok(())
    }
}
