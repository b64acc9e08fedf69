//! Scheduler slot types
//!
//! A slot is the unit of allocatable accelerator capacity the host agent
//! advertises to its scheduler. Each accelerator implementation owns one
//! slot key; allocations are maps from device id to granted share.

use crate::domain::device::DeviceId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Slot key under which an accelerator registers its capacity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotKey(String);

impl SlotKey {
    /// Create a new slot key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SlotKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// Per-device share grant produced by an allocation
///
/// BTreeMap keeps device order stable for display and env generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceShareMap(BTreeMap<DeviceId, Decimal>);

impl DeviceShareMap {
    /// Create an empty share map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a share grant for a device, accumulating on repeat
    pub fn add(&mut self, device_id: DeviceId, share: Decimal) {
        *self.0.entry(device_id).or_insert(Decimal::ZERO) += share;
    }

    /// Share granted on a device, zero if absent
    pub fn share_of(&self, device_id: DeviceId) -> Decimal {
        self.0.get(&device_id).copied().unwrap_or(Decimal::ZERO)
    }

    /// Sum of all granted shares
    pub fn total(&self) -> Decimal {
        self.0.values().copied().sum()
    }

    /// Device ids in ascending order
    pub fn device_ids(&self) -> impl Iterator<Item = DeviceId> + '_ {
        self.0.keys().copied()
    }

    /// Iterate over (device, share) pairs in device order
    pub fn iter(&self) -> impl Iterator<Item = (DeviceId, Decimal)> + '_ {
        self.0.iter().map(|(id, share)| (*id, *share))
    }

    /// True when no device holds a share
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of devices holding a share
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(DeviceId, Decimal)> for DeviceShareMap {
    fn from_iter<I: IntoIterator<Item = (DeviceId, Decimal)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_slot_key() {
        let key = SlotKey::from("cuda");
        assert_eq!(key.as_str(), "cuda");
        assert_eq!(key.to_string(), "cuda");
    }

    #[test]
    fn test_share_map_accumulates() {
        let mut map = DeviceShareMap::new();
        map.add(DeviceId::new(0), dec!(0.5));
        map.add(DeviceId::new(0), dec!(0.25));
        map.add(DeviceId::new(2), dec!(1));

        assert_eq!(map.share_of(DeviceId::new(0)), dec!(0.75));
        assert_eq!(map.share_of(DeviceId::new(1)), Decimal::ZERO);
        assert_eq!(map.total(), dec!(1.75));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_share_map_device_order() {
        let mut map = DeviceShareMap::new();
        map.add(DeviceId::new(3), dec!(1));
        map.add(DeviceId::new(1), dec!(1));
        map.add(DeviceId::new(2), dec!(1));

        let ids: Vec<u32> = map.device_ids().map(|d| d.index()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
