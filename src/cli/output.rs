//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::compat::CompatReport;
use crate::docker::ContainerBinding;
use crate::domain::{DeviceInfo, DeviceShareMap};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

/// Device list entry for display
#[derive(Debug, Clone, Serialize)]
pub struct DeviceListEntry {
    pub device_id: u32,
    pub name: String,
    pub uuid: String,
    pub memory: String,
    pub numa_node: Option<u32>,
}

impl From<&DeviceInfo> for DeviceListEntry {
    fn from(info: &DeviceInfo) -> Self {
        Self {
            device_id: info.device_id.index(),
            name: info.model_name.clone(),
            uuid: info.uuid.clone(),
            memory: info.memory_size.to_string(),
            numa_node: info.numa_node,
        }
    }
}

impl TableDisplay for DeviceListEntry {
    fn to_table(&self) -> String {
        let numa = self
            .numa_node
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "[{}] {} ({}, NUMA: {}, UUID: {})",
            self.device_id, self.name, self.memory, numa, self.uuid
        )
    }

    fn to_compact(&self) -> String {
        format!("{}:{}", self.device_id, self.name)
    }
}

/// Device list for display
#[derive(Debug, Clone, Serialize)]
pub struct DeviceList {
    pub devices: Vec<DeviceListEntry>,
    pub driver_version: String,
    pub cuda_version: String,
}

impl TableDisplay for DeviceList {
    fn to_table(&self) -> String {
        let mut output = format!("Driver Version: {}\n", self.driver_version);
        output.push_str(&format!("CUDA Version: {}\n", self.cuda_version));
        output.push_str(&format!("Devices Found: {}\n\n", self.devices.len()));

        for device in &self.devices {
            output.push_str(&device.to_table());
            output.push('\n');
        }

        output
    }

    fn to_compact(&self) -> String {
        self.devices
            .iter()
            .map(|d| d.to_compact())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Detailed device view
#[derive(Debug, Clone, Serialize)]
pub struct DeviceDetail {
    pub device_id: u32,
    pub name: String,
    pub uuid: String,
    pub hw_location: String,
    pub numa_node: Option<u32>,
    pub memory: String,
    pub processing_units: u32,
    pub compute_capability: Option<String>,
    pub share_capacity: Decimal,
}

impl TableDisplay for DeviceDetail {
    fn to_table(&self) -> String {
        let numa = self
            .numa_node
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        let cc = self.compute_capability.as_deref().unwrap_or("-");

        let mut output = format!("Device {}: {}\n", self.device_id, self.name);
        output.push_str(&format!("  UUID:           {}\n", self.uuid));
        output.push_str(&format!("  PCI Bus:        {}\n", self.hw_location));
        output.push_str(&format!("  NUMA Node:      {}\n", numa));
        output.push_str(&format!("  Memory:         {}\n", self.memory));
        output.push_str(&format!("  CUDA Cores:     {}\n", self.processing_units));
        output.push_str(&format!("  Compute Cap.:   {}\n", cc));
        output.push_str(&format!("  Share Capacity: {}", self.share_capacity));
        output
    }

    fn to_compact(&self) -> String {
        format!(
            "{}:{} mem={} cores={} shares={}",
            self.device_id, self.name, self.memory, self.processing_units, self.share_capacity
        )
    }
}

/// Share capacity entry for one device
#[derive(Debug, Clone, Serialize)]
pub struct ShareEntry {
    pub device_id: u32,
    pub name: String,
    pub capacity: Decimal,
}

/// Share capacity report
#[derive(Debug, Clone, Serialize)]
pub struct ShareReport {
    pub slot_key: String,
    pub entries: Vec<ShareEntry>,
    pub total_capacity: Decimal,
}

impl TableDisplay for ShareReport {
    fn to_table(&self) -> String {
        let mut output = format!("Slot: {}\n\n", self.slot_key);
        for entry in &self.entries {
            output.push_str(&format!(
                "[{}] {} -> {} shares\n",
                entry.device_id, entry.name, entry.capacity
            ));
        }
        output.push_str(&format!("\nTotal: {} shares", self.total_capacity));
        output
    }

    fn to_compact(&self) -> String {
        format!("{}={}", self.slot_key, self.total_capacity)
    }
}

/// Allocation result with the generated binding
#[derive(Debug, Clone, Serialize)]
pub struct AllocationReport {
    pub requested: Decimal,
    pub grant: DeviceShareMap,
    pub binding: ContainerBinding,
}

impl TableDisplay for AllocationReport {
    fn to_table(&self) -> String {
        let mut output = format!("Requested: {} shares\n\nGrant:\n", self.requested);
        for (device_id, share) in self.grant.iter() {
            output.push_str(&format!("  device {} -> {} shares\n", device_id, share));
        }

        output.push_str("\nBinding:\n");
        for env in &self.binding.env {
            output.push_str(&format!("  env {}\n", env));
        }
        if let Some(runtime) = &self.binding.runtime {
            output.push_str(&format!("  runtime {}\n", runtime));
        }
        for dev in &self.binding.devices {
            output.push_str(&format!("  device-node {}\n", dev));
        }
        for vol in &self.binding.volumes {
            output.push_str(&format!("  volume {}\n", vol));
        }

        output
    }

    fn to_compact(&self) -> String {
        let devices: Vec<String> = self
            .grant
            .iter()
            .map(|(id, share)| format!("{}:{}", id, share))
            .collect();
        format!("{} -> [{}]", self.requested, devices.join(","))
    }
}

/// Compatibility check output
#[derive(Debug, Clone, Serialize)]
pub struct CompatOutput {
    pub driver_version: String,
    pub nvml_version: String,
    #[serde(flatten)]
    pub report: CompatReport,
}

impl TableDisplay for CompatOutput {
    fn to_table(&self) -> String {
        let min = self
            .report
            .min_driver
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());

        let mut output = format!("Driver:      {}\n", self.driver_version);
        output.push_str(&format!("NVML:        {}\n", self.nvml_version));
        output.push_str(&format!(
            "CUDA:        {}.{}\n",
            self.report.cuda.0, self.report.cuda.1
        ));
        output.push_str(&format!("Min. Driver: {}\n", min));
        output.push_str(&format!("Status:      {}", self.report.status));
        output
    }

    fn to_compact(&self) -> String {
        format!("{}", self.report.status)
    }
}
