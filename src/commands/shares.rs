//! Shares command implementation
//!
//! Reports share capacity per device and in total.

use crate::accel::Accelerator;
use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, ShareEntry, ShareReport};
use crate::commands::build_accelerator;
use crate::config::Config;
use crate::error::Result;

/// Execute the shares command
pub fn run_shares(config: &Config, format: OutputFormat) -> Result<()> {
    let accel = build_accelerator(config)?;
    let shares = accel.device_shares()?;

    let entries: Vec<ShareEntry> = shares
        .iter()
        .map(|(info, capacity)| ShareEntry {
            device_id: info.device_id.index(),
            name: info.model_name.clone(),
            capacity: *capacity,
        })
        .collect();

    let total_capacity = shares.iter().map(|(_, capacity)| *capacity).sum();

    let report = ShareReport {
        slot_key: accel.slot_key().to_string(),
        entries,
        total_capacity,
    };

    print_output(&report, format)?;

    Ok(())
}
