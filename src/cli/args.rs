//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use rust_decimal::Decimal;

/// CUDA accelerator plugin tool
///
/// Detect CUDA devices, report share capacity, and generate container
/// resource bindings.
#[derive(Parser, Debug)]
#[command(name = "cuda-accel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "CUDA_ACCEL_CONFIG")]
    pub config: Option<String>,

    /// Target device by index (0-based)
    #[arg(long, global = true)]
    pub device: Option<u32>,

    /// Target device by name (partial match)
    #[arg(long, global = true)]
    pub device_name: Option<String>,

    /// Target device by UUID
    #[arg(long, global = true)]
    pub device_uuid: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all detected CUDA devices
    List,

    /// Show detailed device information
    Info,

    /// Report share capacity per device
    Shares,

    /// Simulate an allocation and show the resulting binding
    Allocate(AllocateArgs),

    /// Generate the container binding for specific devices
    Binding(BindingArgs),

    /// Check driver/CUDA compatibility
    Doctor,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the allocate command
#[derive(Parser, Debug)]
pub struct AllocateArgs {
    /// Number of shares to allocate (e.g., 1.5)
    #[arg(long)]
    pub shares: Decimal,
}

/// Arguments for the binding command
#[derive(Parser, Debug)]
pub struct BindingArgs {
    /// Device indices to bind, comma-separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub devices: Vec<u32>,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Pretty-printed JSON
    Json,
    /// Single-line compact output
    Compact,
}

/// Generate shell completions to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cli_parses_list() {
        let cli = Cli::try_parse_from(["cuda-accel", "list"]).unwrap();
        assert!(matches!(cli.command, Commands::List));
    }

    #[test]
    fn test_cli_parses_allocate_shares() {
        let cli = Cli::try_parse_from(["cuda-accel", "allocate", "--shares", "1.5"]).unwrap();
        match cli.command {
            Commands::Allocate(args) => assert_eq!(args.shares, dec!(1.5)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parses_binding_devices() {
        let cli =
            Cli::try_parse_from(["cuda-accel", "binding", "--devices", "0,2,3"]).unwrap();
        match cli.command {
            Commands::Binding(args) => assert_eq!(args.devices, vec![0, 2, 3]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_bad_shares() {
        assert!(Cli::try_parse_from(["cuda-accel", "allocate", "--shares", "abc"]).is_err());
    }

    #[test]
    fn test_cli_global_flags() {
        let cli =
            Cli::try_parse_from(["cuda-accel", "info", "--device", "1", "--format", "json"])
                .unwrap();
        assert_eq!(cli.device, Some(1));
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
