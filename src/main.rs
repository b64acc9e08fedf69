//! cuda-accel - CUDA accelerator plugin tool
//!
//! A command-line tool for CUDA device detection, share capacity
//! reporting, and container resource binding generation.

use clap::Parser;
use cuda_accel::cli::args::{generate_completions, Cli, Commands};
use cuda_accel::commands::{
    run_allocate, run_binding, run_doctor, run_info, run_list, run_shares,
};
use cuda_accel::config::{Config, ConfigBuilder};
use cuda_accel::error::AppError;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Set log level based on verbose flag
    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    // Merge file config with CLI overrides
    let config = ConfigBuilder::new()
        .with_file(cli.config.as_deref())
        .with_verbose(Some(cli.verbose))
        .with_device_name(cli.device_name.clone())
        .with_device_uuid(cli.device_uuid.clone())
        .build();

    // Run the appropriate command
    let result = run(&cli, &config).await;

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    match &cli.command {
        Commands::List => run_list(config, cli.format),

        Commands::Info => run_info(config, cli.format, cli.device),

        Commands::Shares => run_shares(config, cli.format),

        Commands::Allocate(args) => run_allocate(config, cli.format, args).await,

        Commands::Binding(args) => run_binding(config, cli.format, args).await,

        Commands::Doctor => run_doctor(config, cli.format),

        Commands::Completions { shell } => {
            generate_completions(*shell);
            Ok(())
        }
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Nvml(cuda_accel::error::NvmlError::LibraryNotFound) => {
            eprintln!();
            eprintln!("Hint: Make sure the NVIDIA driver is installed.");
            eprintln!("      On Linux, install the nvidia-utils package.");
        }
        AppError::Nvml(cuda_accel::error::NvmlError::InsufficientPermissions(_)) => {
            eprintln!();
            eprintln!("Hint: Try running with sudo or as root.");
        }
        AppError::NoDevicesFound => {
            eprintln!();
            eprintln!("Hint: Make sure you have an NVIDIA GPU installed.");
            eprintln!("      Check 'nvidia-smi' for device detection.");
        }
        AppError::Docker(_) => {
            eprintln!();
            eprintln!("Hint: The nvidia-docker v1 binding needs the plugin daemon running.");
            eprintln!("      Set [docker] prefer_v2 = true to use the nvidia runtime instead.");
        }
        _ => {}
    }
}
