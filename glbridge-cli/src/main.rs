// CLI application
use clap::Parser;
use glbridge_cli::commands::{
    load_bridge_config, open_device, print_report, print_shader, replay, write_device_config,
    DeviceKind,
};
use glbridge_cli::trace::Trace;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// Traces shorter than this replay without a progress bar.
const PROGRESS_THRESHOLD: usize = 1000;

#[derive(Parser)]
#[command(name = "glbridge")]
#[command(about = "Fixed-function GL emulation over a programmable GPU pipeline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print the fixed-function WGSL program
    Shader {
        /// Write the program to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replay a JSON trace of legacy GL calls and report the draws
    Replay {
        /// Path to the trace file
        trace: PathBuf,

        /// Device to replay against
        #[arg(long, value_enum, default_value = "recording")]
        device: DeviceKind,

        /// Device config (wgpu only)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Bridge config
        #[arg(long)]
        bridge_config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a device config file, filling in defaults
    DeviceConfig {
        /// Path to the config file
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Shader { output } => {
            print_shader(output.as_deref())?;
        }
        Commands::Replay {
            trace,
            device,
            config,
            bridge_config,
            json,
        } => {
            let trace = Trace::load(&trace)?;
            let bridge_config = load_bridge_config(bridge_config.as_deref())?;
            let gpu = open_device(device, config.as_deref())?;

            let pb = create_progress_bar(trace.len(), json)?;
            let mut report = replay(&trace, gpu, bridge_config, &pb)?;
            pb.finish_and_clear();

            report.device = format!("{:?}", device).to_lowercase();
            print_report(&report, json)?;
        }
        Commands::DeviceConfig { path } => {
            write_device_config(&path)?;
        }
    }

    Ok(())
}

fn create_progress_bar(len: usize, quiet: bool) -> anyhow::Result<ProgressBar> {
    if quiet || len < PROGRESS_THRESHOLD {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} calls {msg}")?
            .progress_chars("=> "),
    );
    pb.set_message("replaying");
    Ok(pb)
}
