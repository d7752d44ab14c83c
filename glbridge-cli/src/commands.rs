// CLI command handlers
use crate::report::{ReplayReport, ReportingDevice};
use crate::trace::{self, ArrayStore, Trace};
use anyhow::{Context, Result};
use glbridge_core::shader::FIXED_FUNCTION_WGSL;
use glbridge_core::{Bridge, BridgeConfig, GpuDevice, RecordingDevice};
use glbridge_runtime::{DeviceConfig, WgpuDevice};
use indicatif::ProgressBar;
use log::{info, warn};
use std::fs;
use std::path::Path;

/// Device a trace is replayed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DeviceKind {
    /// Record commands without touching a GPU
    Recording,
    /// Headless wgpu device
    Wgpu,
}

pub fn print_shader(output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, FIXED_FUNCTION_WGSL)
                .with_context(|| format!("Failed to write shader to {}", path.display()))?;
            println!("Shader written to: {}", path.display());
        }
        None => print!("{}", FIXED_FUNCTION_WGSL),
    }
    Ok(())
}

pub fn write_device_config(path: &Path) -> Result<()> {
    let config = DeviceConfig::load(path)?;
    config.save(path)?;
    println!("Device config written to: {}", path.display());
    Ok(())
}

pub fn load_bridge_config(path: Option<&Path>) -> Result<BridgeConfig> {
    let Some(path) = path else {
        return Ok(BridgeConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read bridge config {}", path.display()))?;
    let config: BridgeConfig =
        serde_json::from_str(&content).context("Failed to parse bridge config")?;
    config.validate()?;
    Ok(config)
}

pub fn open_device(kind: DeviceKind, config: Option<&Path>) -> Result<Box<dyn GpuDevice>> {
    Ok(match kind {
        DeviceKind::Recording => Box::new(RecordingDevice::new()),
        DeviceKind::Wgpu => {
            let config = match config {
                Some(path) => DeviceConfig::load(path)?,
                None => DeviceConfig::default(),
            };
            info!("opening wgpu device {}x{}", config.width, config.height);
            Box::new(WgpuDevice::new(config).context("Failed to open wgpu device")?)
        }
    })
}

/// Run every call of `trace` through a fresh bridge on `device`.
pub fn replay<D: GpuDevice>(
    trace: &Trace,
    device: D,
    config: BridgeConfig,
    progress: &ProgressBar,
) -> Result<ReplayReport> {
    let mut bridge = Bridge::with_config(ReportingDevice::new(device), config);
    let mut store = ArrayStore::default();

    for (index, call) in trace.calls.iter().enumerate() {
        bridge.device_mut().set_call(index);
        if let Err(e) = trace::apply(&mut bridge, &mut store, call) {
            // Init failures leave the bridge inert, same as in a real program.
            warn!("call #{} ({}) failed: {:#}", index, call.name(), e);
        }
        progress.inc(1);
    }

    let ready = bridge.is_ready();
    bridge.shutdown();
    let device = bridge.into_device();
    Ok(ReplayReport {
        device: String::new(),
        calls: trace.len(),
        ready,
        draws: device.draws().to_vec(),
        uniform_uploads: device.uniform_uploads(),
    })
}

pub fn print_report(report: &ReplayReport, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{}", out);
        return Ok(());
    }
    println!("Replayed {} calls on {} device", report.calls, report.device);
    for draw in &report.draws {
        println!("  {}", draw);
    }
    println!("  Draws: {}", report.draws.len());
    println!("  Uniform uploads: {}", report.uniform_uploads);
    Ok(())
}
