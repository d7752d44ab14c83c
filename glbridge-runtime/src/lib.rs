//! wgpu backend for the fixed-function bridge.

pub mod config;
pub mod pipeline;
pub mod topology;
pub mod wgpu_device;

pub use config::DeviceConfig;
pub use pipeline::{PipelineCache, PipelineKey};
pub use wgpu_device::WgpuDevice;
