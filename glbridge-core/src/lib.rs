//! Fixed-function GL emulation on top of a programmable GPU pipeline.
//!
//! [`Bridge`] exposes the legacy entry points (matrix stack, lights, fog,
//! alpha test, client arrays, immediate mode) and turns every draw into a
//! uniform upload plus a streamed draw on a [`GpuDevice`].

pub mod arrays;
pub mod assembler;
pub mod bridge;
pub mod config;
pub mod device;
pub mod error;
pub mod gl;
pub mod immediate;
pub mod matrix;
pub mod recording;
pub mod shader;
pub mod shading;
pub mod state;
pub mod transform;
pub mod uniforms;

pub use bridge::Bridge;
pub use config::BridgeConfig;
pub use device::GpuDevice;
pub use error::{BridgeError, Result, ShaderStage};
pub use recording::RecordingDevice;
pub use uniforms::UniformBlock;
