//! Error types for the bridge.
//!
//! None of these ever escape a legacy entry point: draws and setters log and
//! degrade to "nothing drawn". They surface from `Bridge::init` and from the
//! `GpuDevice` seam so hosts and device implementations can report them.

use thiserror::Error;

/// Shader stage a build failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// A single module holding both stages failed to compile.
    Module,
    Vertex,
    Fragment,
    Link,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Module => f.write_str("module"),
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
            Self::Link => f.write_str("link"),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum BridgeError {
    /// The fixed shader pair failed to compile or link. All draws become
    /// no-ops until a later `init` succeeds.
    #[error("shader {stage} error: {log}")]
    ProgramBuild { stage: ShaderStage, log: String },

    /// The CPU-side interleave buffer could not grow.
    #[error("failed to reserve {bytes} bytes of vertex scratch")]
    ScratchAlloc { bytes: usize },

    /// Streaming vertex/index buffers are missing (not initialized or shut down).
    #[error("streaming buffers are not available")]
    BuffersUnavailable,

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
