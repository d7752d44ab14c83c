//! A `GpuDevice` that performs no GPU work and keeps a log of everything it
//! was asked to do. Used by tests and by `glbridge replay`.

use crate::device::GpuDevice;
use crate::error::{BridgeError, Result, ShaderStage};
use crate::gl::{self, GLenum, IndexType, PrimitiveMode};
use crate::uniforms::UniformBlock;
use log::trace;
use serde::Serialize;
use std::collections::HashSet;

/// One command as received by the device.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DeviceCommand {
    CreateProgram { ok: bool },
    DestroyProgram,
    CreateStreamBuffers,
    DestroyStreamBuffers,
    WriteUniforms,
    StreamVertices { floats: usize },
    StreamIndices { bytes: usize, ty: IndexType },
    DrawArrays { mode: PrimitiveMode, count: usize },
    DrawIndexed { mode: PrimitiveMode, count: usize, ty: IndexType },
    SetCapability { cap: GLenum, enabled: bool },
}

/// A draw together with the state the GPU would have seen.
#[derive(Debug, Clone)]
pub struct RecordedDraw {
    pub mode: PrimitiveMode,
    /// Vertices for array draws, indices for indexed draws.
    pub count: usize,
    pub index_type: Option<IndexType>,
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    pub uniforms: UniformBlock,
}

impl RecordedDraw {
    pub fn is_indexed(&self) -> bool {
        self.index_type.is_some()
    }

    /// Number of streamed 12-float vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / crate::assembler::FLOATS_PER_VERTEX
    }
}

#[derive(Debug, Clone)]
pub struct RecordingDevice {
    commands: Vec<DeviceCommand>,
    draws: Vec<RecordedDraw>,
    fail_stage: Option<ShaderStage>,
    has_program: bool,
    has_buffers: bool,
    uniforms: UniformBlock,
    vertices: Vec<f32>,
    indices: Vec<u32>,
    capabilities: HashSet<GLenum>,
    viewport: [f32; 4],
}

impl Default for RecordingDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            draws: Vec::new(),
            fail_stage: None,
            has_program: false,
            has_buffers: false,
            uniforms: UniformBlock::default(),
            vertices: Vec::new(),
            indices: Vec::new(),
            capabilities: HashSet::new(),
            viewport: [0.0, 0.0, 640.0, 480.0],
        }
    }

    /// Make every later `create_program` fail at `stage`.
    pub fn fail_compile(mut self, stage: ShaderStage) -> Self {
        self.fail_stage = Some(stage);
        self
    }

    pub fn set_fail_compile(&mut self, stage: Option<ShaderStage>) {
        self.fail_stage = stage;
    }

    pub fn set_viewport(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.viewport = [x, y, w, h];
    }

    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    pub fn last_draw(&self) -> Option<&RecordedDraw> {
        self.draws.last()
    }

    pub fn has_program(&self) -> bool {
        self.has_program
    }

    pub fn has_buffers(&self) -> bool {
        self.has_buffers
    }

    /// Last uniform block written.
    pub fn uniforms(&self) -> &UniformBlock {
        &self.uniforms
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.draws.clear();
    }
}

impl GpuDevice for RecordingDevice {
    fn create_program(&mut self, _source: &str) -> Result<()> {
        if let Some(stage) = self.fail_stage {
            self.commands.push(DeviceCommand::CreateProgram { ok: false });
            self.has_program = false;
            return Err(BridgeError::ProgramBuild {
                stage,
                log: "simulated compile failure".to_string(),
            });
        }
        self.commands.push(DeviceCommand::CreateProgram { ok: true });
        self.has_program = true;
        Ok(())
    }

    fn destroy_program(&mut self) {
        self.commands.push(DeviceCommand::DestroyProgram);
        self.has_program = false;
    }

    fn create_stream_buffers(&mut self) -> Result<()> {
        self.commands.push(DeviceCommand::CreateStreamBuffers);
        self.has_buffers = true;
        Ok(())
    }

    fn destroy_stream_buffers(&mut self) {
        self.commands.push(DeviceCommand::DestroyStreamBuffers);
        self.has_buffers = false;
        self.vertices.clear();
        self.indices.clear();
    }

    fn write_uniforms(&mut self, block: &UniformBlock) {
        self.commands.push(DeviceCommand::WriteUniforms);
        self.uniforms = *block;
    }

    fn stream_vertices(&mut self, vertices: &[f32]) -> Result<()> {
        if !self.has_buffers {
            return Err(BridgeError::BuffersUnavailable);
        }
        self.commands.push(DeviceCommand::StreamVertices {
            floats: vertices.len(),
        });
        self.vertices.clear();
        self.vertices.extend_from_slice(vertices);
        Ok(())
    }

    fn stream_indices(&mut self, indices: &[u8], ty: IndexType) -> Result<()> {
        if !self.has_buffers {
            return Err(BridgeError::BuffersUnavailable);
        }
        self.commands.push(DeviceCommand::StreamIndices {
            bytes: indices.len(),
            ty,
        });
        let n = indices.len() / ty.size();
        self.indices.clear();
        self.indices.extend((0..n).map(|i| ty.read(indices, i)));
        Ok(())
    }

    fn draw_arrays(&mut self, mode: PrimitiveMode, count: usize) {
        trace!("recording: draw_arrays {:?} x{}", mode, count);
        self.commands.push(DeviceCommand::DrawArrays { mode, count });
        self.draws.push(RecordedDraw {
            mode,
            count,
            index_type: None,
            vertices: self.vertices.clone(),
            indices: Vec::new(),
            uniforms: self.uniforms,
        });
    }

    fn draw_indexed(&mut self, mode: PrimitiveMode, count: usize, ty: IndexType) {
        trace!("recording: draw_indexed {:?} x{} ({:?})", mode, count, ty);
        self.commands.push(DeviceCommand::DrawIndexed { mode, count, ty });
        self.draws.push(RecordedDraw {
            mode,
            count,
            index_type: Some(ty),
            vertices: self.vertices.clone(),
            indices: self.indices.clone(),
            uniforms: self.uniforms,
        });
    }

    fn set_capability(&mut self, cap: GLenum, enabled: bool) {
        self.commands.push(DeviceCommand::SetCapability { cap, enabled });
        if enabled {
            self.capabilities.insert(cap);
        } else {
            self.capabilities.remove(&cap);
        }
    }

    fn capability(&self, cap: GLenum) -> bool {
        self.capabilities.contains(&cap)
    }

    fn get_float(&self, pname: GLenum, out: &mut [f32]) -> usize {
        let values: &[f32] = match pname {
            gl::VIEWPORT => &self.viewport,
            gl::DEPTH_RANGE => &[0.0, 1.0],
            _ => return 0,
        };
        let n = values.len().min(out.len());
        out[..n].copy_from_slice(&values[..n]);
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaming_requires_buffers() {
        let mut dev = RecordingDevice::new();
        assert!(matches!(
            dev.stream_vertices(&[0.0; 12]),
            Err(BridgeError::BuffersUnavailable)
        ));
        dev.create_stream_buffers().unwrap();
        assert!(dev.stream_vertices(&[0.0; 12]).is_ok());
    }

    #[test]
    fn simulated_failure_reports_stage() {
        let mut dev = RecordingDevice::new().fail_compile(ShaderStage::Fragment);
        match dev.create_program("") {
            Err(BridgeError::ProgramBuild { stage, .. }) => assert_eq!(stage, ShaderStage::Fragment),
            other => panic!("unexpected {other:?}"),
        }
        assert!(!dev.has_program());
    }

    #[test]
    fn draws_snapshot_streamed_data() {
        let mut dev = RecordingDevice::new();
        dev.create_stream_buffers().unwrap();
        dev.stream_vertices(&[1.0; 24]).unwrap();
        dev.stream_indices(&[0, 1, 1], IndexType::U8).unwrap();
        dev.draw_indexed(PrimitiveMode::Lines, 3, IndexType::U8);
        let draw = dev.last_draw().unwrap();
        assert_eq!(draw.vertex_count(), 2);
        assert_eq!(draw.indices, vec![0, 1, 1]);
        assert!(draw.is_indexed());
    }

    #[test]
    fn capabilities_and_queries() {
        let mut dev = RecordingDevice::new();
        dev.set_capability(gl::DEPTH_TEST, true);
        assert!(dev.capability(gl::DEPTH_TEST));
        dev.set_capability(gl::DEPTH_TEST, false);
        assert!(!dev.capability(gl::DEPTH_TEST));

        let mut out = [0.0; 4];
        assert_eq!(dev.get_float(gl::VIEWPORT, &mut out), 4);
        assert_eq!(out, [0.0, 0.0, 640.0, 480.0]);
        assert_eq!(dev.get_float(0xFFFF, &mut out), 0);
    }
}
