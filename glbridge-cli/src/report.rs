// Draw reporting for trace replay
use glbridge_core::assembler::FLOATS_PER_VERTEX;
use glbridge_core::gl::{GLenum, IndexType, PrimitiveMode};
use glbridge_core::shading::shade_vertex;
use glbridge_core::{GpuDevice, Result, UniformBlock};
use serde::Serialize;
use std::fmt;

/// One draw as seen by the device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawSummary {
    /// Position of the call in the trace that produced the draw.
    pub call: usize,
    pub mode: PrimitiveMode,
    /// Vertices streamed for the draw.
    pub vertices: usize,
    /// Indices drawn, for indexed draws.
    pub indices: Option<usize>,
    pub index_type: Option<IndexType>,
    /// Vertex-stage color of the first drawn vertex, before texturing and fog.
    pub first_color: Option<[f32; 4]>,
}

impl fmt::Display for DrawSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:<5} {:?} vertices={}", self.call, self.mode, self.vertices)?;
        if let (Some(count), Some(ty)) = (self.indices, self.index_type) {
            write!(f, " indexed={} ({:?})", count, ty)?;
        }
        if let Some([r, g, b, a]) = self.first_color {
            write!(f, " color=({:.3}, {:.3}, {:.3}, {:.3})", r, g, b, a)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    pub device: String,
    pub calls: usize,
    pub ready: bool,
    pub draws: Vec<DrawSummary>,
    pub uniform_uploads: usize,
}

/// Forwards to `inner` and keeps a [`DrawSummary`] per draw.
pub struct ReportingDevice<D> {
    inner: D,
    call: usize,
    vertices: Vec<f32>,
    first_index: Option<u32>,
    uniforms: UniformBlock,
    draws: Vec<DrawSummary>,
    uniform_uploads: usize,
}

impl<D: GpuDevice> ReportingDevice<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            call: 0,
            vertices: Vec::new(),
            first_index: None,
            uniforms: UniformBlock::default(),
            draws: Vec::new(),
            uniform_uploads: 0,
        }
    }

    /// Attribute following draws to trace call `index`.
    pub fn set_call(&mut self, index: usize) {
        self.call = index;
    }

    pub fn draws(&self) -> &[DrawSummary] {
        &self.draws
    }

    pub fn uniform_uploads(&self) -> usize {
        self.uniform_uploads
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    fn streamed_vertices(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    /// Run vertex `index` of the last stream through the CPU shading path.
    fn shade(&self, index: usize) -> Option<[f32; 4]> {
        let start = index * FLOATS_PER_VERTEX;
        let vertex: &[f32; FLOATS_PER_VERTEX] = self
            .vertices
            .get(start..start + FLOATS_PER_VERTEX)?
            .try_into()
            .ok()?;
        Some(shade_vertex(&self.uniforms, vertex).color)
    }
}

impl<D: GpuDevice> GpuDevice for ReportingDevice<D> {
    fn create_program(&mut self, source: &str) -> Result<()> {
        self.inner.create_program(source)
    }

    fn destroy_program(&mut self) {
        self.inner.destroy_program()
    }

    fn create_stream_buffers(&mut self) -> Result<()> {
        self.inner.create_stream_buffers()
    }

    fn destroy_stream_buffers(&mut self) {
        self.inner.destroy_stream_buffers()
    }

    fn write_uniforms(&mut self, block: &UniformBlock) {
        self.uniform_uploads += 1;
        self.uniforms = *block;
        self.inner.write_uniforms(block)
    }

    fn stream_vertices(&mut self, vertices: &[f32]) -> Result<()> {
        self.inner.stream_vertices(vertices)?;
        self.vertices.clear();
        self.vertices.extend_from_slice(vertices);
        Ok(())
    }

    fn stream_indices(&mut self, indices: &[u8], ty: IndexType) -> Result<()> {
        self.inner.stream_indices(indices, ty)?;
        self.first_index = (indices.len() >= ty.size()).then(|| ty.read(indices, 0));
        Ok(())
    }

    fn draw_arrays(&mut self, mode: PrimitiveMode, count: usize) {
        self.draws.push(DrawSummary {
            call: self.call,
            mode,
            vertices: count,
            indices: None,
            index_type: None,
            first_color: self.shade(0),
        });
        self.inner.draw_arrays(mode, count)
    }

    fn draw_indexed(&mut self, mode: PrimitiveMode, count: usize, ty: IndexType) {
        self.draws.push(DrawSummary {
            call: self.call,
            mode,
            vertices: self.streamed_vertices(),
            indices: Some(count),
            index_type: Some(ty),
            first_color: self.first_index.and_then(|i| self.shade(i as usize)),
        });
        self.inner.draw_indexed(mode, count, ty)
    }

    fn set_capability(&mut self, cap: GLenum, enabled: bool) {
        self.inner.set_capability(cap, enabled)
    }

    fn capability(&self, cap: GLenum) -> bool {
        self.inner.capability(cap)
    }

    fn get_float(&self, pname: GLenum, out: &mut [f32]) -> usize {
        self.inner.get_float(pname, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glbridge_core::gl;
    use glbridge_core::{Bridge, RecordingDevice};

    #[test]
    fn test_indexed_draw_summary() {
        let mut bridge = Bridge::new(ReportingDevice::new(RecordingDevice::new()));
        bridge.init().unwrap();
        bridge.device_mut().set_call(7);
        bridge.draw_elements(gl::TRIANGLES, 3, gl::UNSIGNED_BYTE, &[0u8, 4, 1]);
        let draw = &bridge.device().draws()[0];
        assert_eq!(draw.call, 7);
        assert_eq!(draw.vertices, 5);
        assert_eq!(draw.indices, Some(3));
        assert_eq!(
            draw.to_string(),
            "#7     Triangles vertices=5 indexed=3 (U8) color=(1.000, 1.000, 1.000, 1.000)"
        );
        assert!(bridge.device().uniform_uploads() >= 1);
        assert_eq!(bridge.device().inner().draws().len(), 1);
    }

    #[test]
    fn test_first_color_follows_lighting() {
        let mut bridge = Bridge::new(ReportingDevice::new(RecordingDevice::new()));
        bridge.init().unwrap();
        bridge.color4f(0.5, 0.5, 0.5, 1.0);
        bridge.enable(gl::LIGHTING);
        bridge.light_modelfv(gl::LIGHT_MODEL_AMBIENT, &[0.0, 0.0, 0.0, 1.0]);

        // No light enabled and no ambient: everything goes black.
        bridge.begin(gl::TRIANGLES);
        bridge.vertex3f(0.0, 0.0, 0.0);
        bridge.vertex3f(1.0, 0.0, 0.0);
        bridge.vertex3f(0.0, 1.0, 0.0);
        bridge.end();

        let color = bridge.device().draws()[0].first_color.unwrap();
        assert_eq!(&color[..3], &[0.0, 0.0, 0.0]);
        assert_eq!(color[3], 1.0);
    }
}
