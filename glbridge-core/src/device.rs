//! The programmable-pipeline boundary.
//!
//! A `GpuDevice` knows nothing about legacy state. It builds the one shader
//! program, owns the uniform buffer and the streaming vertex/index buffers,
//! and issues draws with the interleaved 12-float vertex layout.

use crate::error::Result;
use crate::gl::{GLenum, IndexType, PrimitiveMode};
use crate::uniforms::UniformBlock;

pub trait GpuDevice {
    /// Compile and link the fixed-function program from WGSL source.
    fn create_program(&mut self, source: &str) -> Result<()>;

    fn destroy_program(&mut self);

    /// Allocate the streaming vertex and index buffers.
    fn create_stream_buffers(&mut self) -> Result<()>;

    fn destroy_stream_buffers(&mut self);

    fn write_uniforms(&mut self, block: &UniformBlock);

    /// Replace the streaming vertex buffer contents.
    fn stream_vertices(&mut self, vertices: &[f32]) -> Result<()>;

    /// Replace the streaming index buffer contents with raw index bytes.
    fn stream_indices(&mut self, indices: &[u8], ty: IndexType) -> Result<()>;

    /// Draw `count` vertices from the start of the streamed vertex buffer.
    fn draw_arrays(&mut self, mode: PrimitiveMode, count: usize);

    /// Draw `count` streamed indices.
    fn draw_indexed(&mut self, mode: PrimitiveMode, count: usize, ty: IndexType);

    /// Native capability the bridge does not emulate (depth test, blend, ...).
    fn set_capability(&mut self, cap: GLenum, enabled: bool);

    fn capability(&self, cap: GLenum) -> bool;

    /// Native `glGetFloatv`. Returns the number of values written, 0 when
    /// `pname` is unknown.
    fn get_float(&self, pname: GLenum, out: &mut [f32]) -> usize;
}

impl<D: GpuDevice + ?Sized> GpuDevice for Box<D> {
    fn create_program(&mut self, source: &str) -> Result<()> {
        (**self).create_program(source)
    }
    fn destroy_program(&mut self) {
        (**self).destroy_program()
    }
    fn create_stream_buffers(&mut self) -> Result<()> {
        (**self).create_stream_buffers()
    }
    fn destroy_stream_buffers(&mut self) {
        (**self).destroy_stream_buffers()
    }
    fn write_uniforms(&mut self, block: &UniformBlock) {
        (**self).write_uniforms(block)
    }
    fn stream_vertices(&mut self, vertices: &[f32]) -> Result<()> {
        (**self).stream_vertices(vertices)
    }
    fn stream_indices(&mut self, indices: &[u8], ty: IndexType) -> Result<()> {
        (**self).stream_indices(indices, ty)
    }
    fn draw_arrays(&mut self, mode: PrimitiveMode, count: usize) {
        (**self).draw_arrays(mode, count)
    }
    fn draw_indexed(&mut self, mode: PrimitiveMode, count: usize, ty: IndexType) {
        (**self).draw_indexed(mode, count, ty)
    }
    fn set_capability(&mut self, cap: GLenum, enabled: bool) {
        (**self).set_capability(cap, enabled)
    }
    fn capability(&self, cap: GLenum) -> bool {
        (**self).capability(cap)
    }
    fn get_float(&self, pname: GLenum, out: &mut [f32]) -> usize {
        (**self).get_float(pname, out)
    }
}
