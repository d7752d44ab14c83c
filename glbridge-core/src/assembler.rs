//! Interleaves client arrays into the single vertex layout the shader
//! consumes: position(3) normal(3) texcoord(2) color(4).

use crate::arrays::{ArrayChannel, ClientArrays};
use crate::error::{BridgeError, Result};
use crate::gl::IndexType;
use log::warn;

/// Floats per interleaved vertex.
pub const FLOATS_PER_VERTEX: usize = 12;
/// Bytes per interleaved vertex.
pub const VERTEX_STRIDE: usize = FLOATS_PER_VERTEX * std::mem::size_of::<f32>();

const DEFAULT_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];
const DEFAULT_TEXCOORD: [f32; 2] = [0.0, 0.0];

/// Reusable CPU scratch for interleaved vertices. Grows, never shrinks.
#[derive(Debug, Default)]
pub struct GeometryAssembler {
    scratch: Vec<f32>,
}

impl GeometryAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the scratch for `vertices` vertices.
    pub fn with_capacity(vertices: usize) -> Result<Self> {
        let mut asm = Self::new();
        asm.reserve(vertices)?;
        Ok(asm)
    }

    /// Capacity of the scratch in vertices.
    pub fn capacity(&self) -> usize {
        self.scratch.capacity() / FLOATS_PER_VERTEX
    }

    fn reserve(&mut self, vertices: usize) -> Result<()> {
        let floats = vertices
            .checked_mul(FLOATS_PER_VERTEX)
            .ok_or(BridgeError::ScratchAlloc { bytes: usize::MAX })?;
        self.scratch.clear();
        self.scratch
            .try_reserve(floats)
            .map_err(|_| BridgeError::ScratchAlloc {
                bytes: floats.saturating_mul(std::mem::size_of::<f32>()),
            })
    }

    /// Assemble `count` vertices starting at vertex `first` of each channel.
    ///
    /// Position is read whenever a source is set; normal, texcoord and
    /// color also need their array enabled. Absent channels get defaults
    /// (origin, +Z, (0,0), `current_color`). Elements that would read past
    /// the end of their source also get defaults.
    pub fn assemble(
        &mut self,
        arrays: &ClientArrays,
        current_color: [f32; 4],
        first: usize,
        count: usize,
    ) -> Result<&[f32]> {
        self.reserve(count)?;

        let use_normal = arrays.normal.enabled && arrays.normal.has_source();
        let use_texcoord = arrays.texcoord.enabled && arrays.texcoord.has_source();
        let use_color = arrays.color.enabled && arrays.color.has_source();
        let mut clipped = 0usize;

        for i in 0..count {
            let mut pos = [0.0, 0.0, 0.0, 1.0];
            if arrays.position.has_source()
                && !arrays
                    .position
                    .read_vertex(ArrayChannel::Position, first, i, &mut pos)
            {
                clipped += 1;
            }

            let mut normal = [DEFAULT_NORMAL[0], DEFAULT_NORMAL[1], DEFAULT_NORMAL[2], 0.0];
            if use_normal {
                let mut v = [0.0; 4];
                if arrays.normal.read_vertex(ArrayChannel::Normal, first, i, &mut v) {
                    normal = v;
                } else {
                    clipped += 1;
                }
            }

            let mut tex = [DEFAULT_TEXCOORD[0], DEFAULT_TEXCOORD[1], 0.0, 1.0];
            if use_texcoord {
                let mut v = [0.0, 0.0, 0.0, 1.0];
                if arrays.texcoord.read_vertex(ArrayChannel::TexCoord, first, i, &mut v) {
                    tex = v;
                } else {
                    clipped += 1;
                }
            }

            let mut color = current_color;
            if use_color {
                let mut v = [0.0, 0.0, 0.0, 1.0];
                if arrays.color.read_vertex(ArrayChannel::Color, first, i, &mut v) {
                    color = v;
                } else {
                    clipped += 1;
                }
            }

            self.scratch.extend_from_slice(&pos[..3]);
            self.scratch.extend_from_slice(&normal[..3]);
            self.scratch.extend_from_slice(&tex[..2]);
            self.scratch.extend_from_slice(&color);
        }

        if clipped > 0 {
            warn!(
                "assemble: {} element(s) outside their client array, defaults used",
                clipped
            );
        }

        Ok(&self.scratch)
    }
}

/// `max(index) + 1` over the first `count` indices; 0 for an empty list.
///
/// `count` is clamped to the whole indices available in `indices`.
pub fn effective_vertex_count(indices: &[u8], count: usize, ty: IndexType) -> usize {
    let count = count.min(indices.len() / ty.size());
    (0..count)
        .map(|i| ty.read(indices, i) as usize + 1)
        .max()
        .unwrap_or(0)
}
