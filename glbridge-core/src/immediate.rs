// Immediate-mode vertex recording.
//
// Between glBegin and glEnd the caller submits vertices one at a time,
// stamped with whatever normal, texcoord and color are latched at that
// moment. Vertices land in a fixed-capacity buffer already laid out the
// way the shader reads them, so `end` can upload it as-is.

use crate::gl::PrimitiveMode;
use bytemuck::{Pod, Zeroable};
use log::warn;

/// Maximum vertices recorded between one begin/end pair.
pub const IMMEDIATE_CAPACITY: usize = 8192;

// ── Vertex layout ───────────────────────────────────────────────

/// One recorded vertex, byte-compatible with the interleaved layout.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ImmediateVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
    pub color: [f32; 4],
}

// ── Recorder ────────────────────────────────────────────────────

/// A finished begin/end block ready to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImmediateBatch {
    pub mode: PrimitiveMode,
    pub vertex_count: usize,
}

pub struct ImmediateRecorder {
    vertices: Box<[ImmediateVertex]>,
    count: usize,
    dropped: usize,
    mode: PrimitiveMode,
    active: bool,
    normal: [f32; 3],
    texcoord: [f32; 2],
}

impl Default for ImmediateRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImmediateRecorder {
    pub fn new() -> Self {
        Self {
            vertices: vec![ImmediateVertex::zeroed(); IMMEDIATE_CAPACITY].into_boxed_slice(),
            count: 0,
            dropped: 0,
            mode: PrimitiveMode::Triangles,
            active: false,
            normal: [0.0, 0.0, 1.0],
            texcoord: [0.0, 0.0],
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mode(&self) -> PrimitiveMode {
        self.mode
    }

    /// Vertices recorded so far, in submission order.
    pub fn vertices(&self) -> &[ImmediateVertex] {
        &self.vertices[..self.count]
    }

    /// Start a new block. An unfinished block is discarded.
    pub fn begin(&mut self, mode: PrimitiveMode) {
        if self.active && self.count > 0 {
            warn!(
                "glBegin while a {:?} block is open, discarding {} vertices",
                self.mode, self.count
            );
        }
        self.mode = mode;
        self.count = 0;
        self.dropped = 0;
        self.active = true;
    }

    pub fn set_normal(&mut self, x: f32, y: f32, z: f32) {
        self.normal = [x, y, z];
    }

    pub fn set_texcoord(&mut self, s: f32, t: f32) {
        self.texcoord = [s, t];
    }

    /// Record a vertex with the latched attributes and `color`.
    /// Past capacity the vertex is counted and dropped.
    pub fn vertex(&mut self, x: f32, y: f32, z: f32, color: [f32; 4]) {
        if self.count >= IMMEDIATE_CAPACITY {
            self.dropped += 1;
            return;
        }
        self.vertices[self.count] = ImmediateVertex {
            position: [x, y, z],
            normal: self.normal,
            texcoord: self.texcoord,
            color,
        };
        self.count += 1;
    }

    /// Close the block. Returns the batch to draw, or `None` when there is
    /// nothing to draw or no block was open.
    ///
    /// The recorded vertices stay readable through [`vertices`] until
    /// `finish` or the next `begin`.
    ///
    /// [`vertices`]: Self::vertices
    pub fn end(&mut self) -> Option<ImmediateBatch> {
        if !self.active {
            warn!("glEnd called without matching glBegin");
            return None;
        }
        self.active = false;

        if self.dropped > 0 {
            warn!(
                "glEnd: immediate buffer full, dropped {} of {} vertices",
                self.dropped,
                self.dropped + self.count
            );
            self.dropped = 0;
        }

        if self.count == 0 {
            return None;
        }
        Some(ImmediateBatch {
            mode: self.mode,
            vertex_count: self.count,
        })
    }

    /// Forget the recorded vertices once they have been consumed.
    pub fn finish(&mut self) {
        self.count = 0;
    }

    /// Drop any open block. The next `end` draws nothing.
    pub fn abort(&mut self) {
        self.count = 0;
        self.dropped = 0;
        self.active = false;
    }
}
