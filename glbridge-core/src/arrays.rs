//! Client-side vertex array descriptors.
//!
//! A descriptor only records where caller memory lives and how to decode
//! it. Nothing is copied until the geometry assembler runs for a draw.

use crate::gl::{self, ElementType, GLenum};
use log::warn;
use std::ptr::NonNull;

/// The four legacy client array channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayChannel {
    Position,
    Normal,
    Color,
    TexCoord,
}

impl ArrayChannel {
    pub fn from_gl(array: GLenum) -> Option<Self> {
        match array {
            gl::VERTEX_ARRAY => Some(Self::Position),
            gl::NORMAL_ARRAY => Some(Self::Normal),
            gl::COLOR_ARRAY => Some(Self::Color),
            gl::TEXTURE_COORD_ARRAY => Some(Self::TexCoord),
            _ => None,
        }
    }

    /// Integer normals and colors are mapped into [-1,1] / [0,1].
    pub fn normalizes_integers(self) -> bool {
        matches!(self, Self::Normal | Self::Color)
    }
}

/// Borrowed view of caller memory, kept as a raw pointer plus length so the
/// descriptor can outlive the call that set it.
#[derive(Debug, Clone, Copy)]
struct ArraySource {
    ptr: NonNull<u8>,
    len: usize,
}

/// One client array: enable flag plus pointer/stride/component/type.
#[derive(Debug, Clone, Copy)]
pub struct ClientArrayDescriptor {
    pub enabled: bool,
    pub components: usize,
    pub element_type: ElementType,
    /// Byte stride as given by the caller; 0 means tightly packed.
    pub stride: usize,
    source: Option<ArraySource>,
}

impl ClientArrayDescriptor {
    fn new(components: usize) -> Self {
        Self {
            enabled: false,
            components,
            element_type: ElementType::Float,
            stride: 0,
            source: None,
        }
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Stride actually used to step between vertices.
    pub fn effective_stride(&self) -> usize {
        if self.stride != 0 {
            self.stride
        } else {
            self.components * self.element_type.size()
        }
    }

    /// Bytes of the current source, if any.
    pub(crate) fn bytes(&self) -> Option<&[u8]> {
        let src = self.source?;
        // SAFETY: `set_pointer` requires the memory to remain valid and
        // unmodified until the draw that consumes it has returned.
        Some(unsafe { std::slice::from_raw_parts(src.ptr.as_ptr(), src.len) })
    }

    /// Decode vertex `index` into `out[..components]`, reading from
    /// `first * effective_stride` onward. Returns `false` without touching
    /// `out` when the element lies outside the source.
    pub(crate) fn read_vertex(
        &self,
        channel: ArrayChannel,
        first: usize,
        index: usize,
        out: &mut [f32; 4],
    ) -> bool {
        let Some(bytes) = self.bytes() else {
            return false;
        };
        let stride = self.effective_stride();
        let size = self.element_type.size();
        let count = self.components.min(4);
        let start = match first
            .checked_add(index)
            .and_then(|v| v.checked_mul(stride))
        {
            Some(s) => s,
            None => return false,
        };
        let end = start.saturating_add(count * size);
        if end > bytes.len() {
            return false;
        }
        let normalized = channel.normalizes_integers();
        for (c, slot) in out.iter_mut().take(count).enumerate() {
            *slot = self.element_type.read(bytes, start + c * size, normalized);
        }
        true
    }
}

/// The full descriptor set, one per channel.
#[derive(Debug, Clone)]
pub struct ClientArrays {
    pub position: ClientArrayDescriptor,
    pub normal: ClientArrayDescriptor,
    pub color: ClientArrayDescriptor,
    pub texcoord: ClientArrayDescriptor,
}

impl ClientArrays {
    pub fn new() -> Self {
        Self {
            position: ClientArrayDescriptor::new(4),
            normal: ClientArrayDescriptor::new(3),
            color: ClientArrayDescriptor::new(4),
            texcoord: ClientArrayDescriptor::new(2),
        }
    }

    pub fn get(&self, channel: ArrayChannel) -> &ClientArrayDescriptor {
        match channel {
            ArrayChannel::Position => &self.position,
            ArrayChannel::Normal => &self.normal,
            ArrayChannel::Color => &self.color,
            ArrayChannel::TexCoord => &self.texcoord,
        }
    }

    fn get_mut(&mut self, channel: ArrayChannel) -> &mut ClientArrayDescriptor {
        match channel {
            ArrayChannel::Position => &mut self.position,
            ArrayChannel::Normal => &mut self.normal,
            ArrayChannel::Color => &mut self.color,
            ArrayChannel::TexCoord => &mut self.texcoord,
        }
    }

    /// `glEnableClientState` / `glDisableClientState`. Returns `false` for
    /// an unknown array token.
    pub fn set_enabled(&mut self, array: GLenum, enabled: bool) -> bool {
        match ArrayChannel::from_gl(array) {
            Some(channel) => {
                self.get_mut(channel).enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Point `channel` at caller memory. An empty slice clears the source.
    ///
    /// Invalid component counts or negative strides leave the descriptor
    /// unchanged. Unknown element types are read as float.
    ///
    /// # Safety
    ///
    /// `data` must stay valid and unmodified until every draw that reads
    /// this channel has returned, or until the pointer is replaced.
    pub unsafe fn set_pointer<T: bytemuck::Pod>(
        &mut self,
        channel: ArrayChannel,
        components: i32,
        ty: GLenum,
        stride: i32,
        data: &[T],
    ) {
        if !(1..=4).contains(&components) {
            warn!(
                "{:?} pointer: component count {} outside 1..=4, ignored",
                channel, components
            );
            return;
        }
        if stride < 0 {
            warn!("{:?} pointer: negative stride {}, ignored", channel, stride);
            return;
        }
        let element_type = ElementType::from_gl(ty).unwrap_or_else(|| {
            warn!(
                "{:?} pointer: unknown type 0x{:04X}, reading as float",
                channel, ty
            );
            ElementType::Float
        });
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let source = NonNull::new(bytes.as_ptr() as *mut u8)
            .filter(|_| !bytes.is_empty())
            .map(|ptr| ArraySource {
                ptr,
                len: bytes.len(),
            });

        let desc = self.get_mut(channel);
        desc.components = components as usize;
        desc.element_type = element_type;
        desc.stride = stride as usize;
        desc.source = source;
    }

    /// Drop every source and restore the power-on descriptors.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ClientArrays {
    fn default() -> Self {
        Self::new()
    }
}
