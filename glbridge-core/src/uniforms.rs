//! The uniform block shared with the shader program, and the flush that
//! copies legacy state into it before each draw.

use crate::matrix::{MatrixEngine, StackKind};
use crate::state::{FixedFunctionState, MAX_LIGHTS};
use crate::transform;
use bytemuck::{Pod, Zeroable};

/// Uniform buffer contents. Field order and padding mirror the WGSL
/// `Uniforms` struct in [`crate::shader`].
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct UniformBlock {
    pub model_view: [f32; 16],
    pub projection: [f32; 16],
    pub texture: [f32; 16],
    /// mat3x3 columns, each padded to a vec4.
    pub normal: [[f32; 4]; 3],

    pub global_ambient: [f32; 4],
    pub current_color: [f32; 4],
    pub fog_color: [f32; 4],

    pub light_position: [[f32; 4]; MAX_LIGHTS],
    pub light_ambient: [[f32; 4]; MAX_LIGHTS],
    pub light_diffuse: [[f32; 4]; MAX_LIGHTS],
    pub light_enabled: [u32; MAX_LIGHTS],

    pub lighting_enabled: u32,
    pub color_material: u32,
    pub has_vertex_colors: u32,
    pub texture_enabled: u32,
    pub fog_enabled: u32,
    pub alpha_test_enabled: u32,
    pub alpha_func: u32,
    pub _pad0: u32,

    pub fog_start: f32,
    pub fog_end: f32,
    pub alpha_ref: f32,
    pub _pad1: f32,
}

/// Size in bytes of the uniform buffer.
pub const UNIFORM_BLOCK_SIZE: usize = std::mem::size_of::<UniformBlock>();

impl Default for UniformBlock {
    fn default() -> Self {
        let mut block = Self::zeroed();
        block.model_view = transform::identity();
        block.projection = transform::identity();
        block.texture = transform::identity();
        block.normal = [[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0]];
        block
    }
}

impl UniformBlock {
    /// Copy matrices and fixed-function state into the block.
    ///
    /// Fog parameters are only copied while fog is enabled, and the alpha
    /// reference and function only while the alpha test is enabled; when
    /// disabled those fields keep whatever was last uploaded.
    /// `has_vertex_colors` is left to the draw call.
    pub fn sync(&mut self, matrices: &MatrixEngine, state: &FixedFunctionState) {
        let mv = matrices.top(StackKind::ModelView);
        self.model_view = *mv;
        self.projection = *matrices.top(StackKind::Projection);
        self.texture = *matrices.top(StackKind::Texture);
        for (dst, col) in self.normal.iter_mut().zip(transform::normal_matrix(mv)) {
            *dst = [col[0], col[1], col[2], 0.0];
        }

        self.lighting_enabled = state.lighting_enabled as u32;
        self.color_material = state.color_material_enabled as u32;
        self.global_ambient = state.global_ambient;
        for (i, light) in state.lights.iter().enumerate() {
            self.light_enabled[i] = light.enabled as u32;
            self.light_position[i] = light.position;
            self.light_ambient[i] = light.ambient;
            self.light_diffuse[i] = light.diffuse;
        }

        self.fog_enabled = state.fog.enabled as u32;
        if state.fog.enabled {
            self.fog_color = state.fog.color;
            self.fog_start = state.fog.start;
            self.fog_end = state.fog.end;
        }

        self.alpha_test_enabled = state.alpha_test.enabled as u32;
        if state.alpha_test.enabled {
            self.alpha_ref = state.alpha_test.reference;
            self.alpha_func = state.alpha_test.func as u32;
        }

        self.texture_enabled = state.texture_2d_enabled as u32;
        self.current_color = state.current_color;
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
