//! Fixed-function state: lights, fog, alpha test, current color and the
//! capability flags the target API has no native equivalent for.
//!
//! Setters only record values. Nothing here is visible to the GPU until the
//! next uniform sync.

use crate::gl::{self, GLenum};
use log::warn;

/// Number of legacy light slots.
pub const MAX_LIGHTS: usize = 8;

/// One legacy light slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Direction (w = 0) or point (w = 1).
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    /// Stored for queries; the shading equation has no specular term.
    pub specular: [f32; 4],
    pub enabled: bool,
}

impl Light {
    /// Power-on state. Only light 0 carries a white diffuse.
    pub fn default_for(index: usize) -> Self {
        let diffuse = if index == 0 {
            [1.0, 1.0, 1.0, 1.0]
        } else {
            [0.0, 0.0, 0.0, 1.0]
        };
        Self {
            position: [0.0, 0.0, 1.0, 0.0],
            ambient: [0.0, 0.0, 0.0, 1.0],
            diffuse,
            specular: [0.0; 4],
            enabled: false,
        }
    }
}

/// Fog falloff selector. Only `Linear` is evaluated by the shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FogMode {
    Linear,
    Exponential,
    Exponential2,
}

impl FogMode {
    pub fn from_gl(mode: GLenum) -> Option<Self> {
        match mode {
            gl::LINEAR => Some(Self::Linear),
            gl::EXP => Some(Self::Exponential),
            gl::EXP2 => Some(Self::Exponential2),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogState {
    pub color: [f32; 4],
    pub start: f32,
    pub end: f32,
    pub density: f32,
    pub mode: FogMode,
    pub enabled: bool,
}

impl Default for FogState {
    fn default() -> Self {
        Self {
            color: [0.0, 0.0, 0.0, 1.0],
            start: 0.0,
            end: 1.0,
            density: 1.0,
            mode: FogMode::Linear,
            enabled: false,
        }
    }
}

impl FogState {
    /// Linear fog factor: 1 keeps the fragment color, 0 is full fog.
    pub fn linear_factor(&self, eye_depth: f32) -> f32 {
        ((self.end - eye_depth) / (self.end - self.start)).clamp(0.0, 1.0)
    }
}

/// Alpha comparison function. Discriminants are the GL tokens, which is also
/// what the fragment shader switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CompareFunc {
    Never = gl::NEVER,
    Less = gl::LESS,
    Equal = gl::EQUAL,
    LessEqual = gl::LEQUAL,
    Greater = gl::GREATER,
    NotEqual = gl::NOTEQUAL,
    GreaterEqual = gl::GEQUAL,
    Always = gl::ALWAYS,
}

impl CompareFunc {
    pub const ALL: [CompareFunc; 8] = [
        Self::Never,
        Self::Less,
        Self::Equal,
        Self::LessEqual,
        Self::Greater,
        Self::NotEqual,
        Self::GreaterEqual,
        Self::Always,
    ];

    pub fn from_gl(func: GLenum) -> Option<Self> {
        Self::ALL.into_iter().find(|f| *f as u32 == func)
    }

    pub fn passes(self, value: f32, reference: f32) -> bool {
        match self {
            Self::Never => false,
            Self::Less => value < reference,
            Self::Equal => value == reference,
            Self::LessEqual => value <= reference,
            Self::Greater => value > reference,
            Self::NotEqual => value != reference,
            Self::GreaterEqual => value >= reference,
            Self::Always => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlphaTestState {
    pub func: CompareFunc,
    pub reference: f32,
    pub enabled: bool,
}

impl Default for AlphaTestState {
    fn default() -> Self {
        Self {
            func: CompareFunc::Always,
            reference: 0.0,
            enabled: false,
        }
    }
}

impl AlphaTestState {
    /// Whether a fragment with `alpha` survives. Disabled always passes.
    pub fn test(&self, alpha: f32) -> bool {
        !self.enabled || self.func.passes(alpha, self.reference)
    }
}

/// Capabilities the bridge owns. Anything else goes to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Light(usize),
    Lighting,
    ColorMaterial,
    Normalize,
    RescaleNormal,
    AlphaTest,
    Fog,
    Texture2D,
}

impl Capability {
    pub fn from_gl(cap: GLenum) -> Option<Self> {
        if (gl::LIGHT0..=gl::LIGHT7).contains(&cap) {
            return Some(Self::Light((cap - gl::LIGHT0) as usize));
        }
        match cap {
            gl::LIGHTING => Some(Self::Lighting),
            gl::COLOR_MATERIAL => Some(Self::ColorMaterial),
            gl::NORMALIZE => Some(Self::Normalize),
            gl::RESCALE_NORMAL => Some(Self::RescaleNormal),
            gl::ALPHA_TEST => Some(Self::AlphaTest),
            gl::FOG => Some(Self::Fog),
            gl::TEXTURE_2D => Some(Self::Texture2D),
            _ => None,
        }
    }
}

/// Map a `GL_LIGHTn` token to a slot index.
pub fn light_index(light: GLenum) -> Option<usize> {
    let i = light.checked_sub(gl::LIGHT0)? as usize;
    (i < MAX_LIGHTS).then_some(i)
}

/// Everything the fixed-function pipeline tracks outside the matrix stacks.
#[derive(Debug, Clone)]
pub struct FixedFunctionState {
    pub lights: [Light; MAX_LIGHTS],
    pub global_ambient: [f32; 4],
    pub fog: FogState,
    pub alpha_test: AlphaTestState,
    pub current_color: [f32; 4],
    pub lighting_enabled: bool,
    pub color_material_enabled: bool,
    pub normalize_enabled: bool,
    pub rescale_normal_enabled: bool,
    /// Tracked by hand: the target has no queryable texturing switch.
    pub texture_2d_enabled: bool,
}

impl FixedFunctionState {
    pub fn new() -> Self {
        Self {
            lights: std::array::from_fn(Light::default_for),
            global_ambient: [0.2, 0.2, 0.2, 1.0],
            fog: FogState::default(),
            alpha_test: AlphaTestState::default(),
            current_color: [1.0, 1.0, 1.0, 1.0],
            lighting_enabled: false,
            color_material_enabled: false,
            normalize_enabled: false,
            rescale_normal_enabled: false,
            texture_2d_enabled: false,
        }
    }

    /// Restore every light slot to its power-on state.
    pub fn reset_lights(&mut self) {
        self.lights = std::array::from_fn(Light::default_for);
    }

    // ── Lighting ──────────────────────────────────────────────────

    /// `glLightfv`. Out-of-range lights and unknown names are ignored.
    pub fn set_light(&mut self, light: GLenum, pname: GLenum, value: [f32; 4]) {
        let Some(i) = light_index(light) else {
            return;
        };
        let slot = &mut self.lights[i];
        match pname {
            gl::AMBIENT => slot.ambient = value,
            gl::DIFFUSE => slot.diffuse = value,
            gl::SPECULAR => slot.specular = value,
            gl::POSITION => slot.position = value,
            _ => {}
        }
    }

    pub fn set_global_ambient(&mut self, value: [f32; 4]) {
        self.global_ambient = value;
    }

    // ── Fog ───────────────────────────────────────────────────────

    /// `glFogf` for the scalar parameters and `GL_FOG_MODE`.
    pub fn set_fog_scalar(&mut self, pname: GLenum, value: f32) {
        match pname {
            gl::FOG_START => self.fog.start = value,
            gl::FOG_END => self.fog.end = value,
            gl::FOG_DENSITY => self.fog.density = value,
            gl::FOG_MODE => self.set_fog_mode(value as GLenum),
            _ => {}
        }
    }

    pub fn set_fog_mode(&mut self, mode: GLenum) {
        match FogMode::from_gl(mode) {
            Some(mode) => self.fog.mode = mode,
            None => warn!("glFog: unknown GL_FOG_MODE 0x{:04X}", mode),
        }
    }

    pub fn set_fog_color(&mut self, color: [f32; 4]) {
        self.fog.color = color;
    }

    // ── Alpha test ────────────────────────────────────────────────

    /// `glAlphaFunc`. The reference is clamped to [0,1]; unknown functions
    /// keep the previous function.
    pub fn set_alpha_func(&mut self, func: GLenum, reference: f32) {
        match CompareFunc::from_gl(func) {
            Some(f) => self.alpha_test.func = f,
            None => warn!("glAlphaFunc: unknown function 0x{:04X}", func),
        }
        self.alpha_test.reference = reference.clamp(0.0, 1.0);
    }

    // ── Current color ─────────────────────────────────────────────

    pub fn set_color(&mut self, color: [f32; 4]) {
        self.current_color = color;
    }

    // ── Capabilities ──────────────────────────────────────────────

    pub fn set_capability(&mut self, cap: Capability, enabled: bool) {
        match cap {
            Capability::Light(i) => self.lights[i].enabled = enabled,
            Capability::Lighting => self.lighting_enabled = enabled,
            Capability::ColorMaterial => self.color_material_enabled = enabled,
            Capability::Normalize => self.normalize_enabled = enabled,
            Capability::RescaleNormal => self.rescale_normal_enabled = enabled,
            Capability::AlphaTest => self.alpha_test.enabled = enabled,
            Capability::Fog => self.fog.enabled = enabled,
            Capability::Texture2D => self.texture_2d_enabled = enabled,
        }
    }

    pub fn capability(&self, cap: Capability) -> bool {
        match cap {
            Capability::Light(i) => self.lights[i].enabled,
            Capability::Lighting => self.lighting_enabled,
            Capability::ColorMaterial => self.color_material_enabled,
            Capability::Normalize => self.normalize_enabled,
            Capability::RescaleNormal => self.rescale_normal_enabled,
            Capability::AlphaTest => self.alpha_test.enabled,
            Capability::Fog => self.fog.enabled,
            Capability::Texture2D => self.texture_2d_enabled,
        }
    }
}

impl Default for FixedFunctionState {
    fn default() -> Self {
        Self::new()
    }
}
