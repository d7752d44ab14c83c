// Legacy GL enumerants and their decoded forms.
//
// Values match the published OpenGL 1.x headers so call sites can keep
// passing the raw tokens they always did.

pub type GLenum = u32;

// ── Matrix modes / queries ──────────────────────────────────────

pub const MODELVIEW: GLenum = 0x1700;
pub const PROJECTION: GLenum = 0x1701;
pub const TEXTURE: GLenum = 0x1702;

pub const MODELVIEW_MATRIX: GLenum = 0x0BA6;
pub const PROJECTION_MATRIX: GLenum = 0x0BA7;
pub const TEXTURE_MATRIX: GLenum = 0x0BA8;
pub const VIEWPORT: GLenum = 0x0BA2;
pub const DEPTH_RANGE: GLenum = 0x0B70;

// ── Lighting ────────────────────────────────────────────────────

pub const LIGHT0: GLenum = 0x4000;
pub const LIGHT1: GLenum = 0x4001;
pub const LIGHT2: GLenum = 0x4002;
pub const LIGHT3: GLenum = 0x4003;
pub const LIGHT4: GLenum = 0x4004;
pub const LIGHT5: GLenum = 0x4005;
pub const LIGHT6: GLenum = 0x4006;
pub const LIGHT7: GLenum = 0x4007;

pub const AMBIENT: GLenum = 0x1200;
pub const DIFFUSE: GLenum = 0x1201;
pub const SPECULAR: GLenum = 0x1202;
pub const POSITION: GLenum = 0x1203;
pub const EMISSION: GLenum = 0x1600;
pub const SHININESS: GLenum = 0x1601;
pub const AMBIENT_AND_DIFFUSE: GLenum = 0x1602;

pub const LIGHT_MODEL_AMBIENT: GLenum = 0x0B53;

pub const FRONT: GLenum = 0x0404;
pub const BACK: GLenum = 0x0405;
pub const FRONT_AND_BACK: GLenum = 0x0408;

// ── Fog ─────────────────────────────────────────────────────────

pub const FOG: GLenum = 0x0B60;
pub const FOG_DENSITY: GLenum = 0x0B62;
pub const FOG_START: GLenum = 0x0B63;
pub const FOG_END: GLenum = 0x0B64;
pub const FOG_MODE: GLenum = 0x0B65;
pub const FOG_COLOR: GLenum = 0x0B66;
pub const FOG_HINT: GLenum = 0x0C54;
pub const LINEAR: GLenum = 0x2601;
pub const EXP: GLenum = 0x0800;
pub const EXP2: GLenum = 0x0801;
pub const DONT_CARE: GLenum = 0x1100;
pub const FASTEST: GLenum = 0x1101;
pub const NICEST: GLenum = 0x1102;

// ── Alpha test ──────────────────────────────────────────────────

pub const ALPHA_TEST: GLenum = 0x0BC0;
pub const NEVER: GLenum = 0x0200;
pub const LESS: GLenum = 0x0201;
pub const EQUAL: GLenum = 0x0202;
pub const LEQUAL: GLenum = 0x0203;
pub const GREATER: GLenum = 0x0204;
pub const NOTEQUAL: GLenum = 0x0205;
pub const GEQUAL: GLenum = 0x0206;
pub const ALWAYS: GLenum = 0x0207;

// ── Capabilities ────────────────────────────────────────────────

pub const LIGHTING: GLenum = 0x0B50;
pub const COLOR_MATERIAL: GLenum = 0x0B57;
pub const NORMALIZE: GLenum = 0x0BA1;
pub const RESCALE_NORMAL: GLenum = 0x803A;
pub const TEXTURE_2D: GLenum = 0x0DE1;

// Native capabilities the bridge forwards to the device.
pub const CULL_FACE: GLenum = 0x0B44;
pub const DEPTH_TEST: GLenum = 0x0B71;
pub const BLEND: GLenum = 0x0BE2;
pub const SCISSOR_TEST: GLenum = 0x0C11;

// ── Client arrays ───────────────────────────────────────────────

pub const VERTEX_ARRAY: GLenum = 0x8074;
pub const NORMAL_ARRAY: GLenum = 0x8075;
pub const COLOR_ARRAY: GLenum = 0x8076;
pub const TEXTURE_COORD_ARRAY: GLenum = 0x8078;

// ── Data types ──────────────────────────────────────────────────

pub const BYTE: GLenum = 0x1400;
pub const UNSIGNED_BYTE: GLenum = 0x1401;
pub const SHORT: GLenum = 0x1402;
pub const UNSIGNED_SHORT: GLenum = 0x1403;
pub const INT: GLenum = 0x1404;
pub const UNSIGNED_INT: GLenum = 0x1405;
pub const FLOAT: GLenum = 0x1406;
pub const FIXED: GLenum = 0x140C;

// ── Primitives ──────────────────────────────────────────────────

pub const POINTS: GLenum = 0x0000;
pub const LINES: GLenum = 0x0001;
pub const LINE_LOOP: GLenum = 0x0002;
pub const LINE_STRIP: GLenum = 0x0003;
pub const TRIANGLES: GLenum = 0x0004;
pub const TRIANGLE_STRIP: GLenum = 0x0005;
pub const TRIANGLE_FAN: GLenum = 0x0006;
pub const QUADS: GLenum = 0x0007;
pub const QUAD_STRIP: GLenum = 0x0008;
pub const POLYGON: GLenum = 0x0009;

// ── Polygon mode ────────────────────────────────────────────────

pub const POINT: GLenum = 0x1B00;
pub const LINE: GLenum = 0x1B01;
pub const FILL: GLenum = 0x1B02;

/// Legacy primitive modes accepted by the draw entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u32)]
pub enum PrimitiveMode {
    Points = POINTS,
    Lines = LINES,
    LineLoop = LINE_LOOP,
    LineStrip = LINE_STRIP,
    Triangles = TRIANGLES,
    TriangleStrip = TRIANGLE_STRIP,
    TriangleFan = TRIANGLE_FAN,
    Quads = QUADS,
    QuadStrip = QUAD_STRIP,
    Polygon = POLYGON,
}

impl PrimitiveMode {
    pub fn from_gl(mode: GLenum) -> Option<Self> {
        match mode {
            POINTS => Some(Self::Points),
            LINES => Some(Self::Lines),
            LINE_LOOP => Some(Self::LineLoop),
            LINE_STRIP => Some(Self::LineStrip),
            TRIANGLES => Some(Self::Triangles),
            TRIANGLE_STRIP => Some(Self::TriangleStrip),
            TRIANGLE_FAN => Some(Self::TriangleFan),
            QUADS => Some(Self::Quads),
            QUAD_STRIP => Some(Self::QuadStrip),
            POLYGON => Some(Self::Polygon),
            _ => None,
        }
    }
}

/// Unsigned index widths accepted by `draw_elements`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum IndexType {
    U8,
    U16,
    U32,
}

impl IndexType {
    pub fn from_gl(ty: GLenum) -> Option<Self> {
        match ty {
            UNSIGNED_BYTE => Some(Self::U8),
            UNSIGNED_SHORT => Some(Self::U16),
            UNSIGNED_INT => Some(Self::U32),
            _ => None,
        }
    }

    pub fn size(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }

    /// Read index `i` from a packed native-endian index buffer.
    pub fn read(self, bytes: &[u8], i: usize) -> u32 {
        let at = i * self.size();
        match self {
            Self::U8 => bytes[at] as u32,
            Self::U16 => u16::from_ne_bytes([bytes[at], bytes[at + 1]]) as u32,
            Self::U32 => u32::from_ne_bytes([
                bytes[at],
                bytes[at + 1],
                bytes[at + 2],
                bytes[at + 3],
            ]),
        }
    }
}

/// Element types a client array may be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ElementType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Float,
    /// 16.16 signed fixed point.
    Fixed,
}

impl ElementType {
    pub fn from_gl(ty: GLenum) -> Option<Self> {
        match ty {
            BYTE => Some(Self::Byte),
            UNSIGNED_BYTE => Some(Self::UnsignedByte),
            SHORT => Some(Self::Short),
            UNSIGNED_SHORT => Some(Self::UnsignedShort),
            INT => Some(Self::Int),
            UNSIGNED_INT => Some(Self::UnsignedInt),
            FLOAT => Some(Self::Float),
            FIXED => Some(Self::Fixed),
            _ => None,
        }
    }

    pub fn size(self) -> usize {
        match self {
            Self::Byte | Self::UnsignedByte => 1,
            Self::Short | Self::UnsignedShort => 2,
            Self::Int | Self::UnsignedInt | Self::Float | Self::Fixed => 4,
        }
    }

    /// Decode one component at `at`. Integer types are mapped to [0,1] or
    /// [-1,1] when `normalized`, otherwise converted as-is.
    ///
    /// The caller guarantees `at + self.size() <= bytes.len()`.
    pub fn read(self, bytes: &[u8], at: usize, normalized: bool) -> f32 {
        let b = &bytes[at..at + self.size()];
        match self {
            Self::Byte => {
                let v = b[0] as i8 as f32;
                if normalized { (v / 127.0).max(-1.0) } else { v }
            }
            Self::UnsignedByte => {
                let v = b[0] as f32;
                if normalized { v / 255.0 } else { v }
            }
            Self::Short => {
                let v = i16::from_ne_bytes([b[0], b[1]]) as f32;
                if normalized { (v / 32767.0).max(-1.0) } else { v }
            }
            Self::UnsignedShort => {
                let v = u16::from_ne_bytes([b[0], b[1]]) as f32;
                if normalized { v / 65535.0 } else { v }
            }
            Self::Int => {
                let v = i32::from_ne_bytes([b[0], b[1], b[2], b[3]]) as f64;
                if normalized { (v / i32::MAX as f64).max(-1.0) as f32 } else { v as f32 }
            }
            Self::UnsignedInt => {
                let v = u32::from_ne_bytes([b[0], b[1], b[2], b[3]]) as f64;
                if normalized { (v / u32::MAX as f64) as f32 } else { v as f32 }
            }
            Self::Float => f32::from_ne_bytes([b[0], b[1], b[2], b[3]]),
            Self::Fixed => i32::from_ne_bytes([b[0], b[1], b[2], b[3]]) as f32 / 65536.0,
        }
    }
}
