// JSON traces of legacy GL calls
//
// A trace is a list of calls tagged by name. Tokens are raw GL enum values so
// a trace can be captured from any program that logs its GL calls.
use anyhow::{Context, Result};
use glbridge_core::gl::{self, GLenum};
use glbridge_core::{Bridge, GpuDevice};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn one() -> f32 {
    1.0
}

fn float_type() -> GLenum {
    gl::FLOAT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum TraceCall {
    Init,
    Shutdown,
    Flush,

    MatrixMode { mode: GLenum },
    LoadIdentity,
    LoadMatrix { m: [f32; 16] },
    MultMatrix { m: [f32; 16] },
    PushMatrix,
    PopMatrix,
    Translate { x: f32, y: f32, z: f32 },
    Rotate { angle: f32, x: f32, y: f32, z: f32 },
    Scale { x: f32, y: f32, z: f32 },
    Ortho { left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64 },
    Frustum { left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64 },

    Light { light: GLenum, pname: GLenum, params: Vec<f32> },
    LightModel { pname: GLenum, params: Vec<f32> },
    Material { face: GLenum, pname: GLenum, params: Vec<f32> },
    ColorMaterial { face: GLenum, mode: GLenum },
    Fog { pname: GLenum, params: Vec<f32> },
    Hint { target: GLenum, mode: GLenum },
    AlphaFunc { func: GLenum, reference: f32 },

    Enable { cap: GLenum },
    Disable { cap: GLenum },
    EnableClientState { array: GLenum },
    DisableClientState { array: GLenum },

    /// Client arrays carry their data inline. `ty` says how `data` is to be
    /// packed before it is handed to the bridge.
    VertexPointer {
        size: i32,
        #[serde(rename = "type", default = "float_type")]
        ty: GLenum,
        #[serde(default)]
        stride: i32,
        data: Vec<f64>,
    },
    NormalPointer {
        #[serde(rename = "type", default = "float_type")]
        ty: GLenum,
        #[serde(default)]
        stride: i32,
        data: Vec<f64>,
    },
    TexCoordPointer {
        size: i32,
        #[serde(rename = "type", default = "float_type")]
        ty: GLenum,
        #[serde(default)]
        stride: i32,
        data: Vec<f64>,
    },
    ColorPointer {
        size: i32,
        #[serde(rename = "type", default = "float_type")]
        ty: GLenum,
        #[serde(default)]
        stride: i32,
        data: Vec<f64>,
    },

    Color { r: f32, g: f32, b: f32, #[serde(default = "one")] a: f32 },

    DrawArrays { mode: GLenum, first: i32, count: i32 },
    DrawElements {
        mode: GLenum,
        #[serde(rename = "type", default = "index_type")]
        ty: GLenum,
        indices: Vec<u32>,
        /// Defaults to every supplied index.
        #[serde(default)]
        count: Option<i32>,
    },

    Begin { mode: GLenum },
    End,
    Vertex { x: f32, y: f32, #[serde(default)] z: f32 },
    Normal { x: f32, y: f32, z: f32 },
    TexCoord { s: f32, t: f32 },
    PolygonMode { face: GLenum, mode: GLenum },
}

fn index_type() -> GLenum {
    gl::UNSIGNED_INT
}

impl TraceCall {
    pub fn name(&self) -> &'static str {
        match self {
            TraceCall::Init => "init",
            TraceCall::Shutdown => "shutdown",
            TraceCall::Flush => "flush",
            TraceCall::MatrixMode { .. } => "matrix_mode",
            TraceCall::LoadIdentity => "load_identity",
            TraceCall::LoadMatrix { .. } => "load_matrix",
            TraceCall::MultMatrix { .. } => "mult_matrix",
            TraceCall::PushMatrix => "push_matrix",
            TraceCall::PopMatrix => "pop_matrix",
            TraceCall::Translate { .. } => "translate",
            TraceCall::Rotate { .. } => "rotate",
            TraceCall::Scale { .. } => "scale",
            TraceCall::Ortho { .. } => "ortho",
            TraceCall::Frustum { .. } => "frustum",
            TraceCall::Light { .. } => "light",
            TraceCall::LightModel { .. } => "light_model",
            TraceCall::Material { .. } => "material",
            TraceCall::ColorMaterial { .. } => "color_material",
            TraceCall::Fog { .. } => "fog",
            TraceCall::Hint { .. } => "hint",
            TraceCall::AlphaFunc { .. } => "alpha_func",
            TraceCall::Enable { .. } => "enable",
            TraceCall::Disable { .. } => "disable",
            TraceCall::EnableClientState { .. } => "enable_client_state",
            TraceCall::DisableClientState { .. } => "disable_client_state",
            TraceCall::VertexPointer { .. } => "vertex_pointer",
            TraceCall::NormalPointer { .. } => "normal_pointer",
            TraceCall::TexCoordPointer { .. } => "tex_coord_pointer",
            TraceCall::ColorPointer { .. } => "color_pointer",
            TraceCall::Color { .. } => "color",
            TraceCall::DrawArrays { .. } => "draw_arrays",
            TraceCall::DrawElements { .. } => "draw_elements",
            TraceCall::Begin { .. } => "begin",
            TraceCall::End => "end",
            TraceCall::Vertex { .. } => "vertex",
            TraceCall::Normal { .. } => "normal",
            TraceCall::TexCoord { .. } => "tex_coord",
            TraceCall::PolygonMode { .. } => "polygon_mode",
        }
    }
}

/// Packed bytes for one client array, in the element type the trace asked
/// for. Unknown types are packed as floats, matching how the bridge reads
/// them.
fn pack(ty: GLenum, data: &[f64]) -> Vec<u8> {
    let mut out = Vec::new();
    for &v in data {
        match ty {
            gl::BYTE => out.push(v as i8 as u8),
            gl::UNSIGNED_BYTE => out.push(v as u8),
            gl::SHORT => out.extend_from_slice(&(v as i16).to_ne_bytes()),
            gl::UNSIGNED_SHORT => out.extend_from_slice(&(v as u16).to_ne_bytes()),
            gl::INT => out.extend_from_slice(&(v as i32).to_ne_bytes()),
            gl::UNSIGNED_INT => out.extend_from_slice(&(v as u32).to_ne_bytes()),
            gl::FIXED => out.extend_from_slice(&((v * 65536.0) as i32).to_ne_bytes()),
            _ => out.extend_from_slice(&(v as f32).to_ne_bytes()),
        }
    }
    out
}

/// Packed index bytes for `glDrawElements`.
fn pack_indices(ty: GLenum, indices: &[u32]) -> Vec<u8> {
    let mut out = Vec::new();
    for &i in indices {
        match ty {
            gl::UNSIGNED_BYTE => out.push(i as u8),
            gl::UNSIGNED_SHORT => out.extend_from_slice(&(i as u16).to_ne_bytes()),
            _ => out.extend_from_slice(&i.to_ne_bytes()),
        }
    }
    out
}

/// Client arrays bound by a trace. The bridge reads them by reference, so
/// they live here until the replay finishes.
#[derive(Debug, Default)]
pub struct ArrayStore {
    position: Vec<u8>,
    normal: Vec<u8>,
    texcoord: Vec<u8>,
    color: Vec<u8>,
}

pub struct Trace {
    pub calls: Vec<TraceCall>,
}

impl Trace {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read trace {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let calls: Vec<TraceCall> =
            serde_json::from_str(content).context("Failed to parse trace")?;
        Ok(Self { calls })
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

/// Issue one traced call on `bridge`.
///
/// Arrays are copied into `store` before their pointer is set, so `store`
/// must stay alive and unmoved in memory for as long as `bridge` may draw
/// from them.
pub fn apply<D: GpuDevice>(
    bridge: &mut Bridge<D>,
    store: &mut ArrayStore,
    call: &TraceCall,
) -> Result<()> {
    match call {
        TraceCall::Init => bridge.init()?,
        TraceCall::Shutdown => bridge.shutdown(),
        TraceCall::Flush => bridge.flush(),

        TraceCall::MatrixMode { mode } => bridge.matrix_mode(*mode),
        TraceCall::LoadIdentity => bridge.load_identity(),
        TraceCall::LoadMatrix { m } => bridge.load_matrixf(m),
        TraceCall::MultMatrix { m } => bridge.mult_matrixf(m),
        TraceCall::PushMatrix => bridge.push_matrix(),
        TraceCall::PopMatrix => bridge.pop_matrix(),
        TraceCall::Translate { x, y, z } => bridge.translatef(*x, *y, *z),
        TraceCall::Rotate { angle, x, y, z } => bridge.rotatef(*angle, *x, *y, *z),
        TraceCall::Scale { x, y, z } => bridge.scalef(*x, *y, *z),
        TraceCall::Ortho { left, right, bottom, top, near, far } => {
            bridge.ortho(*left, *right, *bottom, *top, *near, *far)
        }
        TraceCall::Frustum { left, right, bottom, top, near, far } => {
            bridge.frustum(*left, *right, *bottom, *top, *near, *far)
        }

        TraceCall::Light { light, pname, params } => bridge.lightfv(*light, *pname, params),
        TraceCall::LightModel { pname, params } => bridge.light_modelfv(*pname, params),
        TraceCall::Material { face, pname, params } => bridge.materialfv(*face, *pname, params),
        TraceCall::ColorMaterial { face, mode } => bridge.color_material(*face, *mode),
        TraceCall::Fog { pname, params } => bridge.fogfv(*pname, params),
        TraceCall::Hint { target, mode } => bridge.hint(*target, *mode),
        TraceCall::AlphaFunc { func, reference } => bridge.alpha_func(*func, *reference),

        TraceCall::Enable { cap } => bridge.enable(*cap),
        TraceCall::Disable { cap } => bridge.disable(*cap),
        TraceCall::EnableClientState { array } => bridge.enable_client_state(*array),
        TraceCall::DisableClientState { array } => bridge.disable_client_state(*array),

        // SAFETY (all four pointer calls): the packed bytes are owned by
        // `store`, which the caller keeps alive across every later draw. A
        // rebind replaces the buffer and the pointer together.
        TraceCall::VertexPointer { size, ty, stride, data } => {
            store.position = pack(*ty, data);
            unsafe { bridge.vertex_pointer(*size, *ty, *stride, store.position.as_slice()) }
        }
        TraceCall::NormalPointer { ty, stride, data } => {
            store.normal = pack(*ty, data);
            unsafe { bridge.normal_pointer(*ty, *stride, store.normal.as_slice()) }
        }
        TraceCall::TexCoordPointer { size, ty, stride, data } => {
            store.texcoord = pack(*ty, data);
            unsafe { bridge.tex_coord_pointer(*size, *ty, *stride, store.texcoord.as_slice()) }
        }
        TraceCall::ColorPointer { size, ty, stride, data } => {
            store.color = pack(*ty, data);
            unsafe { bridge.color_pointer(*size, *ty, *stride, store.color.as_slice()) }
        }

        TraceCall::Color { r, g, b, a } => bridge.color4f(*r, *g, *b, *a),

        TraceCall::DrawArrays { mode, first, count } => bridge.draw_arrays(*mode, *first, *count),
        TraceCall::DrawElements { mode, ty, indices, count } => {
            let bytes = pack_indices(*ty, indices);
            let count = count.unwrap_or(indices.len() as i32);
            bridge.draw_elements(*mode, count, *ty, bytes.as_slice());
        }

        TraceCall::Begin { mode } => bridge.begin(*mode),
        TraceCall::End => bridge.end(),
        TraceCall::Vertex { x, y, z } => bridge.vertex3f(*x, *y, *z),
        TraceCall::Normal { x, y, z } => bridge.normal3f(*x, *y, *z),
        TraceCall::TexCoord { s, t } => bridge.tex_coord2f(*s, *t),
        TraceCall::PolygonMode { face, mode } => bridge.polygon_mode(*face, *mode),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glbridge_core::RecordingDevice;

    #[test]
    fn test_parse_defaults() {
        let trace = Trace::parse(
            r#"[
                {"call": "color", "r": 1, "g": 0, "b": 0},
                {"call": "vertex", "x": 1, "y": 2},
                {"call": "vertex_pointer", "size": 3, "data": [0, 0, 0]},
                {"call": "draw_elements", "mode": 4, "indices": [0, 1, 2]}
            ]"#,
        )
        .unwrap();
        assert_eq!(trace.len(), 4);
        assert_eq!(trace.calls[0], TraceCall::Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 });
        assert_eq!(trace.calls[1], TraceCall::Vertex { x: 1.0, y: 2.0, z: 0.0 });
        match &trace.calls[2] {
            TraceCall::VertexPointer { ty, stride, .. } => {
                assert_eq!(*ty, gl::FLOAT);
                assert_eq!(*stride, 0);
            }
            other => panic!("unexpected {:?}", other),
        }
        match &trace.calls[3] {
            TraceCall::DrawElements { ty, count, .. } => {
                assert_eq!(*ty, gl::UNSIGNED_INT);
                assert_eq!(*count, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_call_rejected() {
        assert!(Trace::parse(r#"[{"call": "swap_buffers"}]"#).is_err());
    }

    #[test]
    fn test_pack_types() {
        assert_eq!(pack(gl::UNSIGNED_BYTE, &[255.0, 1.0]), vec![255, 1]);
        assert_eq!(pack(gl::BYTE, &[-1.0]), vec![0xFF]);
        assert_eq!(pack(gl::FLOAT, &[1.0]).len(), 4);
        assert_eq!(pack(gl::SHORT, &[2.0, 3.0]).len(), 4);
        assert_eq!(pack_indices(gl::UNSIGNED_SHORT, &[1, 2, 3]).len(), 6);
        assert_eq!(pack_indices(gl::UNSIGNED_BYTE, &[1, 2, 3]), vec![1, 2, 3]);
    }

    #[test]
    fn test_apply_array_draw() {
        let trace = Trace::parse(
            r#"[
                {"call": "init"},
                {"call": "enable_client_state", "array": 32884},
                {"call": "vertex_pointer", "size": 3, "data": [0,0,0, 1,0,0, 0,1,0]},
                {"call": "draw_elements", "mode": 4, "type": 5123, "indices": [2, 1, 0]}
            ]"#,
        )
        .unwrap();
        let mut bridge = Bridge::new(RecordingDevice::new());
        let mut store = ArrayStore::default();
        for call in &trace.calls {
            apply(&mut bridge, &mut store, call).unwrap();
        }
        let draw = bridge.device().last_draw().unwrap();
        assert!(draw.is_indexed());
        assert_eq!(draw.indices, vec![2, 1, 0]);
        assert_eq!(draw.vertex_count(), 3);
        assert_eq!(draw.vertices[12], 1.0);
    }

    #[test]
    fn test_every_call_has_a_name() {
        assert_eq!(TraceCall::End.name(), "end");
        assert_eq!(TraceCall::MatrixMode { mode: gl::PROJECTION }.name(), "matrix_mode");
    }
}
