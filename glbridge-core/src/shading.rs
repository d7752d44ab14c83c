//! CPU evaluation of the fixed-function program.
//!
//! Follows the WGSL in [`crate::shader`] step for step so that tests and
//! tools can check what a uniform block would produce without a GPU.

use crate::state::CompareFunc;
use crate::transform;
use crate::uniforms::UniformBlock;

fn normalize3(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > 0.0 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        v
    }
}

fn dot3(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn light_on(u: &UniformBlock, i: usize) -> bool {
    u.light_enabled[i] != 0
}

/// Output of the vertex stage for one vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadedVertex {
    pub clip: [f32; 4],
    pub color: [f32; 4],
    pub texcoord: [f32; 2],
    pub eye_depth: f32,
}

/// Run the vertex stage on one interleaved vertex (12 floats).
pub fn shade_vertex(u: &UniformBlock, vertex: &[f32; 12]) -> ShadedVertex {
    let position = [vertex[0], vertex[1], vertex[2], 1.0];
    let normal = [vertex[3], vertex[4], vertex[5]];
    let texcoord = [vertex[6], vertex[7], 0.0, 1.0];
    let color = [vertex[8], vertex[9], vertex[10], vertex[11]];

    let eye = transform::transform_point(&u.model_view, position);
    let mut clip = transform::transform_point(&u.projection, eye);
    clip[2] = (clip[2] + clip[3]) * 0.5;

    let tc = transform::transform_point(&u.texture, texcoord);

    ShadedVertex {
        clip,
        color: vertex_color(u, normal, color),
        texcoord: [tc[0], tc[1]],
        eye_depth: -eye[2],
    }
}

/// Lit (or unlit) vertex color for an object-space normal.
pub fn vertex_color(u: &UniformBlock, normal: [f32; 3], vertex_color: [f32; 4]) -> [f32; 4] {
    let base = if u.has_vertex_colors != 0 {
        vertex_color
    } else {
        u.current_color
    };
    if u.lighting_enabled == 0 {
        return base;
    }

    let n = normalize3([
        u.normal[0][0] * normal[0] + u.normal[1][0] * normal[1] + u.normal[2][0] * normal[2],
        u.normal[0][1] * normal[0] + u.normal[1][1] * normal[1] + u.normal[2][1] * normal[2],
        u.normal[0][2] * normal[0] + u.normal[1][2] * normal[1] + u.normal[2][2] * normal[2],
    ]);
    let material = if u.color_material != 0 {
        base
    } else {
        u.current_color
    };

    let mut ambient = u.global_ambient;
    let mut diffuse = [0.0f32; 4];
    for i in 0..u.light_enabled.len() {
        if !light_on(u, i) {
            continue;
        }
        let p = u.light_position[i];
        let dir = normalize3([p[0], p[1], p[2]]);
        let ndotl = dot3(n, dir).max(0.0);
        for c in 0..4 {
            ambient[c] += u.light_ambient[i][c];
            diffuse[c] += ndotl * u.light_diffuse[i][c];
        }
    }

    let mut out = [0.0f32; 4];
    for c in 0..4 {
        out[c] = ((ambient[c] + diffuse[c]) * material[c]).clamp(0.0, 1.0);
    }
    out[3] = material[3];
    out
}

/// Run the fragment stage. Returns `None` when the alpha test discards.
pub fn shade_fragment(
    u: &UniformBlock,
    color: [f32; 4],
    texel: [f32; 4],
    eye_depth: f32,
) -> Option<[f32; 4]> {
    let mut color = color;
    if u.texture_enabled != 0 {
        for c in 0..4 {
            color[c] *= texel[c];
        }
    }

    if u.alpha_test_enabled != 0 {
        let passes = CompareFunc::from_gl(u.alpha_func)
            .map(|f| f.passes(color[3], u.alpha_ref))
            .unwrap_or(true);
        if !passes {
            return None;
        }
    }

    if u.fog_enabled != 0 {
        let f = ((u.fog_end - eye_depth) / (u.fog_end - u.fog_start)).clamp(0.0, 1.0);
        for c in 0..3 {
            color[c] = u.fog_color[c] + (color[c] - u.fog_color[c]) * f;
        }
    }

    Some(color)
}
