// The single vertex/fragment program that stands in for the fixed-function
// pipeline. Bindings: 0 = uniforms, 1 = texture, 2 = sampler. Vertex
// attributes follow the interleaved layout: 0 = position, 1 = normal,
// 2 = texcoord, 3 = color.

/// Entry point of the vertex stage.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Entry point of the fragment stage.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// WGSL source for the fixed-function emulation program.
pub const FIXED_FUNCTION_WGSL: &str = r#"
struct Uniforms {
    model_view: mat4x4<f32>,
    projection: mat4x4<f32>,
    texture_matrix: mat4x4<f32>,
    normal_matrix: mat3x3<f32>,

    global_ambient: vec4<f32>,
    current_color: vec4<f32>,
    fog_color: vec4<f32>,

    light_position: array<vec4<f32>, 8>,
    light_ambient: array<vec4<f32>, 8>,
    light_diffuse: array<vec4<f32>, 8>,
    light_enabled: array<vec4<u32>, 2>,

    lighting_enabled: u32,
    color_material: u32,
    has_vertex_colors: u32,
    texture_enabled: u32,
    fog_enabled: u32,
    alpha_test_enabled: u32,
    alpha_func: u32,
    _pad0: u32,

    fog_start: f32,
    fog_end: f32,
    alpha_ref: f32,
    _pad1: f32,
}

@group(0) @binding(0) var<uniform> u: Uniforms;
@group(0) @binding(1) var t_color: texture_2d<f32>;
@group(0) @binding(2) var s_color: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) texcoord: vec2<f32>,
    @location(3) color: vec4<f32>,
}

struct VertexOutput {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) texcoord: vec2<f32>,
    @location(2) eye_depth: f32,
}

fn light_on(i: u32) -> bool {
    return u.light_enabled[i / 4u][i % 4u] != 0u;
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let eye = u.model_view * vec4<f32>(in.position, 1.0);
    var clip = u.projection * eye;
    // GL clip z is [-w, w]; the target expects [0, w].
    clip.z = (clip.z + clip.w) * 0.5;
    out.clip = clip;
    out.eye_depth = -eye.z;

    var base = u.current_color;
    if (u.has_vertex_colors != 0u) {
        base = in.color;
    }

    if (u.lighting_enabled != 0u) {
        let n = normalize(u.normal_matrix * in.normal);
        var material = u.current_color;
        if (u.color_material != 0u) {
            material = base;
        }
        var ambient = u.global_ambient;
        var diffuse = vec4<f32>(0.0);
        for (var i = 0u; i < 8u; i = i + 1u) {
            if (light_on(i)) {
                let dir = normalize(u.light_position[i].xyz);
                ambient = ambient + u.light_ambient[i];
                diffuse = diffuse + max(dot(n, dir), 0.0) * u.light_diffuse[i];
            }
        }
        var lit = clamp((ambient + diffuse) * material, vec4<f32>(0.0), vec4<f32>(1.0));
        lit.a = material.a;
        out.color = lit;
    } else {
        out.color = base;
    }

    out.texcoord = (u.texture_matrix * vec4<f32>(in.texcoord, 0.0, 1.0)).xy;
    return out;
}

fn alpha_passes(a: f32, r: f32, op: u32) -> bool {
    switch op {
        case 0x0200u: { return false; }
        case 0x0201u: { return a < r; }
        case 0x0202u: { return a == r; }
        case 0x0203u: { return a <= r; }
        case 0x0204u: { return a > r; }
        case 0x0205u: { return a != r; }
        case 0x0206u: { return a >= r; }
        default: { return true; }
    }
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    // Sampled outside the branch to keep derivatives in uniform control flow.
    let texel = textureSample(t_color, s_color, in.texcoord);
    var color = in.color;
    if (u.texture_enabled != 0u) {
        color = color * texel;
    }

    if (u.alpha_test_enabled != 0u && !alpha_passes(color.a, u.alpha_ref, u.alpha_func)) {
        discard;
    }

    if (u.fog_enabled != 0u) {
        let f = clamp((u.fog_end - in.eye_depth) / (u.fog_end - u.fog_start), 0.0, 1.0);
        color = vec4<f32>(mix(u.fog_color.rgb, color.rgb, f), color.a);
    }

    return color;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_both_entry_points() {
        assert!(FIXED_FUNCTION_WGSL.contains(&format!("fn {VERTEX_ENTRY}(")));
        assert!(FIXED_FUNCTION_WGSL.contains(&format!("fn {FRAGMENT_ENTRY}(")));
    }

    #[test]
    fn uniform_fields_follow_block_order() {
        let fields = [
            "model_view:",
            "projection:",
            "texture_matrix:",
            "normal_matrix:",
            "global_ambient:",
            "current_color:",
            "fog_color:",
            "light_position:",
            "light_ambient:",
            "light_diffuse:",
            "light_enabled:",
            "lighting_enabled:",
            "color_material:",
            "has_vertex_colors:",
            "texture_enabled:",
            "fog_enabled:",
            "alpha_test_enabled:",
            "alpha_func:",
            "_pad0:",
            "fog_start:",
            "fog_end:",
            "alpha_ref:",
            "_pad1:",
        ];
        let body_end = FIXED_FUNCTION_WGSL.find("@group").unwrap();
        let body = &FIXED_FUNCTION_WGSL[..body_end];
        let mut last = 0;
        for field in fields {
            let at = body[last..]
                .find(&format!("    {field}"))
                .unwrap_or_else(|| panic!("{field} missing or out of order"));
            last += at + field.len();
        }
    }

    #[test]
    fn alpha_switch_uses_gl_tokens() {
        use crate::gl;
        for token in [gl::NEVER, gl::LESS, gl::EQUAL, gl::LEQUAL, gl::GREATER, gl::NOTEQUAL, gl::GEQUAL] {
            assert!(FIXED_FUNCTION_WGSL.contains(&format!("case 0x{token:04X}u")));
        }
    }
}
