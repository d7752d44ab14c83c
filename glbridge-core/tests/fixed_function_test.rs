//! End-to-end checks of the legacy surface through the recording device

use glbridge_core::assembler::FLOATS_PER_VERTEX;
use glbridge_core::gl;
use glbridge_core::immediate::IMMEDIATE_CAPACITY;
use glbridge_core::shading;
use glbridge_core::{Bridge, BridgeError, RecordingDevice, ShaderStage};

fn bridge() -> Bridge<RecordingDevice> {
    let mut bridge = Bridge::new(RecordingDevice::new());
    bridge.init().expect("init");
    bridge
}

fn first_vertex(v: &[f32]) -> [f32; 12] {
    let mut out = [0.0; 12];
    out.copy_from_slice(&v[..FLOATS_PER_VERTEX]);
    out
}

#[test]
fn test_translate_maps_points() {
    let mut b = bridge();
    b.matrix_mode(gl::MODELVIEW);
    b.load_identity();
    b.translatef(2.0, -1.0, 0.5);

    b.begin(gl::POINTS);
    b.vertex3f(1.0, 1.0, 1.0);
    b.end();

    let draw = b.device().last_draw().unwrap();
    let out = shading::shade_vertex(&draw.uniforms, &first_vertex(&draw.vertices));
    // Identity projection: clip xy are eye xy.
    assert_eq!(&out.clip[..2], &[3.0, 0.0]);
    assert_eq!(out.eye_depth, -1.5);
}

#[test]
fn test_lighting_off_yields_current_color() {
    let positions = [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let mut b = bridge();
    b.color4f(0.25, 0.5, 0.75, 1.0);
    unsafe { b.vertex_pointer(3, gl::FLOAT, 0, &positions) };
    b.enable_client_state(gl::VERTEX_ARRAY);
    b.draw_arrays(gl::TRIANGLES, 0, 3);

    let draw = b.device().last_draw().unwrap();
    let v = shading::shade_vertex(&draw.uniforms, &first_vertex(&draw.vertices));
    let frag = shading::shade_fragment(&draw.uniforms, v.color, [1.0; 4], v.eye_depth);
    assert_eq!(frag, Some([0.25, 0.5, 0.75, 1.0]));
}

#[test]
fn test_directional_light_full_diffuse() {
    let mut b = bridge();
    b.enable(gl::LIGHTING);
    b.enable(gl::LIGHT0);
    b.light_modelfv(gl::LIGHT_MODEL_AMBIENT, &[0.0, 0.0, 0.0, 1.0]);
    b.lightfv(gl::LIGHT0, gl::POSITION, &[0.0, 0.0, 1.0, 0.0]);
    b.lightfv(gl::LIGHT0, gl::DIFFUSE, &[1.0, 1.0, 1.0, 1.0]);
    b.color4f(0.8, 0.6, 0.4, 1.0);

    b.begin(gl::TRIANGLES);
    b.normal3f(0.0, 0.0, 1.0);
    b.vertex3f(0.0, 0.0, 0.0);
    b.vertex3f(1.0, 0.0, 0.0);
    b.vertex3f(0.0, 1.0, 0.0);
    b.end();

    let draw = b.device().last_draw().unwrap();
    let v = shading::shade_vertex(&draw.uniforms, &first_vertex(&draw.vertices));
    for (got, want) in v.color.iter().zip([0.8, 0.6, 0.4, 1.0]) {
        assert!((got - want).abs() < 1e-6, "{got} != {want}");
    }
}

#[test]
fn test_alpha_test_matrix_at_half() {
    let cases = [
        (gl::NEVER, [false, false, false]),
        (gl::LESS, [true, false, false]),
        (gl::EQUAL, [false, true, false]),
        (gl::LEQUAL, [true, true, false]),
        (gl::GREATER, [false, false, true]),
        (gl::NOTEQUAL, [true, false, true]),
        (gl::GEQUAL, [false, true, true]),
        (gl::ALWAYS, [true, true, true]),
    ];
    let mut b = bridge();
    b.enable(gl::ALPHA_TEST);
    for (func, expected) in cases {
        b.alpha_func(func, 0.5);
        b.flush();
        let u = *b.device().uniforms();
        for (alpha, pass) in [0.49f32, 0.5, 0.51].into_iter().zip(expected) {
            let out = shading::shade_fragment(&u, [1.0, 1.0, 1.0, alpha], [1.0; 4], 0.0);
            assert_eq!(out.is_some(), pass, "func 0x{func:04X} alpha {alpha}");
        }
    }
}

#[test]
fn test_immediate_overflow_draws_capacity() {
    let mut b = bridge();
    b.begin(gl::POINTS);
    for i in 0..IMMEDIATE_CAPACITY + 500 {
        b.vertex2f(i as f32, 0.0);
    }
    b.end();
    let draw = b.device().last_draw().unwrap();
    assert_eq!(draw.count, IMMEDIATE_CAPACITY);
    assert_eq!(draw.vertex_count(), IMMEDIATE_CAPACITY);
}

#[test]
fn test_empty_immediate_block_draws_nothing() {
    let mut b = bridge();
    b.begin(gl::TRIANGLES);
    b.end();
    b.end();
    assert!(b.device().draws().is_empty());
}

#[test]
fn test_position_only_defaults() {
    let positions = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
    let indices = [2u8, 0, 1];
    let mut b = bridge();
    unsafe { b.vertex_pointer(3, gl::FLOAT, 0, &positions) };
    b.enable_client_state(gl::VERTEX_ARRAY);
    b.draw_elements(gl::TRIANGLES, 3, gl::UNSIGNED_BYTE, &indices);

    let draw = b.device().last_draw().unwrap();
    assert_eq!(draw.indices, vec![2, 0, 1]);
    for v in draw.vertices.chunks(FLOATS_PER_VERTEX) {
        assert_eq!(&v[3..6], &[0.0, 0.0, 1.0]);
        assert_eq!(&v[6..8], &[0.0, 0.0]);
    }
    assert_eq!(&draw.vertices[24..27], &[7.0, 8.0, 9.0]);
}

#[test]
fn test_compile_failure_disables_draws() {
    let dev = RecordingDevice::new().fail_compile(ShaderStage::Link);
    let mut b = Bridge::new(dev);
    let err = b.init().unwrap_err();
    assert!(matches!(err, BridgeError::ProgramBuild { stage: ShaderStage::Link, .. }));
    assert!(!b.is_ready());

    // Setters still work, draws do nothing.
    b.color3f(1.0, 0.0, 0.0);
    b.begin(gl::TRIANGLES);
    b.vertex2f(0.0, 0.0);
    b.end();
    b.draw_arrays(gl::TRIANGLES, 0, 3);
    assert_eq!(b.state().current_color, [1.0, 0.0, 0.0, 1.0]);
    assert!(b.device().draws().is_empty());

    // A later successful init recovers.
    b.device_mut().set_fail_compile(None);
    b.init().unwrap();
    b.begin(gl::POINTS);
    b.vertex2f(0.0, 0.0);
    b.end();
    assert_eq!(b.device().draws().len(), 1);
}

#[test]
fn test_draw_arrays_first_leaves_descriptors() {
    let positions: Vec<f32> = (0..12).map(|i| i as f32).collect();
    let mut b = bridge();
    unsafe { b.vertex_pointer(3, gl::FLOAT, 0, &positions) };
    b.draw_arrays(gl::POINTS, 2, 2);
    let draw = b.device().last_draw().unwrap();
    assert_eq!(&draw.vertices[..3], &[6.0, 7.0, 8.0]);

    b.draw_arrays(gl::POINTS, 0, 1);
    let draw = b.device().last_draw().unwrap();
    assert_eq!(&draw.vertices[..3], &[0.0, 1.0, 2.0]);
}

#[test]
fn test_push_pop_restores_uploaded_matrix() {
    let mut b = bridge();
    b.translatef(1.0, 2.0, 3.0);
    b.flush();
    let before = b.device().uniforms().model_view;
    b.push_matrix();
    b.rotatef(90.0, 0.0, 1.0, 0.0);
    b.scalef(3.0, 3.0, 3.0);
    b.pop_matrix();
    b.flush();
    assert_eq!(b.device().uniforms().model_view, before);
}

#[test]
fn test_fog_and_alpha_hold_values_while_disabled() {
    let mut b = bridge();
    b.enable(gl::FOG);
    b.fogf(gl::FOG_END, 100.0);
    b.enable(gl::ALPHA_TEST);
    b.alpha_func(gl::GREATER, 0.3);
    b.flush();

    b.disable(gl::FOG);
    b.disable(gl::ALPHA_TEST);
    b.fogf(gl::FOG_END, 5.0);
    b.alpha_func(gl::LESS, 0.9);
    b.flush();

    let u = b.device().uniforms();
    assert_eq!(u.fog_enabled, 0);
    assert_eq!(u.fog_end, 100.0);
    assert_eq!(u.alpha_test_enabled, 0);
    assert_eq!(u.alpha_func, gl::GREATER);
    assert_eq!(u.alpha_ref, 0.3);
}
