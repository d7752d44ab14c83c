//! Legacy entry points.
//!
//! `Bridge` owns every piece of fixed-function state and translates each
//! intercepted call into state updates, and each draw into one uniform
//! upload plus one streamed draw on the [`GpuDevice`]. Entry points never
//! fail: bad input is logged and ignored, and draws degrade to nothing
//! drawn.

use crate::arrays::{ArrayChannel, ClientArrays};
use crate::assembler::{effective_vertex_count, GeometryAssembler};
use crate::config::BridgeConfig;
use crate::device::GpuDevice;
use crate::error::Result;
use crate::gl::{self, GLenum, IndexType, PrimitiveMode};
use crate::immediate::ImmediateRecorder;
use crate::matrix::MatrixEngine;
use crate::shader::FIXED_FUNCTION_WGSL;
use crate::state::{Capability, FixedFunctionState};
use crate::transform::Mat4;
use crate::uniforms::UniformBlock;
use log::{debug, error, info, trace, warn};

/// Copy the first four values, or log and return `None` if there are fewer.
fn vec4(call: &str, params: &[f32]) -> Option<[f32; 4]> {
    match params {
        [a, b, c, d, ..] => Some([*a, *b, *c, *d]),
        _ => {
            warn!("{}: expected 4 values, got {}", call, params.len());
            None
        }
    }
}

pub struct Bridge<D: GpuDevice> {
    device: D,
    config: BridgeConfig,
    matrices: MatrixEngine,
    state: FixedFunctionState,
    arrays: ClientArrays,
    assembler: GeometryAssembler,
    immediate: ImmediateRecorder,
    uniforms: UniformBlock,
    program_ready: bool,
    buffers_ready: bool,
}

impl<D: GpuDevice> Bridge<D> {
    pub fn new(device: D) -> Self {
        Self::with_config(device, BridgeConfig::default())
    }

    pub fn with_config(device: D, config: BridgeConfig) -> Self {
        Self {
            device,
            config,
            matrices: MatrixEngine::new(),
            state: FixedFunctionState::new(),
            arrays: ClientArrays::new(),
            assembler: GeometryAssembler::new(),
            immediate: ImmediateRecorder::new(),
            uniforms: UniformBlock::default(),
            program_ready: false,
            buffers_ready: false,
        }
    }

    // ── Lifecycle ───────────────────────────────────────────────

    /// Build the shader program and streaming buffers.
    ///
    /// When already initialized only the matrix stacks and lights are
    /// reset. On failure every draw stays a no-op; setters keep working.
    pub fn init(&mut self) -> Result<()> {
        self.matrices.reset();
        self.state.reset_lights();

        if self.program_ready {
            debug!("bridge already initialized, reset matrices and lights");
            return Ok(());
        }

        self.config.validate()?;
        self.assembler = GeometryAssembler::with_capacity(self.config.scratch_vertices)?;

        if let Err(e) = self.device.create_program(FIXED_FUNCTION_WGSL) {
            error!("bridge init: {}", e);
            return Err(e);
        }
        if let Err(e) = self.device.create_stream_buffers() {
            error!("bridge init: {}", e);
            self.device.destroy_program();
            return Err(e);
        }

        self.uniforms = UniformBlock::default();
        self.device.write_uniforms(&self.uniforms);
        self.program_ready = true;
        self.buffers_ready = true;
        info!("bridge initialized");
        Ok(())
    }

    /// Release the program and streaming buffers. A later `init` rebuilds.
    pub fn shutdown(&mut self) {
        if self.program_ready {
            self.device.destroy_program();
            self.program_ready = false;
        }
        if self.buffers_ready {
            self.device.destroy_stream_buffers();
            self.buffers_ready = false;
        }
        info!("bridge shut down");
    }

    /// Whether draws reach the device.
    pub fn is_ready(&self) -> bool {
        self.program_ready
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn into_device(self) -> D {
        self.device
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn matrices(&self) -> &MatrixEngine {
        &self.matrices
    }

    pub fn state(&self) -> &FixedFunctionState {
        &self.state
    }

    pub fn arrays(&self) -> &ClientArrays {
        &self.arrays
    }

    /// Uniform block as last synced.
    pub fn uniforms(&self) -> &UniformBlock {
        &self.uniforms
    }

    fn unknown_token(&self, call: &str, token: GLenum) {
        let level: log::Level = self.config.unknown_token_level.into();
        log::log!(level, "{}: unknown token 0x{:04X}, ignored", call, token);
    }

    // ── Matrix stack ────────────────────────────────────────────

    pub fn matrix_mode(&mut self, mode: GLenum) {
        self.matrices.select(mode);
    }

    pub fn load_identity(&mut self) {
        self.matrices.load_identity();
    }

    pub fn load_matrixf(&mut self, m: &Mat4) {
        self.matrices.load(m);
    }

    pub fn mult_matrixf(&mut self, m: &Mat4) {
        self.matrices.multiply(m);
    }

    pub fn push_matrix(&mut self) {
        self.matrices.push();
    }

    pub fn pop_matrix(&mut self) {
        self.matrices.pop();
    }

    pub fn translatef(&mut self, x: f32, y: f32, z: f32) {
        self.matrices.translate(x, y, z);
    }

    pub fn rotatef(&mut self, angle: f32, x: f32, y: f32, z: f32) {
        self.matrices.rotate(angle, x, y, z);
    }

    pub fn scalef(&mut self, x: f32, y: f32, z: f32) {
        self.matrices.scale(x, y, z);
    }

    pub fn ortho(&mut self, left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) {
        self.matrices.ortho(left, right, bottom, top, near, far);
    }

    pub fn frustum(&mut self, left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) {
        self.matrices.frustum(left, right, bottom, top, near, far);
    }

    /// `glGetFloatv`. Matrix tokens are answered from the stacks, anything
    /// else goes to the device. Returns the number of values written.
    pub fn get_floatv(&self, pname: GLenum, params: &mut [f32]) -> usize {
        if let Some(m) = self.matrices.get(pname) {
            let n = params.len().min(16);
            if n < 16 {
                warn!("glGetFloatv: {} of 16 matrix values fit", n);
            }
            params[..n].copy_from_slice(&m[..n]);
            return n;
        }
        self.device.get_float(pname, params)
    }

    // ── Lighting / material ─────────────────────────────────────

    pub fn lightfv(&mut self, light: GLenum, pname: GLenum, params: &[f32]) {
        if let Some(v) = vec4("glLightfv", params) {
            self.state.set_light(light, pname, v);
        }
    }

    pub fn light_modelfv(&mut self, pname: GLenum, params: &[f32]) {
        if pname != gl::LIGHT_MODEL_AMBIENT {
            trace!("glLightModelfv: 0x{:04X} not emulated", pname);
            return;
        }
        if let Some(v) = vec4("glLightModelfv", params) {
            self.state.set_global_ambient(v);
        }
    }

    /// Accepted for compatibility; the shader has a single material model.
    pub fn materialfv(&mut self, face: GLenum, pname: GLenum, _params: &[f32]) {
        trace!("glMaterialfv(0x{:04X}, 0x{:04X}) ignored", face, pname);
    }

    pub fn color_material(&mut self, face: GLenum, mode: GLenum) {
        trace!("glColorMaterial(0x{:04X}, 0x{:04X}) ignored", face, mode);
    }

    // ── Fog ─────────────────────────────────────────────────────

    pub fn fogf(&mut self, pname: GLenum, param: f32) {
        self.state.set_fog_scalar(pname, param);
    }

    pub fn fogfv(&mut self, pname: GLenum, params: &[f32]) {
        if pname == gl::FOG_COLOR {
            if let Some(v) = vec4("glFogfv", params) {
                self.state.set_fog_color(v);
            }
            return;
        }
        match params.first() {
            Some(&v) => self.fogf(pname, v),
            None => warn!("glFogfv: no values for 0x{:04X}", pname),
        }
    }

    pub fn fogi(&mut self, pname: GLenum, param: i32) {
        if pname == gl::FOG_MODE {
            self.state.set_fog_mode(param as GLenum);
        } else {
            self.fogf(pname, param as f32);
        }
    }

    pub fn hint(&mut self, target: GLenum, mode: GLenum) {
        trace!("glHint(0x{:04X}, 0x{:04X}) ignored", target, mode);
    }

    // ── Alpha test ──────────────────────────────────────────────

    pub fn alpha_func(&mut self, func: GLenum, reference: f32) {
        self.state.set_alpha_func(func, reference);
    }

    // ── Capabilities ────────────────────────────────────────────

    pub fn enable(&mut self, cap: GLenum) {
        self.set_capability(cap, true);
    }

    pub fn disable(&mut self, cap: GLenum) {
        self.set_capability(cap, false);
    }

    fn set_capability(&mut self, cap: GLenum, enabled: bool) {
        match Capability::from_gl(cap) {
            Some(c) => self.state.set_capability(c, enabled),
            None => self.device.set_capability(cap, enabled),
        }
    }

    pub fn is_enabled(&self, cap: GLenum) -> bool {
        match Capability::from_gl(cap) {
            Some(c) => self.state.capability(c),
            None => self.device.capability(cap),
        }
    }

    // ── Client arrays ───────────────────────────────────────────

    pub fn enable_client_state(&mut self, array: GLenum) {
        if !self.arrays.set_enabled(array, true) {
            self.unknown_token("glEnableClientState", array);
        }
    }

    pub fn disable_client_state(&mut self, array: GLenum) {
        if !self.arrays.set_enabled(array, false) {
            self.unknown_token("glDisableClientState", array);
        }
    }

    /// # Safety
    ///
    /// `data` must outlive every draw that reads the position array.
    pub unsafe fn vertex_pointer<T: bytemuck::Pod>(
        &mut self,
        size: i32,
        ty: GLenum,
        stride: i32,
        data: &[T],
    ) {
        self.arrays
            .set_pointer(ArrayChannel::Position, size, ty, stride, data);
    }

    /// Normals always have three components.
    ///
    /// # Safety
    ///
    /// `data` must outlive every draw that reads the normal array.
    pub unsafe fn normal_pointer<T: bytemuck::Pod>(&mut self, ty: GLenum, stride: i32, data: &[T]) {
        self.arrays.set_pointer(ArrayChannel::Normal, 3, ty, stride, data);
    }

    /// # Safety
    ///
    /// `data` must outlive every draw that reads the texcoord array.
    pub unsafe fn tex_coord_pointer<T: bytemuck::Pod>(
        &mut self,
        size: i32,
        ty: GLenum,
        stride: i32,
        data: &[T],
    ) {
        self.arrays
            .set_pointer(ArrayChannel::TexCoord, size, ty, stride, data);
    }

    /// # Safety
    ///
    /// `data` must outlive every draw that reads the color array.
    pub unsafe fn color_pointer<T: bytemuck::Pod>(
        &mut self,
        size: i32,
        ty: GLenum,
        stride: i32,
        data: &[T],
    ) {
        self.arrays
            .set_pointer(ArrayChannel::Color, size, ty, stride, data);
    }

    // ── Current color ───────────────────────────────────────────

    pub fn color4f(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.state.set_color([r, g, b, a]);
    }

    pub fn color4fv(&mut self, v: &[f32]) {
        if let Some(c) = vec4("glColor4fv", v) {
            self.state.set_color(c);
        }
    }

    pub fn color3f(&mut self, r: f32, g: f32, b: f32) {
        self.state.set_color([r, g, b, 1.0]);
    }

    // ── Uniform sync ────────────────────────────────────────────

    /// Push matrices and fixed-function state to the device. Idempotent.
    pub fn flush(&mut self) {
        if !self.program_ready {
            return;
        }
        self.uniforms.sync(&self.matrices, &self.state);
        self.device.write_uniforms(&self.uniforms);
    }

    fn flush_for_draw(&mut self, has_vertex_colors: bool) {
        self.uniforms.sync(&self.matrices, &self.state);
        self.uniforms.has_vertex_colors = has_vertex_colors as u32;
        self.device.write_uniforms(&self.uniforms);
    }

    fn vertex_colors_active(&self) -> bool {
        self.arrays.color.enabled && self.arrays.color.has_source()
    }

    // ── Client-array draws ──────────────────────────────────────

    /// `glDrawElements` over the current client arrays.
    pub fn draw_elements<I: bytemuck::Pod>(
        &mut self,
        mode: GLenum,
        count: i32,
        ty: GLenum,
        indices: &[I],
    ) {
        if !self.program_ready {
            return;
        }
        let Some(mode) = PrimitiveMode::from_gl(mode) else {
            self.unknown_token("glDrawElements mode", mode);
            return;
        };
        let Some(index_type) = IndexType::from_gl(ty) else {
            self.unknown_token("glDrawElements type", ty);
            return;
        };
        if count <= 0 {
            if count < 0 {
                warn!("glDrawElements: negative count {}", count);
            }
            return;
        }

        let bytes: &[u8] = bytemuck::cast_slice(indices);
        let available = bytes.len() / index_type.size();
        let mut count = count as usize;
        if count > available {
            warn!(
                "glDrawElements: {} indices requested, {} supplied",
                count, available
            );
            count = available;
        }
        if count == 0 {
            return;
        }
        let index_bytes = &bytes[..count * index_type.size()];
        let vertex_count = effective_vertex_count(index_bytes, count, index_type);

        let vertices =
            match self
                .assembler
                .assemble(&self.arrays, self.state.current_color, 0, vertex_count)
            {
                Ok(v) => v,
                Err(e) => {
                    error!("glDrawElements: {}, draw skipped", e);
                    return;
                }
            };
        if let Err(e) = self.device.stream_vertices(vertices) {
            error!("glDrawElements: {}", e);
            return;
        }
        if let Err(e) = self.device.stream_indices(index_bytes, index_type) {
            error!("glDrawElements: {}", e);
            return;
        }

        let colors = self.vertex_colors_active();
        self.flush_for_draw(colors);
        trace!(
            "glDrawElements {:?}: {} indices over {} vertices",
            mode,
            count,
            vertex_count
        );
        self.device.draw_indexed(mode, count, index_type);
    }

    /// `glDrawArrays` over the current client arrays. Descriptors are read
    /// from vertex `first` on and left untouched.
    pub fn draw_arrays(&mut self, mode: GLenum, first: i32, count: i32) {
        if !self.program_ready {
            return;
        }
        let Some(mode) = PrimitiveMode::from_gl(mode) else {
            self.unknown_token("glDrawArrays mode", mode);
            return;
        };
        if first < 0 || count <= 0 {
            if first < 0 || count < 0 {
                warn!("glDrawArrays: invalid range first={} count={}", first, count);
            }
            return;
        }
        let count = count as usize;

        let vertices = match self.assembler.assemble(
            &self.arrays,
            self.state.current_color,
            first as usize,
            count,
        ) {
            Ok(v) => v,
            Err(e) => {
                error!("glDrawArrays: {}, draw skipped", e);
                return;
            }
        };
        if let Err(e) = self.device.stream_vertices(vertices) {
            error!("glDrawArrays: {}", e);
            return;
        }

        let colors = self.vertex_colors_active();
        self.flush_for_draw(colors);
        trace!("glDrawArrays {:?}: {} vertices from {}", mode, count, first);
        self.device.draw_arrays(mode, count);
    }

    // ── Immediate mode ──────────────────────────────────────────

    pub fn begin(&mut self, mode: GLenum) {
        match PrimitiveMode::from_gl(mode) {
            Some(mode) => self.immediate.begin(mode),
            None => {
                self.immediate.abort();
                self.unknown_token("glBegin", mode);
            }
        }
    }

    pub fn end(&mut self) {
        let Some(batch) = self.immediate.end() else {
            self.immediate.finish();
            return;
        };
        if !self.program_ready {
            self.immediate.finish();
            return;
        }

        let floats: &[f32] = bytemuck::cast_slice(self.immediate.vertices());
        if let Err(e) = self.device.stream_vertices(floats) {
            error!("glEnd: {}", e);
            self.immediate.finish();
            return;
        }
        self.flush_for_draw(true);
        trace!("glEnd {:?}: {} vertices", batch.mode, batch.vertex_count);
        self.device.draw_arrays(batch.mode, batch.vertex_count);
        self.immediate.finish();
    }

    pub fn vertex3f(&mut self, x: f32, y: f32, z: f32) {
        self.immediate.vertex(x, y, z, self.state.current_color);
    }

    pub fn vertex2f(&mut self, x: f32, y: f32) {
        self.vertex3f(x, y, 0.0);
    }

    pub fn normal3f(&mut self, x: f32, y: f32, z: f32) {
        self.immediate.set_normal(x, y, z);
    }

    pub fn tex_coord2f(&mut self, s: f32, t: f32) {
        self.immediate.set_texcoord(s, t);
    }

    /// The target has no polygon modes; everything is filled.
    pub fn polygon_mode(&mut self, face: GLenum, mode: GLenum) {
        trace!("glPolygonMode(0x{:04X}, 0x{:04X}) ignored", face, mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DeviceCommand, RecordingDevice};

    fn ready() -> Bridge<RecordingDevice> {
        let mut bridge = Bridge::new(RecordingDevice::new());
        bridge.init().unwrap();
        bridge
    }

    #[test]
    fn init_twice_only_resets_matrices_and_lights() {
        let mut bridge = ready();
        bridge.translatef(1.0, 0.0, 0.0);
        bridge.enable(gl::LIGHT1);
        bridge.color3f(0.5, 0.5, 0.5);
        bridge.init().unwrap();

        let programs = bridge
            .device()
            .commands()
            .iter()
            .filter(|c| matches!(c, DeviceCommand::CreateProgram { .. }))
            .count();
        assert_eq!(programs, 1);
        assert!(!bridge.is_enabled(gl::LIGHT1));
        assert_eq!(bridge.state().current_color, [0.5, 0.5, 0.5, 1.0]);
        let mut m = [0.0; 16];
        bridge.get_floatv(gl::MODELVIEW_MATRIX, &mut m);
        assert_eq!(m[12], 0.0);
    }

    #[test]
    fn shutdown_then_init_rebuilds() {
        let mut bridge = ready();
        bridge.shutdown();
        assert!(!bridge.is_ready());
        assert!(!bridge.device().has_buffers());
        bridge.init().unwrap();
        assert!(bridge.is_ready());
        assert!(bridge.device().has_program());
    }

    #[test]
    fn native_capabilities_are_forwarded() {
        let mut bridge = ready();
        bridge.enable(gl::DEPTH_TEST);
        bridge.enable(gl::FOG);
        assert!(bridge.device().capability(gl::DEPTH_TEST));
        assert!(!bridge.device().capability(gl::FOG));
        assert!(bridge.is_enabled(gl::DEPTH_TEST));
        assert!(bridge.is_enabled(gl::FOG));
    }

    #[test]
    fn short_vectors_are_ignored() {
        let mut bridge = ready();
        bridge.lightfv(gl::LIGHT0, gl::DIFFUSE, &[0.1, 0.2]);
        bridge.color4fv(&[0.0]);
        bridge.fogfv(gl::FOG_COLOR, &[1.0, 1.0]);
        assert_eq!(bridge.state().lights[0].diffuse, [1.0; 4]);
        assert_eq!(bridge.state().current_color, [1.0; 4]);
        assert_eq!(bridge.state().fog.color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn fogi_and_fogfv_forward_scalars() {
        let mut bridge = ready();
        bridge.fogi(gl::FOG_END, 40);
        bridge.fogfv(gl::FOG_START, &[4.0]);
        bridge.fogi(gl::FOG_MODE, gl::EXP as i32);
        let fog = bridge.state().fog;
        assert_eq!((fog.start, fog.end), (4.0, 40.0));
        assert_eq!(fog.mode, crate::state::FogMode::Exponential);
    }

    #[test]
    fn get_floatv_falls_back_to_device() {
        let bridge = ready();
        let mut out = [0.0; 4];
        assert_eq!(bridge.get_floatv(gl::VIEWPORT, &mut out), 4);
        assert_eq!(out[2], 640.0);
    }

    #[test]
    fn invalid_draw_arguments_are_noops() {
        let mut bridge = ready();
        let idx = [0u16, 1, 2];
        bridge.draw_arrays(0x00FF, 0, 3);
        bridge.draw_arrays(gl::TRIANGLES, -1, 3);
        bridge.draw_arrays(gl::TRIANGLES, 0, 0);
        bridge.draw_elements(gl::TRIANGLES, 3, gl::FLOAT, &idx);
        bridge.draw_elements(gl::TRIANGLES, -3, gl::UNSIGNED_SHORT, &idx);
        assert!(bridge.device().draws().is_empty());
    }

    #[test]
    fn index_count_is_clamped_to_supplied_indices() {
        let mut bridge = ready();
        let idx = [0u16, 1, 2];
        bridge.draw_elements(gl::TRIANGLES, 6, gl::UNSIGNED_SHORT, &idx);
        let draw = bridge.device().last_draw().unwrap();
        assert_eq!(draw.count, 3);
        assert_eq!(draw.vertex_count(), 3);
    }

    #[test]
    fn draw_sets_vertex_color_flag_from_color_array() {
        let positions = [0.0f32; 9];
        let colors = [1.0f32; 12];
        let mut bridge = ready();
        unsafe {
            bridge.vertex_pointer(3, gl::FLOAT, 0, &positions);
            bridge.color_pointer(4, gl::FLOAT, 0, &colors);
        }
        bridge.enable_client_state(gl::VERTEX_ARRAY);
        bridge.draw_arrays(gl::TRIANGLES, 0, 3);
        assert_eq!(bridge.device().last_draw().unwrap().uniforms.has_vertex_colors, 0);

        bridge.enable_client_state(gl::COLOR_ARRAY);
        bridge.draw_arrays(gl::TRIANGLES, 0, 3);
        assert_eq!(bridge.device().last_draw().unwrap().uniforms.has_vertex_colors, 1);
    }

    #[test]
    fn immediate_draw_always_has_vertex_colors() {
        let mut bridge = ready();
        bridge.begin(gl::TRIANGLES);
        bridge.color4f(1.0, 0.0, 0.0, 1.0);
        bridge.vertex2f(0.0, 0.0);
        bridge.vertex2f(1.0, 0.0);
        bridge.vertex2f(0.0, 1.0);
        bridge.end();
        let draw = bridge.device().last_draw().unwrap();
        assert_eq!(draw.uniforms.has_vertex_colors, 1);
        assert_eq!(draw.count, 3);
        assert_eq!(&draw.vertices[8..12], &[1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn unknown_begin_mode_discards_open_block() {
        let mut bridge = ready();
        bridge.begin(gl::TRIANGLES);
        bridge.vertex2f(0.0, 0.0);
        bridge.vertex2f(1.0, 0.0);
        bridge.begin(0x00FF);
        bridge.vertex2f(0.0, 1.0);
        bridge.end();
        assert!(bridge.device().draws().is_empty());

        // The recorder is usable again afterwards.
        bridge.begin(gl::POINTS);
        bridge.vertex2f(0.5, 0.5);
        bridge.end();
        let draw = bridge.device().last_draw().unwrap();
        assert_eq!(draw.mode, PrimitiveMode::Points);
        assert_eq!(draw.count, 1);
    }

    #[test]
    fn texture_2d_is_tracked_and_uploaded() {
        let mut bridge = ready();
        bridge.enable(gl::TEXTURE_2D);
        assert!(bridge.is_enabled(gl::TEXTURE_2D));
        assert!(bridge.state().texture_2d_enabled);
        assert!(!bridge.device().capability(gl::TEXTURE_2D));
        assert!(!bridge
            .device()
            .commands()
            .iter()
            .any(|c| matches!(c, DeviceCommand::SetCapability { .. })));

        bridge.draw_arrays(gl::TRIANGLES, 0, 3);
        assert_eq!(bridge.device().last_draw().unwrap().uniforms.texture_enabled, 1);

        bridge.disable(gl::TEXTURE_2D);
        assert!(!bridge.is_enabled(gl::TEXTURE_2D));
        bridge.draw_arrays(gl::TRIANGLES, 0, 3);
        assert_eq!(bridge.device().last_draw().unwrap().uniforms.texture_enabled, 0);
    }

    #[test]
    fn polygon_mode_and_hint_are_silent() {
        let mut bridge = ready();
        let before = bridge.device().commands().len();
        bridge.polygon_mode(gl::FRONT_AND_BACK, gl::LINE);
        bridge.hint(gl::FOG_HINT, gl::NICEST);
        bridge.materialfv(gl::FRONT, gl::DIFFUSE, &[1.0; 4]);
        bridge.color_material(gl::FRONT, gl::AMBIENT_AND_DIFFUSE);
        assert_eq!(bridge.device().commands().len(), before);
    }
}
