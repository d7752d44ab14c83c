//! Matrix stacks for the model-view, projection and texture modes.
//!
//! Every transform call operates on the top entry of whichever stack is
//! active; overflow and underflow are logged and leave the stack untouched,
//! matching the legacy "clamp and warn" contract.

use crate::gl::{self, GLenum};
use crate::transform::{self, Mat4};
use log::{error, warn};

/// Maximum number of entries per stack.
pub const MATRIX_STACK_DEPTH: usize = 32;

/// Which stack an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackKind {
    ModelView,
    Projection,
    Texture,
}

impl StackKind {
    pub fn from_gl(mode: GLenum) -> Option<Self> {
        match mode {
            gl::MODELVIEW => Some(Self::ModelView),
            gl::PROJECTION => Some(Self::Projection),
            gl::TEXTURE => Some(Self::Texture),
            _ => None,
        }
    }
}

/// A bounded push/pop stack of matrices.
#[derive(Debug, Clone)]
pub struct MatrixStack {
    entries: [Mat4; MATRIX_STACK_DEPTH],
    top: usize,
}

impl MatrixStack {
    pub fn new() -> Self {
        Self {
            entries: [transform::identity(); MATRIX_STACK_DEPTH],
            top: 0,
        }
    }

    /// Collapse to a single identity entry.
    pub fn reset(&mut self) {
        self.entries[0] = transform::identity();
        self.top = 0;
    }

    pub fn top(&self) -> &Mat4 {
        &self.entries[self.top]
    }

    pub fn top_mut(&mut self) -> &mut Mat4 {
        &mut self.entries[self.top]
    }

    /// Index of the top entry (0 when only the base entry exists).
    pub fn depth(&self) -> usize {
        self.top
    }

    /// Duplicate the top entry. Returns `false` (and logs) on overflow.
    pub fn push(&mut self) -> bool {
        if self.top + 1 >= MATRIX_STACK_DEPTH {
            error!("Matrix stack overflow (depth {})", MATRIX_STACK_DEPTH);
            return false;
        }
        self.entries[self.top + 1] = self.entries[self.top];
        self.top += 1;
        true
    }

    /// Drop the top entry. Returns `false` (and logs) on underflow.
    pub fn pop(&mut self) -> bool {
        if self.top == 0 {
            error!("Matrix stack underflow");
            return false;
        }
        self.top -= 1;
        true
    }

    /// `top = top * m`
    pub fn multiply(&mut self, m: &Mat4) {
        let top = self.top_mut();
        *top = transform::multiply(top, m);
    }
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

/// The three legacy stacks plus the active-mode selector.
#[derive(Debug, Clone)]
pub struct MatrixEngine {
    model_view: MatrixStack,
    projection: MatrixStack,
    texture: MatrixStack,
    active: StackKind,
}

impl MatrixEngine {
    pub fn new() -> Self {
        Self {
            model_view: MatrixStack::new(),
            projection: MatrixStack::new(),
            texture: MatrixStack::new(),
            active: StackKind::ModelView,
        }
    }

    /// Reset all stacks to identity and select model-view.
    pub fn reset(&mut self) {
        self.model_view.reset();
        self.projection.reset();
        self.texture.reset();
        self.active = StackKind::ModelView;
    }

    /// `glMatrixMode`. Unknown modes fall back to model-view.
    pub fn select(&mut self, mode: GLenum) {
        self.active = match StackKind::from_gl(mode) {
            Some(kind) => kind,
            None => {
                warn!("glMatrixMode: unknown mode 0x{:04X}, using GL_MODELVIEW", mode);
                StackKind::ModelView
            }
        };
    }

    pub fn active(&self) -> StackKind {
        self.active
    }

    pub fn stack(&self, kind: StackKind) -> &MatrixStack {
        match kind {
            StackKind::ModelView => &self.model_view,
            StackKind::Projection => &self.projection,
            StackKind::Texture => &self.texture,
        }
    }

    fn current(&mut self) -> &mut MatrixStack {
        match self.active {
            StackKind::ModelView => &mut self.model_view,
            StackKind::Projection => &mut self.projection,
            StackKind::Texture => &mut self.texture,
        }
    }

    pub fn top(&self, kind: StackKind) -> &Mat4 {
        self.stack(kind).top()
    }

    pub fn load_identity(&mut self) {
        *self.current().top_mut() = transform::identity();
    }

    pub fn load(&mut self, m: &Mat4) {
        *self.current().top_mut() = *m;
    }

    pub fn multiply(&mut self, m: &Mat4) {
        self.current().multiply(m);
    }

    pub fn push(&mut self) {
        self.current().push();
    }

    pub fn pop(&mut self) {
        self.current().pop();
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.multiply(&transform::translation(x, y, z));
    }

    pub fn rotate(&mut self, angle: f32, x: f32, y: f32, z: f32) {
        self.multiply(&transform::rotation(angle, x, y, z));
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.multiply(&transform::scaling(x, y, z));
    }

    /// Multiplies onto the top; callers load identity first for a fresh projection.
    pub fn ortho(&mut self, l: f64, r: f64, b: f64, t: f64, n: f64, f: f64) {
        self.multiply(&transform::ortho(
            l as f32, r as f32, b as f32, t as f32, n as f32, f as f32,
        ));
    }

    pub fn frustum(&mut self, l: f64, r: f64, b: f64, t: f64, n: f64, f: f64) {
        self.multiply(&transform::frustum(
            l as f32, r as f32, b as f32, t as f32, n as f32, f as f32,
        ));
    }

    /// Copy of the requested top matrix, for the `glGetFloatv` matrix tokens.
    pub fn get(&self, pname: GLenum) -> Option<Mat4> {
        match pname {
            gl::MODELVIEW_MATRIX => Some(*self.model_view.top()),
            gl::PROJECTION_MATRIX => Some(*self.projection.top()),
            _ => None,
        }
    }
}

impl Default for MatrixEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::transform_point;

    #[test]
    fn push_pop_is_identity_pair() {
        let mut engine = MatrixEngine::new();
        engine.translate(1.0, 2.0, 3.0);
        engine.rotate(33.0, 0.0, 1.0, 0.0);
        let before = *engine.top(StackKind::ModelView);
        engine.push();
        engine.scale(4.0, 4.0, 4.0);
        engine.translate(-9.0, 0.0, 0.0);
        engine.pop();
        assert_eq!(*engine.top(StackKind::ModelView), before);
    }

    #[test]
    fn overflow_leaves_stack_at_max_depth() {
        let mut stack = MatrixStack::new();
        for _ in 0..MATRIX_STACK_DEPTH - 1 {
            assert!(stack.push());
        }
        assert_eq!(stack.depth(), MATRIX_STACK_DEPTH - 1);
        assert!(!stack.push());
        assert_eq!(stack.depth(), MATRIX_STACK_DEPTH - 1);
    }

    #[test]
    fn underflow_keeps_base_entry() {
        let mut engine = MatrixEngine::new();
        engine.translate(5.0, 0.0, 0.0);
        engine.pop();
        assert_eq!(engine.stack(StackKind::ModelView).depth(), 0);
        assert_eq!(engine.top(StackKind::ModelView)[12], 5.0);
    }

    #[test]
    fn translate_moves_points() {
        let mut engine = MatrixEngine::new();
        engine.load_identity();
        engine.translate(1.0, -2.0, 3.5);
        let m = engine.top(StackKind::ModelView);
        assert_eq!(transform_point(m, [0.0, 0.0, 0.0, 1.0]), [1.0, -2.0, 3.5, 1.0]);
        assert_eq!(transform_point(m, [2.0, 2.0, 2.0, 1.0]), [3.0, 0.0, 5.5, 1.0]);
    }

    #[test]
    fn unit_ortho_maps_cube_onto_itself() {
        let mut engine = MatrixEngine::new();
        engine.select(gl::PROJECTION);
        engine.load_identity();
        engine.ortho(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
        let m = engine.top(StackKind::Projection);
        // x/y pass through; GL eye space looks down -z, so z is mirrored.
        let expected = [
            1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
        ];
        for i in 0..16 {
            assert!((m[i] - expected[i]).abs() < 1e-6);
        }
        for corner in [[-1.0, -1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]] {
            let p = transform_point(m, [corner[0], corner[1], corner[2], 1.0]);
            assert!(p[..3].iter().all(|v| (v.abs() - 1.0).abs() < 1e-6));
        }
    }

    #[test]
    fn ortho_composes_with_existing_top() {
        let mut engine = MatrixEngine::new();
        engine.select(gl::PROJECTION);
        engine.scale(2.0, 2.0, 2.0);
        engine.ortho(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
        assert_eq!(engine.top(StackKind::Projection)[0], 2.0);
    }

    #[test]
    fn stacks_are_independent() {
        let mut engine = MatrixEngine::new();
        engine.select(gl::TEXTURE);
        engine.scale(0.5, 0.5, 1.0);
        engine.select(gl::MODELVIEW);
        assert_eq!(*engine.top(StackKind::ModelView), transform::identity());
        assert_eq!(engine.top(StackKind::Texture)[0], 0.5);
    }

    #[test]
    fn unknown_mode_selects_model_view() {
        let mut engine = MatrixEngine::new();
        engine.select(gl::PROJECTION);
        engine.select(0x1234);
        assert_eq!(engine.active(), StackKind::ModelView);
    }

    #[test]
    fn get_returns_model_view_and_projection_only() {
        let mut engine = MatrixEngine::new();
        engine.translate(1.0, 0.0, 0.0);
        assert_eq!(engine.get(gl::MODELVIEW_MATRIX).map(|m| m[12]), Some(1.0));
        assert!(engine.get(gl::PROJECTION_MATRIX).is_some());
        assert!(engine.get(gl::TEXTURE_MATRIX).is_none());
    }
}
