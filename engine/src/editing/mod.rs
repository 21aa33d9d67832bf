//! Model Editing
//!
//! Direct manipulation of the loaded model's placement while in editing mode.
//! The host's transform gizmo reports drag deltas; the editor applies them to
//! the collidable's transform according to the selected gizmo mode.

use glam::Vec3;

use crate::input::{GizmoKeys, GizmoMode, KeyCode};
use crate::scene::ModelTransform;

/// Minimum allowed scale per axis.
pub const SCALE_MIN: f32 = 0.01;

/// Maximum allowed scale per axis.
pub const SCALE_MAX: f32 = 100.0;

/// Apply one gizmo drag to a transform.
///
/// - **Translate**: `delta` is a world-space offset
/// - **Rotate**: `delta` is added to the XYZ Euler angles (radians)
/// - **Scale**: `delta` is added per axis, clamped to [`SCALE_MIN`, `SCALE_MAX`]
pub fn apply_gizmo_delta(transform: &mut ModelTransform, mode: GizmoMode, delta: Vec3) {
    match mode {
        GizmoMode::Translate => transform.position += delta,
        GizmoMode::Rotate => transform.rotation += delta,
        GizmoMode::Scale => {
            transform.scale = (transform.scale + delta).clamp(Vec3::splat(SCALE_MIN), Vec3::splat(SCALE_MAX));
        }
    }
}

/// Editing-mode state: the active gizmo mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelEditor {
    mode: GizmoMode,
}

impl ModelEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> GizmoMode {
        self.mode
    }

    /// Switch gizmo mode from a key press. Returns true if the key was a gizmo key.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        let Some(mode) = GizmoKeys::mode_for(key) else {
            return false;
        };
        if mode != self.mode {
            tracing::debug!(?mode, "gizmo mode changed");
        }
        self.mode = mode;
        true
    }

    /// Apply a drag delta in the current mode
    pub fn apply(&self, transform: &mut ModelTransform, delta: Vec3) {
        apply_gizmo_delta(transform, self.mode, delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_moves_position() {
        let mut transform = ModelTransform::default();
        apply_gizmo_delta(&mut transform, GizmoMode::Translate, Vec3::new(1.0, 0.0, -2.0));
        assert_eq!(transform.position, Vec3::new(1.0, 0.0, -2.0));
        assert_eq!(transform.scale, Vec3::ONE);
    }

    #[test]
    fn test_rotate_accumulates_euler() {
        let mut transform = ModelTransform::default();
        apply_gizmo_delta(&mut transform, GizmoMode::Rotate, Vec3::new(0.0, 0.5, 0.0));
        apply_gizmo_delta(&mut transform, GizmoMode::Rotate, Vec3::new(0.0, 0.25, 0.0));
        assert!((transform.rotation.y - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_scale_stays_positive() {
        let mut transform = ModelTransform::default();
        apply_gizmo_delta(&mut transform, GizmoMode::Scale, Vec3::new(-5.0, 1.0, 0.0));
        assert_eq!(transform.scale, Vec3::new(SCALE_MIN, 2.0, 1.0));
    }

    #[test]
    fn test_keys_switch_mode() {
        let mut editor = ModelEditor::new();
        assert_eq!(editor.mode(), GizmoMode::Translate);
        assert!(editor.handle_key(KeyCode::R));
        assert_eq!(editor.mode(), GizmoMode::Rotate);
        assert!(editor.handle_key(KeyCode::S));
        assert_eq!(editor.mode(), GizmoMode::Scale);
        assert!(!editor.handle_key(KeyCode::W));
        assert_eq!(editor.mode(), GizmoMode::Scale);
    }
}
