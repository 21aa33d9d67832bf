//! Camera State Module
//!
//! First-person camera state: eye position plus a yaw/pitch orientation.
//! Mouse movement directly rotates the camera while the pointer is locked,
//! with no smoothing.
//!
//! # Coordinate System
//! - +X = right
//! - +Y = up
//! - -Z = forward (OpenGL/Vulkan convention)
//!
//! When yaw=0 and pitch=0, the camera looks toward -Z. Positive yaw turns
//! right, positive pitch looks up.

use glam::{EulerRot, Quat, Vec3};

/// Default pitch clamp: ±89 degrees in radians
const DEFAULT_PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// First-person camera pose and look settings.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraState {
    /// Eye position in world space
    pub position: Vec3,
    /// Horizontal angle (radians) - unrestricted, wraps around
    pub yaw: f32,
    /// Vertical angle (radians) - clamped to pitch_limits
    pub pitch: f32,
    /// Mouse sensitivity in radians per pixel (default: 0.002)
    pub sensitivity: f32,
    /// Pitch limits (min, max) in radians
    pitch_limits: (f32, f32),
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.6, 0.0),
            yaw: 0.0,
            pitch: 0.0,
            sensitivity: 0.002,
            pitch_limits: (-DEFAULT_PITCH_LIMIT, DEFAULT_PITCH_LIMIT),
        }
    }
}

impl CameraState {
    /// Create a new camera at eye height 1.6 looking toward -Z
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera with a custom position
    pub fn with_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set a symmetric pitch clamp (radians) and re-clamp the current pitch
    pub fn set_pitch_limit(&mut self, limit: f32) {
        let limit = limit.abs();
        self.pitch_limits = (-limit, limit);
        self.pitch = self.pitch.clamp(-limit, limit);
    }

    /// Get the pitch limits in radians (min, max)
    #[inline]
    pub fn pitch_limits(&self) -> (f32, f32) {
        self.pitch_limits
    }

    /// Set the pitch angle directly (in radians, will be clamped to limits)
    #[inline]
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.pitch_limits.0, self.pitch_limits.1);
    }

    /// Apply mouse movement delta (pixels) to rotate the camera
    ///
    /// Positive dx turns right, positive dy (mouse down) looks down.
    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        self.pitch = self.pitch.clamp(self.pitch_limits.0, self.pitch_limits.1);
    }

    /// Get the camera's forward direction vector (normalized)
    #[inline]
    pub fn get_forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Get the camera's right direction vector (normalized, horizontal)
    #[inline]
    pub fn get_right(&self) -> Vec3 {
        self.get_forward().cross(Vec3::Y).normalize()
    }

    /// Get the camera's up direction vector (normalized)
    #[inline]
    pub fn get_up(&self) -> Vec3 {
        let forward = self.get_forward();
        let right = self.get_right();
        right.cross(forward).normalize()
    }

    /// Forward with the vertical component removed, renormalized.
    ///
    /// Depends on yaw only, so it is well defined at any clamped pitch.
    #[inline]
    pub fn horizontal_forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Horizontal right vector, perpendicular to `horizontal_forward`.
    ///
    /// Computed as forward x up; up x forward would point left with -Z forward.
    #[inline]
    pub fn horizontal_right(&self) -> Vec3 {
        self.horizontal_forward().cross(Vec3::Y)
    }

    /// Orient the camera along a direction. Zero-length directions are ignored.
    pub fn set_forward(&mut self, direction: Vec3) {
        let Some(dir) = direction.try_normalize() else {
            return;
        };
        self.yaw = dir.x.atan2(-dir.z);
        self.pitch = dir
            .y
            .clamp(-1.0, 1.0)
            .asin()
            .clamp(self.pitch_limits.0, self.pitch_limits.1);
    }

    /// Point the camera at a specific world position
    pub fn look_at(&mut self, target: Vec3) {
        let to_target = target - self.position;
        if to_target.length() > 0.001 {
            self.set_forward(to_target);
        }
    }

    /// World-space orientation as a quaternion (no roll).
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, -self.yaw, self.pitch, 0.0)
    }

    /// Orientation as XYZ Euler angles (radians), the persisted rotation format.
    pub fn euler_xyz(&self) -> Vec3 {
        let (x, y, z) = self.orientation().to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    /// Restore orientation from XYZ Euler angles (radians). Roll is discarded.
    pub fn set_euler_xyz(&mut self, euler: Vec3) {
        let orientation = Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z);
        self.set_forward(orientation * Vec3::NEG_Z);
    }

    /// Reset camera orientation to default (looking toward -Z)
    pub fn reset_orientation(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let camera = CameraState::new();
        assert_eq!(camera.position, Vec3::new(0.0, 1.6, 0.0));
        assert_eq!(camera.yaw, 0.0);
        assert_eq!(camera.pitch, 0.0);
        assert_eq!(camera.sensitivity, 0.002);
    }

    #[test]
    fn test_apply_mouse_delta_yaw() {
        let mut camera = CameraState::new();
        camera.apply_mouse_delta(100.0, 0.0);

        // Yaw should increase by 100 * 0.002 = 0.2 radians
        assert!((camera.yaw - 0.2).abs() < 0.001);
        assert_eq!(camera.pitch, 0.0);
    }

    #[test]
    fn test_pitch_clamping() {
        let mut camera = CameraState::new();
        camera.apply_mouse_delta(0.0, -100000.0);
        assert!((camera.pitch - DEFAULT_PITCH_LIMIT).abs() < 0.001);

        camera.set_pitch_limit(0.4 * std::f32::consts::PI);
        assert!((camera.pitch - 0.4 * std::f32::consts::PI).abs() < 0.001);
    }

    #[test]
    fn test_forward_vector_at_origin() {
        let camera = CameraState::new();
        let forward = camera.get_forward();
        assert!(forward.x.abs() < 0.001);
        assert!(forward.y.abs() < 0.001);
        assert!((forward.z - (-1.0)).abs() < 0.001);
    }

    #[test]
    fn test_right_vector_points_right() {
        let camera = CameraState::new();
        let right = camera.get_right();
        assert!((right.x - 1.0).abs() < 0.001);
        assert!((camera.horizontal_right() - right).length() < 0.001);
    }

    #[test]
    fn test_horizontal_forward_ignores_pitch() {
        let mut camera = CameraState::new();
        camera.yaw = 0.7;
        camera.set_pitch(-1.2);
        let flat = camera.horizontal_forward();
        assert!(flat.y.abs() < 1e-6);
        assert!((flat.length() - 1.0).abs() < 1e-5);
        let forward = camera.get_forward();
        let expected = Vec3::new(forward.x, 0.0, forward.z).normalize();
        assert!((flat - expected).length() < 1e-4);
    }

    #[test]
    fn test_look_at() {
        let mut camera = CameraState::with_position(Vec3::new(0.0, 0.0, 10.0));
        camera.look_at(Vec3::new(10.0, 0.0, 10.0));
        let forward = camera.get_forward();
        assert!((forward - Vec3::X).length() < 0.001);
    }

    #[test]
    fn test_look_at_self_is_noop() {
        let mut camera = CameraState::new();
        camera.yaw = 0.3;
        camera.look_at(camera.position);
        assert_eq!(camera.yaw, 0.3);
    }

    #[test]
    fn test_euler_round_trip_preserves_forward() {
        let mut camera = CameraState::new();
        camera.yaw = 1.1;
        camera.set_pitch(-0.35);
        let forward = camera.get_forward();

        let euler = camera.euler_xyz();
        let mut restored = CameraState::new();
        restored.set_euler_xyz(euler);
        assert!((restored.get_forward() - forward).length() < 1e-4);
    }

    #[test]
    fn test_orientation_matches_forward() {
        let mut camera = CameraState::new();
        camera.yaw = -2.0;
        camera.set_pitch(0.5);
        let rotated = camera.orientation() * Vec3::NEG_Z;
        assert!((rotated - camera.get_forward()).length() < 1e-4);
    }
}
