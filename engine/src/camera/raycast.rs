//! Raycast Module
//!
//! Builds world-space rays from screen coordinates for the ground reticle and
//! guided-view pointer picking.

use glam::Vec3;

use super::controller::CameraState;
use crate::physics::Ray;

/// Calculate ray direction from screen UV coordinates
///
/// # Arguments
/// * `camera` - Camera pose
/// * `uv` - Normalized screen coordinates (0-1, 0-1) where (0,0) is bottom-left
/// * `aspect_ratio` - Screen aspect ratio (width / height)
/// * `fov` - Vertical field of view in radians
///
/// # Returns
/// Normalized ray direction in world space. `(0.5, 0.5)` is exactly the
/// camera's forward vector.
pub fn get_ray_direction(camera: &CameraState, uv: (f32, f32), aspect_ratio: f32, fov: f32) -> Vec3 {
    let ndc = (uv.0 * 2.0 - 1.0, uv.1 * 2.0 - 1.0);
    let half_fov = (fov * 0.5_f32).tan();

    let forward = camera.get_forward();
    let right = camera.get_right();
    let up = camera.get_up();

    (forward + right * ndc.0 * aspect_ratio * half_fov + up * ndc.1 * half_fov).normalize()
}

/// Ray from the camera through a screen point
pub fn screen_ray(camera: &CameraState, uv: (f32, f32), aspect_ratio: f32, fov: f32) -> Ray {
    Ray::new(camera.position, get_ray_direction(camera, uv, aspect_ratio, fov))
}

/// Ray from the camera through the exact viewport center
pub fn center_ray(camera: &CameraState) -> Ray {
    Ray::new(camera.position, camera.get_forward())
}

/// Raycast configuration for convenience
#[derive(Clone, Copy, Debug)]
pub struct RaycastConfig {
    /// Screen aspect ratio (width / height)
    pub aspect_ratio: f32,
    /// Vertical field of view in radians
    pub fov: f32,
}

impl Default for RaycastConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            fov: 75.0_f32.to_radians(),
        }
    }
}

impl RaycastConfig {
    /// Create a new raycast config with the given aspect ratio
    pub fn with_aspect(aspect_ratio: f32) -> Self {
        Self {
            aspect_ratio,
            ..Default::default()
        }
    }

    /// Ray through a screen point using this config
    pub fn screen_ray(&self, camera: &CameraState, uv: (f32, f32)) -> Ray {
        screen_ray(camera, uv, self.aspect_ratio, self.fov)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_direction_normalized() {
        let mut camera = CameraState::with_position(Vec3::new(0.0, 5.0, 10.0));
        camera.look_at(Vec3::ZERO);

        for x in [0.0, 0.25, 0.5, 0.75, 1.0] {
            for y in [0.0, 0.25, 0.5, 0.75, 1.0] {
                let ray = get_ray_direction(&camera, (x, y), 16.0 / 9.0, 1.2);
                assert!(
                    (ray.length() - 1.0).abs() < 0.001,
                    "Ray should be normalized, got length {}",
                    ray.length()
                );
            }
        }
    }

    #[test]
    fn test_center_uv_matches_forward() {
        let mut camera = CameraState::new();
        camera.yaw = 0.4;
        camera.set_pitch(-0.6);
        let dir = get_ray_direction(&camera, (0.5, 0.5), 16.0 / 9.0, 1.2);
        assert!((dir - camera.get_forward()).length() < 1e-5);
        assert!((center_ray(&camera).direction - dir).length() < 1e-5);
    }

    #[test]
    fn test_right_edge_bends_right() {
        let camera = CameraState::new();
        let dir = get_ray_direction(&camera, (1.0, 0.5), 1.0, 1.2);
        assert!(dir.x > 0.0);
        assert!(dir.y.abs() < 1e-5);
    }

    #[test]
    fn test_bottom_edge_bends_down() {
        let camera = CameraState::new();
        let dir = get_ray_direction(&camera, (0.5, 0.0), 1.0, 1.2);
        assert!(dir.y < 0.0);
    }

    #[test]
    fn test_raycast_config_with_aspect() {
        let config = RaycastConfig::with_aspect(4.0 / 3.0);
        assert!((config.aspect_ratio - 4.0 / 3.0).abs() < 0.01);
        assert!((config.fov - 75.0_f32.to_radians()).abs() < 0.01);
    }
}
