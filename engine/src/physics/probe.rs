//! Collision Probe
//!
//! Single-ray horizontal obstruction check used by keyboard locomotion.
//! The ray starts below the eye (torso height) so low furniture is caught, and
//! runs along the exact intended move direction. A thin obstacle approached at
//! a grazing angle can slip past the single ray; that is accepted, this is not
//! a swept-volume test.

use glam::Vec3;

use super::collision::Ray;
use crate::scene::SceneNode;

/// Default clearance: obstacles nearer than 1m block movement
pub const DEFAULT_CLEARANCE: f32 = 1.0;

/// Default probe drop below eye height
pub const DEFAULT_PROBE_DROP: f32 = 0.5;

/// Per-frame, per-direction obstruction test.
#[derive(Clone, Copy, Debug)]
pub struct CollisionProbe {
    /// Nearest-hit distance below which movement is blocked
    pub clearance: f32,
    /// Downward offset of the ray origin from the eye
    pub drop: f32,
}

impl Default for CollisionProbe {
    fn default() -> Self {
        Self {
            clearance: DEFAULT_CLEARANCE,
            drop: DEFAULT_PROBE_DROP,
        }
    }
}

impl CollisionProbe {
    pub fn new(clearance: f32, drop: f32) -> Self {
        Self { clearance, drop }
    }

    /// The ray this probe would cast for an eye position and move direction
    pub fn ray(&self, eye: Vec3, direction: Vec3) -> Ray {
        Ray::new(eye - Vec3::Y * self.drop, direction)
    }

    /// Whether moving from `eye` along `direction` is blocked this frame.
    ///
    /// An absent collidable always permits movement.
    pub fn is_blocked(&self, eye: Vec3, direction: Vec3, collidable: Option<&SceneNode>) -> bool {
        let Some(target) = collidable else {
            return false;
        };

        let ray = self.ray(eye, direction);
        match target.intersect_ray(&ray, true) {
            Some(hit) if hit.distance < self.clearance => {
                tracing::trace!(distance = hit.distance, "movement blocked");
                true
            }
            _ => false,
        }
    }
}
