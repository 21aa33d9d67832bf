//! Ground Reticle Resolver
//!
//! Every eligible frame, casts a ray from the camera against the named ground
//! object and publishes the candidate teleport point. Purely observational: it
//! never moves the camera.

use glam::Vec3;

use crate::physics::Ray;
use crate::scene::Scene;

/// Latest reticle result. `point` is `Some` exactly when the reticle is visible.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReticleState {
    point: Option<Vec3>,
}

impl ReticleState {
    /// Hidden reticle
    pub fn hidden() -> Self {
        Self { point: None }
    }

    /// Whether the last raycast hit the ground
    pub fn is_visible(&self) -> bool {
        self.point.is_some()
    }

    /// Ground hit point, defined iff visible
    pub fn point(&self) -> Option<Vec3> {
        self.point
    }
}

/// Publishes the reticle from ground raycasts.
#[derive(Debug, Clone)]
pub struct ReticleResolver {
    /// Name of the ground object to target
    pub ground_name: String,
    /// Marker height above the hit, for rendering only
    pub lift: f32,
    state: ReticleState,
}

impl Default for ReticleResolver {
    fn default() -> Self {
        Self::new("Ground", 0.02)
    }
}

impl ReticleResolver {
    pub fn new(ground_name: impl Into<String>, lift: f32) -> Self {
        Self {
            ground_name: ground_name.into(),
            lift,
            state: ReticleState::hidden(),
        }
    }

    /// Current state
    pub fn state(&self) -> ReticleState {
        self.state
    }

    /// Where to draw the marker: the hit nudged up to avoid z-fighting
    pub fn marker_position(&self) -> Option<Vec3> {
        self.state.point.map(|p| p + Vec3::Y * self.lift)
    }

    /// Recompute from a ray. Misses (or a missing ground object) hide the reticle.
    pub fn resolve(&mut self, ray: &Ray, scene: &Scene) -> ReticleState {
        let hit = scene
            .ground_named(&self.ground_name)
            .and_then(|ground| ground.intersect_ray(ray));
        self.state = ReticleState {
            point: hit.map(|h| h.point),
        };
        self.state
    }

    /// Hide the reticle (frame not eligible)
    pub fn clear(&mut self) {
        self.state = ReticleState::hidden();
    }
}
