//! Navigation Configuration
//!
//! Centralized tunables for locomotion, collision, teleport transits, the
//! ground reticle and guided waypoints. `Default` reproduces the showroom's
//! shipped values; a JSON file can override any subset of them.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};
use crate::navigation::waypoints::Waypoint;

/// All navigation tunables.
///
/// Missing fields in a JSON override fall back to their defaults.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavigationConfig {
    /// Keyboard locomotion speed (units/second)
    pub walk_speed: f32,
    /// Obstacles nearer than this along the move direction block movement
    pub collision_clearance: f32,
    /// How far below the eye the collision ray starts (torso height)
    pub probe_drop: f32,
    /// Constant teleport transit speed (units/second)
    pub transit_speed: f32,
    /// Transits shorter than this many seconds complete immediately
    pub transit_epsilon: f32,
    /// Lower bound on transit duration when a forced look-at is blended in
    pub look_blend_min_duration: f32,
    /// Height the reticle marker is drawn above the ground hit
    pub reticle_lift: f32,
    /// Name of the ground object the reticle raycasts against
    pub ground_name: String,
    /// Half side length of the square ground plane
    pub ground_half_extent: f32,
    /// Seconds between waypoint proximity checks
    pub waypoint_poll_interval: f32,
    /// Camera position when no saved scene is supplied
    pub camera_start: Vec3,
    /// Mouse look sensitivity (radians per pixel)
    pub mouse_sensitivity: f32,
    /// Pitch clamp in degrees (symmetric)
    pub pitch_limit_degrees: f32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Viewport aspect ratio (width / height)
    pub aspect_ratio: f32,
    /// JPEG quality for saved thumbnails (1-100)
    pub thumbnail_quality: u8,
    /// Guided-view vantage points
    pub waypoints: Vec<Waypoint>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            collision_clearance: 1.0,
            probe_drop: 0.5,
            transit_speed: 8.0,
            transit_epsilon: 0.01,
            look_blend_min_duration: 0.5,
            reticle_lift: 0.02,
            ground_name: "Ground".to_string(),
            ground_half_extent: 50.0,
            waypoint_poll_interval: 0.1,
            camera_start: Vec3::new(0.0, 1.6, 0.0),
            mouse_sensitivity: 0.002,
            pitch_limit_degrees: 89.0,
            fov_degrees: 75.0,
            aspect_ratio: 16.0 / 9.0,
            thumbnail_quality: 50,
            waypoints: default_waypoints(),
        }
    }
}

/// The four guided vantage points around the showroom centre.
pub fn default_waypoints() -> Vec<Waypoint> {
    vec![
        Waypoint::new(
            "View Center",
            Vec3::new(5.0, 1.6, 5.0),
            Vec3::new(0.0, 0.0, 0.0),
        ),
        Waypoint::new(
            "View Building",
            Vec3::new(-5.0, 1.6, -5.0),
            Vec3::new(5.0, 0.0, 5.0),
        ),
        Waypoint::new("Overview", Vec3::new(0.0, 1.6, 8.0), Vec3::new(0.0, 0.0, -8.0)),
        Waypoint::new("Side View", Vec3::new(8.0, 1.6, 0.0), Vec3::new(-8.0, 0.0, 0.0)),
    ]
}

impl NavigationConfig {
    /// Parse a config from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from a JSON file on disk.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| NavError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), waypoints = config.waypoints.len(), "loaded navigation config");
        Ok(config)
    }

    /// Pitch clamp converted to radians.
    pub fn pitch_limit(&self) -> f32 {
        self.pitch_limit_degrees.to_radians()
    }

    /// Vertical field of view in radians.
    pub fn fov(&self) -> f32 {
        self.fov_degrees.to_radians()
    }
}
