//! Teleport Transit Animator
//!
//! Moves the camera from where it is to a requested point at constant speed,
//! optionally turning the gaze toward a forced look-at point on the way.
//!
//! # States
//!
//! - **Idle**: no transit; locomotion owns the camera
//! - **Transiting**: the animator owns the camera position until completion
//!
//! Only one transit is live at a time. A new request replaces the in-flight one
//! and restarts from the camera's current (possibly mid-flight) position.

use glam::Vec3;

use crate::camera::CameraState;

/// Constant transit speed in meters per second
pub const TRANSIT_SPEED: f32 = 8.0;

/// Transits shorter than this (seconds) complete on their first frame
pub const TRANSIT_EPSILON: f32 = 0.01;

/// A request to relocate the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitRequest {
    /// Requested destination; only X/Z are used, eye height is preserved
    pub target: Vec3,
    /// Point to turn the gaze toward during the transit (guided views)
    pub forced_look_at: Option<Vec3>,
}

impl TransitRequest {
    /// Plain teleport to a ground point
    pub fn to(target: Vec3) -> Self {
        Self {
            target,
            forced_look_at: None,
        }
    }

    /// Guided transit that also reorients the gaze
    pub fn with_look_at(target: Vec3, look_at: Vec3) -> Self {
        Self {
            target,
            forced_look_at: Some(look_at),
        }
    }
}

/// The live transit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transit {
    pub start: Vec3,
    pub target: Vec3,
    /// Progress in [0, 1]
    pub elapsed_fraction: f32,
    /// Derived from distance / speed
    pub duration: f32,
    pub forced_look_at: Option<Vec3>,
    /// Gaze at the moment the transit began
    start_forward: Vec3,
}

impl Transit {
    /// Total straight-line distance of this transit
    pub fn distance(&self) -> f32 {
        self.start.distance(self.target)
    }
}

/// Result of one animator frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitStep {
    /// No transit in flight
    Idle,
    /// Still moving
    InFlight { elapsed_fraction: f32 },
    /// Arrived this frame; camera snapped exactly to `position`
    Completed { position: Vec3 },
}

/// Drives at most one transit at a time.
#[derive(Debug, Clone)]
pub struct TransitAnimator {
    /// Meters per second
    pub speed: f32,
    /// Durations at or below this complete immediately
    pub epsilon: f32,
    /// Minimum duration for transits with a forced look-at, so the gaze turn
    /// stays gradual even when the camera is already at the vantage point
    pub look_blend_min_duration: f32,
    active: Option<Transit>,
}

impl Default for TransitAnimator {
    fn default() -> Self {
        Self {
            speed: TRANSIT_SPEED,
            epsilon: TRANSIT_EPSILON,
            look_blend_min_duration: 0.5,
            active: None,
        }
    }
}

impl TransitAnimator {
    pub fn new(speed: f32, epsilon: f32, look_blend_min_duration: f32) -> Self {
        Self {
            speed,
            epsilon,
            look_blend_min_duration,
            active: None,
        }
    }

    /// Whether a transit is in flight
    pub fn is_transiting(&self) -> bool {
        self.active.is_some()
    }

    /// The live transit, if any
    pub fn active(&self) -> Option<&Transit> {
        self.active.as_ref()
    }

    /// Start a transit from the camera's current pose.
    ///
    /// Returns the transit it replaced, if one was in flight.
    pub fn begin(&mut self, request: TransitRequest, camera: &CameraState) -> Option<Transit> {
        let start = camera.position;
        let target = Vec3::new(request.target.x, start.y, request.target.z);
        let distance = start.distance(target);

        let mut duration = if self.speed > 0.0 && distance > 0.0 {
            distance / self.speed
        } else {
            0.0
        };
        if request.forced_look_at.is_some() {
            duration = duration.max(self.look_blend_min_duration);
        }

        let transit = Transit {
            start,
            target,
            elapsed_fraction: 0.0,
            duration,
            forced_look_at: request.forced_look_at,
            start_forward: camera.get_forward(),
        };

        let previous = self.active.replace(transit);
        match previous {
            Some(old) => tracing::debug!(
                from = ?start, to = ?target, abandoned = ?old.target, "transit preempted"
            ),
            None => tracing::debug!(from = ?start, to = ?target, duration, "transit started"),
        }
        previous
    }

    /// Drop any in-flight transit without completing it
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Advance the live transit by one frame and write the camera pose.
    pub fn update(&mut self, camera: &mut CameraState, delta_time: f32) -> TransitStep {
        let Some(transit) = self.active.as_mut() else {
            return TransitStep::Idle;
        };

        if transit.duration <= self.epsilon {
            transit.elapsed_fraction = 1.0;
        } else {
            transit.elapsed_fraction += delta_time / transit.duration;
        }

        if transit.elapsed_fraction >= 1.0 {
            let done = *transit;
            self.active = None;

            // Snap to remove interpolation drift
            camera.position = done.target;
            if let Some(look_at) = done.forced_look_at {
                camera.look_at(look_at);
            }
            tracing::debug!(position = ?done.target, "transit completed");
            return TransitStep::Completed {
                position: done.target,
            };
        }

        let fraction = transit.elapsed_fraction;
        camera.position = transit.start.lerp(transit.target, fraction);

        if let Some(look_at) = transit.forced_look_at {
            if let Some(desired) = (look_at - camera.position).try_normalize() {
                let blend = smoothstep(fraction);
                let gaze = transit
                    .start_forward
                    .lerp(desired, blend)
                    .try_normalize()
                    .unwrap_or(desired);
                camera.set_forward(gaze);
            }
        }

        TransitStep::InFlight {
            elapsed_fraction: fraction,
        }
    }
}

/// Ease-in/ease-out weight for gaze blending
fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
