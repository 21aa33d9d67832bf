//! Locomotion Controller
//!
//! Converts held movement keys and camera facing into a per-frame
//! displacement on the horizontal plane, vetoed by the collision probe.
//!
//! # Model
//!
//! - Walk speed: 5.0 m/s, constant (no acceleration)
//! - Diagonal input is normalized, so diagonals are not faster
//! - A blocked direction cancels the whole frame's movement (no sliding)
//!
//! # Usage
//!
//! ```rust,ignore
//! let outcome = locomotion.update(&keys, gate, &mut camera, scene.collidable(), dt);
//! ```

use glam::Vec3;

use crate::camera::CameraState;
use crate::input::MovementKeys;
use crate::physics::CollisionProbe;
use crate::scene::SceneNode;

/// Walk speed in meters per second
pub const WALK_SPEED: f32 = 5.0;

/// Whether locomotion may run this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocomotionGate {
    /// Pointer locked on desktop
    Live,
    /// Pointer unlocked
    Unlocked,
    /// Immersive (VR) session owns the camera
    Immersive,
}

/// What a locomotion step did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocomotionOutcome {
    /// Gate closed; nothing evaluated
    Inert,
    /// No net movement intent
    Idle,
    /// The probe found an obstacle within clearance along this direction
    Blocked { direction: Vec3 },
    /// Camera moved by this displacement
    Moved { displacement: Vec3 },
}

/// Keyboard locomotion.
#[derive(Clone, Copy, Debug)]
pub struct LocomotionController {
    /// Movement speed in meters per second
    pub speed: f32,
    pub probe: CollisionProbe,
}

impl Default for LocomotionController {
    fn default() -> Self {
        Self {
            speed: WALK_SPEED,
            probe: CollisionProbe::default(),
        }
    }
}

impl LocomotionController {
    pub fn new(speed: f32, probe: CollisionProbe) -> Self {
        Self { speed, probe }
    }

    /// Combined, normalized horizontal move direction for the held keys.
    ///
    /// Returns `None` when the keys cancel out or none are held.
    pub fn move_direction(keys: &MovementKeys, camera: &CameraState) -> Option<Vec3> {
        let direction = camera.horizontal_forward() * keys.forward_axis() as f32
            + camera.horizontal_right() * keys.right_axis() as f32;
        direction.try_normalize()
    }

    /// Advance the camera for one frame.
    pub fn update(
        &self,
        keys: &MovementKeys,
        gate: LocomotionGate,
        camera: &mut CameraState,
        collidable: Option<&SceneNode>,
        delta_time: f32,
    ) -> LocomotionOutcome {
        if gate != LocomotionGate::Live {
            return LocomotionOutcome::Inert;
        }

        let Some(direction) = Self::move_direction(keys, camera) else {
            return LocomotionOutcome::Idle;
        };

        if self.probe.is_blocked(camera.position, direction, collidable) {
            return LocomotionOutcome::Blocked { direction };
        }

        let displacement = direction * self.speed * delta_time;
        camera.position += displacement;
        LocomotionOutcome::Moved { displacement }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;

    fn keys(pressed: &[KeyCode]) -> MovementKeys {
        let mut keys = MovementKeys::new();
        for key in pressed {
            keys.handle_key(*key, true);
        }
        keys
    }

    #[test]
    fn test_forward_moves_along_facing() {
        let controller = LocomotionController::default();
        let mut camera = CameraState::new();
        let outcome = controller.update(&keys(&[KeyCode::W]), LocomotionGate::Live, &mut camera, None, 0.5);
        assert!(matches!(outcome, LocomotionOutcome::Moved { .. }));
        assert!((camera.position - Vec3::new(0.0, 1.6, -2.5)).length() < 1e-5);
    }

    #[test]
    fn test_pitch_does_not_change_height() {
        let controller = LocomotionController::default();
        let mut camera = CameraState::new();
        camera.set_pitch(-1.0);
        controller.update(&keys(&[KeyCode::W]), LocomotionGate::Live, &mut camera, None, 1.0);
        assert!((camera.position.y - 1.6).abs() < 1e-6);
        assert!((camera.position.z + 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_strafe_directions() {
        let controller = LocomotionController::default();
        let mut camera = CameraState::new();
        controller.update(&keys(&[KeyCode::D]), LocomotionGate::Live, &mut camera, None, 1.0);
        assert!((camera.position.x - 5.0).abs() < 1e-5);

        let mut camera = CameraState::new();
        controller.update(&keys(&[KeyCode::A]), LocomotionGate::Live, &mut camera, None, 1.0);
        assert!((camera.position.x + 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let controller = LocomotionController::default();
        let mut camera = CameraState::new();
        controller.update(&keys(&[KeyCode::W, KeyCode::D]), LocomotionGate::Live, &mut camera, None, 1.0);
        let horizontal = Vec3::new(camera.position.x, 0.0, camera.position.z);
        assert!((horizontal.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_opposing_keys_idle() {
        let controller = LocomotionController::default();
        let mut camera = CameraState::new();
        let outcome = controller.update(
            &keys(&[KeyCode::W, KeyCode::S]),
            LocomotionGate::Live,
            &mut camera,
            None,
            1.0,
        );
        assert_eq!(outcome, LocomotionOutcome::Idle);
        assert_eq!(camera.position, Vec3::new(0.0, 1.6, 0.0));
    }

    #[test]
    fn test_gate_closed_is_inert() {
        let controller = LocomotionController::default();
        for gate in [LocomotionGate::Unlocked, LocomotionGate::Immersive] {
            let mut camera = CameraState::new();
            let outcome = controller.update(&keys(&[KeyCode::W]), gate, &mut camera, None, 1.0);
            assert_eq!(outcome, LocomotionOutcome::Inert);
            assert_eq!(camera.position, Vec3::new(0.0, 1.6, 0.0));
        }
    }
}
