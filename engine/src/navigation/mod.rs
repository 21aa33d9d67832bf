//! Navigation module
//!
//! Camera locomotion, ground-targeted teleport transits and guided waypoints,
//! arbitrated by [`NavigationCore`].
//!
//! # Submodules
//!
//! - [`locomotion`] - Keyboard walking with collision veto
//! - [`reticle`] - Ground raycast publishing the teleport candidate
//! - [`transit`] - Constant-speed teleport animation
//! - [`waypoints`] - Guided-view proximity monitor
//! - [`schedule`] - Fixed-interval task for the proximity poll
//! - [`core`] - Mode selection, camera authority, commands and events

pub mod core;
pub mod locomotion;
pub mod reticle;
pub mod schedule;
pub mod transit;
pub mod waypoints;

pub use self::core::{CameraAuthority, NavCommand, NavCommandSender, NavEvent, NavMode, NavigationCore};
pub use locomotion::{LocomotionController, LocomotionGate, LocomotionOutcome, WALK_SPEED};
pub use reticle::{ReticleResolver, ReticleState};
pub use schedule::IntervalTask;
pub use transit::{TRANSIT_EPSILON, TRANSIT_SPEED, Transit, TransitAnimator, TransitRequest, TransitStep};
pub use waypoints::{Waypoint, WaypointChange, WaypointMonitor};
