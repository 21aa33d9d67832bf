//! Camera Module
//!
//! Provides first-person camera state and screen-ray construction.
//! This module is window-system agnostic - it only deals with camera state and math.

pub mod controller;
pub mod raycast;

pub use controller::CameraState;
pub use raycast::{RaycastConfig, center_ray, get_ray_direction, screen_ray};
