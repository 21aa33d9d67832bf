//! Input Module
//!
//! Provides platform-agnostic input handling: the movement-intent sampler,
//! the fixed gizmo key mapping and the pointer-lock gate.
//! This module is decoupled from any specific windowing system (like winit)
//! to allow for flexible integration.
//!
//! # Example
//!
//! ```rust,ignore
//! use showroom_engine::input::{KeyCode, MovementKeys, PointerLockGate};
//!
//! let mut keys = MovementKeys::new();
//! let mut gate = PointerLockGate::new();
//!
//! gate.handle_left_click();
//! keys.handle_key(KeyCode::W, true);
//! if gate.is_locked() && keys.forward {
//!     // Move forward
//! }
//! ```

pub mod cursor_manager;
pub mod keyboard;

// Re-export commonly used types at module level
pub use cursor_manager::{CursorAction, LockState, PointerLockGate};
pub use keyboard::{GizmoKeys, GizmoMode, KeyCode, MovementKeys};
