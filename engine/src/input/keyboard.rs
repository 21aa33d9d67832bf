//! Keyboard Input Module
//!
//! Tracks movement key state (the movement intent) and the fixed editing-mode
//! gizmo keys. Decoupled from winit to use generic key codes.

/// Generic key codes, independent of windowing system.
///
/// Only the keys the showroom reacts to are named; everything else maps to
/// `Unknown` and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    // Movement keys
    W,
    A,
    S,
    D,

    // Arrow keys
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Gizmo mode keys (editing)
    T,
    R,

    // Control keys
    Escape,

    /// Catch-all for unhandled keys
    Unknown,
}

/// Movement intent: which movement keys are currently held.
///
/// W/S/A/D and the arrow keys both drive the same four flags. Last write wins
/// per flag, so repeated key-down events are harmless.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementKeys {
    /// W / ArrowUp - move forward
    pub forward: bool,
    /// S / ArrowDown - move backward
    pub backward: bool,
    /// A / ArrowLeft - strafe left
    pub left: bool,
    /// D / ArrowRight - strafe right
    pub right: bool,
}

impl MovementKeys {
    /// Create a new movement keys state with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update movement state based on key press/release.
    ///
    /// Returns `true` if the key was a movement key and was handled,
    /// `false` otherwise.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key {
            KeyCode::W | KeyCode::ArrowUp => {
                self.forward = pressed;
                true
            }
            KeyCode::S | KeyCode::ArrowDown => {
                self.backward = pressed;
                true
            }
            KeyCode::A | KeyCode::ArrowLeft => {
                self.left = pressed;
                true
            }
            KeyCode::D | KeyCode::ArrowRight => {
                self.right = pressed;
                true
            }
            _ => false,
        }
    }

    /// Check if any movement key is currently pressed.
    pub fn any_pressed(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Reset all movement keys to released state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Get the forward/backward movement direction (-1, 0, or 1).
    pub fn forward_axis(&self) -> i32 {
        (self.forward as i32) - (self.backward as i32)
    }

    /// Get the left/right movement direction (-1, 0, or 1).
    pub fn right_axis(&self) -> i32 {
        (self.right as i32) - (self.left as i32)
    }
}

/// Transform gizmo mode used while editing the model placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

/// Fixed key mapping for gizmo mode switching: T / R / S.
pub struct GizmoKeys;

impl GizmoKeys {
    /// Map a key to the gizmo mode it selects, if any.
    pub fn mode_for(key: KeyCode) -> Option<GizmoMode> {
        match key {
            KeyCode::T => Some(GizmoMode::Translate),
            KeyCode::R => Some(GizmoMode::Rotate),
            KeyCode::S => Some(GizmoMode::Scale),
            _ => None,
        }
    }
}
