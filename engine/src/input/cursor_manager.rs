//! Pointer-Lock Gate
//!
//! Tracks whether the pointer is locked to the viewport. While unlocked, look
//! rotation and keyboard locomotion are inert. Desktop only: immersive mode
//! bypasses the gate entirely.
//!
//! # Usage
//!
//! ```rust,ignore
//! use showroom_engine::input::{CursorAction, PointerLockGate};
//!
//! let mut gate = PointerLockGate::new();
//!
//! // Canvas clicked while unlocked: acquire lock
//! if gate.handle_left_click() == CursorAction::ApplyState {
//!     // grab + hide the cursor on the window
//! }
//!
//! // ESC pressed: release
//! gate.handle_escape();
//! ```

/// Actions that the gate recommends after handling events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorAction {
    /// No action needed
    None,
    /// Apply cursor state to window (grab/hide or release/show)
    ApplyState,
}

/// Pointer lock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockState {
    /// Navigation input is inert
    #[default]
    Unlocked,
    /// Mouse drives look rotation, keys drive locomotion
    Locked,
}

/// Binary lock state machine driven by host input events.
#[derive(Debug, Clone)]
pub struct PointerLockGate {
    state: LockState,
}

impl Default for PointerLockGate {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerLockGate {
    /// Create a gate in the Unlocked state. The first canvas click locks it.
    pub fn new() -> Self {
        Self {
            state: LockState::Unlocked,
        }
    }

    /// Current lock state.
    pub fn state(&self) -> LockState {
        self.state
    }

    /// Shorthand for `state() == LockState::Locked`.
    pub fn is_locked(&self) -> bool {
        self.state == LockState::Locked
    }

    /// Acquire the lock. Returns `ApplyState` if the state changed.
    pub fn lock(&mut self) -> CursorAction {
        self.transition(LockState::Locked)
    }

    /// Release the lock. Returns `ApplyState` if the state changed.
    pub fn unlock(&mut self) -> CursorAction {
        self.transition(LockState::Unlocked)
    }

    /// Handle left-click on the viewport: acquires the lock when unlocked.
    ///
    /// Clicking again when already locked does nothing here; the click is then
    /// a teleport click and is handled by the navigation core.
    pub fn handle_left_click(&mut self) -> CursorAction {
        self.lock()
    }

    /// Handle ESC key press: release the lock.
    pub fn handle_escape(&mut self) -> CursorAction {
        self.unlock()
    }

    /// Handle window focus lost: the host loses the lock with focus.
    pub fn handle_focus_lost(&mut self) -> CursorAction {
        self.unlock()
    }

    fn transition(&mut self, next: LockState) -> CursorAction {
        if self.state == next {
            return CursorAction::None;
        }
        tracing::debug!(from = ?self.state, to = ?next, "pointer lock changed");
        self.state = next;
        CursorAction::ApplyState
    }

    /// Get a human-readable status message for the current state.
    pub fn status_message(&self) -> &'static str {
        match self.state {
            LockState::Locked => "WASD to move, mouse to look, click to teleport. ESC to release.",
            LockState::Unlocked => "Click to start.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_starts_unlocked() {
        let gate = PointerLockGate::new();
        assert_eq!(gate.state(), LockState::Unlocked);
        assert!(!gate.is_locked());
    }

    #[test]
    fn test_left_click_locks_once() {
        let mut gate = PointerLockGate::new();

        let action = gate.handle_left_click();
        assert_eq!(action, CursorAction::ApplyState);
        assert!(gate.is_locked());

        // Clicking again when already locked does nothing
        let action = gate.handle_left_click();
        assert_eq!(action, CursorAction::None);
        assert!(gate.is_locked());
    }

    #[test]
    fn test_handle_escape_releases() {
        let mut gate = PointerLockGate::new();
        gate.lock();

        let action = gate.handle_escape();
        assert_eq!(action, CursorAction::ApplyState);
        assert!(!gate.is_locked());

        // Pressing ESC again when already released does nothing
        let action = gate.handle_escape();
        assert_eq!(action, CursorAction::None);
    }

    #[test]
    fn test_focus_lost_unlocks() {
        let mut gate = PointerLockGate::new();
        gate.lock();
        assert_eq!(gate.handle_focus_lost(), CursorAction::ApplyState);
        assert_eq!(gate.state(), LockState::Unlocked);
    }

    #[test]
    fn test_status_message() {
        let mut gate = PointerLockGate::new();
        assert!(gate.status_message().contains("Click"));

        gate.lock();
        assert!(gate.status_message().contains("ESC"));
    }
}
