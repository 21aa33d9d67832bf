//! Waypoint Proximity Monitor
//!
//! Guided-view vantage points. On each poll the camera's distance to every
//! waypoint is checked; walking (or transiting) into a waypoint's activation
//! radius makes it the single active waypoint, and the caller then issues a
//! transit with the waypoint's look-at target to reorient the gaze.
//!
//! A waypoint fires when it is *entered*: being inside its radius on this poll
//! but not the previous one. Leaving the active waypoint's radius hands over to
//! the nearest other radius still containing the camera, or deactivates it, so
//! coming back re-triggers the reorientation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

fn default_activation_radius() -> f32 {
    2.0
}

/// A predefined point of interest with its guided look target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub label: String,
    pub position: Vec3,
    pub look_at: Vec3,
    #[serde(default = "default_activation_radius")]
    pub activation_radius: f32,
}

impl Waypoint {
    pub fn new(label: impl Into<String>, position: Vec3, look_at: Vec3) -> Self {
        Self {
            label: label.into(),
            position,
            look_at,
            activation_radius: default_activation_radius(),
        }
    }

    /// Whether `point` lies strictly inside the activation radius
    pub fn contains(&self, point: Vec3) -> bool {
        point.distance(self.position) < self.activation_radius
    }
}

/// Change in the active waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaypointChange {
    /// `index` became active, replacing `previous` if there was one
    Activated { index: usize, previous: Option<usize> },
    /// `index` is no longer active
    Deactivated { index: usize },
}

/// Tracks which waypoint (if any) is active.
#[derive(Debug, Clone, Default)]
pub struct WaypointMonitor {
    waypoints: Vec<Waypoint>,
    active: Option<usize>,
    /// Containment on the previous poll, per waypoint
    inside: Vec<bool>,
}

impl WaypointMonitor {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        let inside = vec![false; waypoints.len()];
        Self {
            waypoints,
            active: None,
            inside,
        }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// Index of the active waypoint
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_waypoint(&self) -> Option<&Waypoint> {
        self.active.and_then(|i| self.waypoints.get(i))
    }

    /// Check the camera against every waypoint.
    ///
    /// Returns the resulting change, if any. Entering a new radius takes
    /// priority over staying inside the active one. With no active waypoint (or
    /// after leaving it) the nearest waypoint still containing the camera
    /// becomes active, so the camera is never left inside a radius with
    /// nothing active.
    pub fn poll(&mut self, camera_position: Vec3) -> Option<WaypointChange> {
        let mut entered = None;
        for (index, waypoint) in self.waypoints.iter().enumerate() {
            let now_inside = waypoint.contains(camera_position);
            if now_inside && !self.inside[index] && entered.is_none() && self.active != Some(index) {
                entered = Some(index);
            }
            self.inside[index] = now_inside;
        }

        if let Some(index) = entered {
            return self.activate(index);
        }

        if self.active.is_some_and(|index| self.inside[index]) {
            return None;
        }

        if let Some(index) = self.nearest_containing(camera_position) {
            return self.activate(index);
        }

        let index = self.active.take()?;
        tracing::debug!(label = %self.waypoints[index].label, "waypoint left");
        Some(WaypointChange::Deactivated { index })
    }

    /// Closest waypoint whose radius holds `point`
    fn nearest_containing(&self, point: Vec3) -> Option<usize> {
        self.waypoints
            .iter()
            .enumerate()
            .filter(|(index, _)| self.inside[*index])
            .min_by(|(_, a), (_, b)| point.distance(a.position).total_cmp(&point.distance(b.position)))
            .map(|(index, _)| index)
    }

    /// Make `index` the active waypoint (manual selection or proximity).
    ///
    /// Returns `None` for an unknown index or if it is already active.
    pub fn activate(&mut self, index: usize) -> Option<WaypointChange> {
        let waypoint = self.waypoints.get(index)?;
        if self.active == Some(index) {
            return None;
        }

        let previous = self.active.replace(index);
        tracing::info!(label = %waypoint.label, ?previous, "waypoint activated");
        Some(WaypointChange::Activated { index, previous })
    }

    /// Clear the active waypoint (e.g. a free ground teleport).
    pub fn clear_active(&mut self) -> Option<WaypointChange> {
        let index = self.active.take()?;
        tracing::debug!(label = %self.waypoints[index].label, "waypoint cleared");
        Some(WaypointChange::Deactivated { index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor() -> WaypointMonitor {
        WaypointMonitor::new(vec![
            Waypoint::new("A", Vec3::new(0.0, 1.6, 0.0), Vec3::new(0.0, 0.0, -5.0)),
            Waypoint::new("B", Vec3::new(10.0, 1.6, 0.0), Vec3::new(10.0, 0.0, -5.0)),
        ])
    }

    #[test]
    fn test_entering_activates() {
        let mut monitor = monitor();
        let change = monitor.poll(Vec3::new(0.5, 1.6, 0.5));
        assert_eq!(change, Some(WaypointChange::Activated { index: 0, previous: None }));
        assert_eq!(monitor.active(), Some(0));
        // Staying inside is quiet
        assert_eq!(monitor.poll(Vec3::new(0.6, 1.6, 0.5)), None);
    }

    #[test]
    fn test_outside_all_radii_is_quiet() {
        let mut monitor = monitor();
        assert_eq!(monitor.poll(Vec3::new(5.0, 1.6, 5.0)), None);
        assert_eq!(monitor.active(), None);
    }

    #[test]
    fn test_radius_is_strict() {
        let waypoint = Waypoint::new("A", Vec3::ZERO, Vec3::NEG_Z);
        assert!(waypoint.contains(Vec3::new(1.99, 0.0, 0.0)));
        assert!(!waypoint.contains(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_leaving_deactivates() {
        let mut monitor = monitor();
        monitor.poll(Vec3::new(0.0, 1.6, 0.0));
        let change = monitor.poll(Vec3::new(5.0, 1.6, 0.0));
        assert_eq!(change, Some(WaypointChange::Deactivated { index: 0 }));
        assert_eq!(monitor.active(), None);
    }

    #[test]
    fn test_manual_activation_does_not_refire_on_arrival() {
        let mut monitor = monitor();
        assert!(monitor.activate(1).is_some());
        assert_eq!(monitor.poll(Vec3::new(10.0, 1.6, 0.0)), None);
        assert_eq!(monitor.active(), Some(1));
        assert!(monitor.activate(7).is_none());
    }

    #[test]
    fn test_clear_active_inside_radius_reactivates() {
        let mut monitor = monitor();
        monitor.poll(Vec3::new(0.0, 1.6, 0.0));
        assert_eq!(monitor.clear_active(), Some(WaypointChange::Deactivated { index: 0 }));
        assert_eq!(monitor.clear_active(), None);
        assert_eq!(
            monitor.poll(Vec3::new(0.1, 1.6, 0.0)),
            Some(WaypointChange::Activated { index: 0, previous: None })
        );
        assert_eq!(monitor.poll(Vec3::new(0.2, 1.6, 0.0)), None);
    }

    #[test]
    fn test_leaving_overlap_falls_back_to_containing_waypoint() {
        let mut monitor = WaypointMonitor::new(vec![
            Waypoint::new("A", Vec3::new(0.0, 1.6, 0.0), Vec3::NEG_Z),
            Waypoint::new("B", Vec3::new(3.0, 1.6, 0.0), Vec3::NEG_Z),
        ]);
        assert_eq!(
            monitor.poll(Vec3::new(-0.5, 1.6, 0.0)),
            Some(WaypointChange::Activated { index: 0, previous: None })
        );
        // Inside both radii: entering B takes over
        assert_eq!(
            monitor.poll(Vec3::new(1.5, 1.6, 0.0)),
            Some(WaypointChange::Activated { index: 1, previous: Some(0) })
        );
        // Back inside A only
        assert_eq!(
            monitor.poll(Vec3::new(-0.5, 1.6, 0.0)),
            Some(WaypointChange::Activated { index: 0, previous: Some(1) })
        );
        assert_eq!(monitor.active(), Some(0));
        assert_eq!(monitor.poll(Vec3::new(-0.6, 1.6, 0.0)), None);
    }

    #[test]
    fn test_nearest_containing_wins_when_nothing_entered() {
        let mut monitor = WaypointMonitor::new(vec![
            Waypoint::new("A", Vec3::new(0.0, 1.6, 0.0), Vec3::NEG_Z),
            Waypoint::new("B", Vec3::new(3.0, 1.6, 0.0), Vec3::NEG_Z),
        ]);
        monitor.poll(Vec3::new(1.8, 1.6, 0.0));
        assert_eq!(monitor.active(), Some(0));
        monitor.clear_active();
        // Both still contain the camera; B is closer
        assert_eq!(
            monitor.poll(Vec3::new(1.8, 1.6, 0.0)),
            Some(WaypointChange::Activated { index: 1, previous: None })
        );
    }
}
