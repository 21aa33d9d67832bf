//! Navigation Core
//!
//! Owns the camera and arbitrates between its two writers: keyboard locomotion
//! and the teleport transit animator. Hosts feed discrete input events in, call
//! [`NavigationCore::update`] once per rendered frame and read the camera,
//! reticle and emitted [`NavEvent`]s back out.
//!
//! # Frame order
//!
//! 1. Drain queued [`NavCommand`]s
//! 2. Transit step if one is in flight, otherwise locomotion
//! 3. Waypoint proximity poll (guided view, fixed interval)
//! 4. Ground reticle
//!
//! # Modes
//!
//! - **FreeRoam**: pointer lock, screen-center reticle, click to teleport
//! - **Guided**: reticle follows the pointer, click teleports without needing
//!   the lock (and acquires it), waypoints reorient the gaze
//! - **Editing**: gizmo keys edit the model placement; reticle and transit off
//! - **Immersive**: an XR session drives the camera; the core stays out of it

use std::sync::mpsc::{self, Receiver, Sender};

use glam::Vec3;

use super::locomotion::{LocomotionController, LocomotionGate, LocomotionOutcome};
use super::reticle::{ReticleResolver, ReticleState};
use super::schedule::IntervalTask;
use super::transit::{TransitAnimator, TransitRequest, TransitStep};
use super::waypoints::{Waypoint, WaypointChange, WaypointMonitor};
use crate::camera::{CameraState, RaycastConfig, center_ray};
use crate::config::NavigationConfig;
use crate::editing::ModelEditor;
use crate::error::{NavError, Result};
use crate::input::{CursorAction, GizmoMode, KeyCode, LockState, MovementKeys, PointerLockGate};
use crate::persistence::{
    DiscardSink, FrameCapture, SavedScene, SceneSnapshot, SnapshotSink, encode_thumbnail,
};
use crate::physics::CollisionProbe;
use crate::scene::{GroundPlane, ModelTransform, Scene, SceneNode};

/// Host-selected navigation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavMode {
    #[default]
    FreeRoam,
    Guided,
    Editing,
    Immersive,
}

/// Who writes the camera position this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraAuthority {
    Locomotion,
    Transit,
}

/// Requests the host UI (or another thread) can queue for the next frame.
#[derive(Debug, Clone, PartialEq)]
pub enum NavCommand {
    /// Save the scene; the frame capture becomes the thumbnail
    Save { capture: Option<FrameCapture> },
    /// Transit to a ground point
    Teleport { target: Vec3 },
    /// Transit to a configured waypoint
    SelectWaypoint(usize),
}

/// Cloneable handle for queuing [`NavCommand`]s.
#[derive(Debug, Clone)]
pub struct NavCommandSender {
    tx: Sender<NavCommand>,
}

impl NavCommandSender {
    /// Queue a command. Returns false if the core has been dropped.
    pub fn send(&self, command: NavCommand) -> bool {
        self.tx.send(command).is_ok()
    }

    pub fn save(&self, capture: Option<FrameCapture>) -> bool {
        self.send(NavCommand::Save { capture })
    }

    pub fn teleport(&self, target: Vec3) -> bool {
        self.send(NavCommand::Teleport { target })
    }

    pub fn select_waypoint(&self, index: usize) -> bool {
        self.send(NavCommand::SelectWaypoint(index))
    }
}

/// Things that happened since the last [`NavigationCore::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum NavEvent {
    TransitStarted {
        target: Vec3,
        forced_look_at: Option<Vec3>,
    },
    /// An in-flight transit was replaced by a newer request
    TransitPreempted { abandoned_target: Vec3 },
    TransitCompleted { position: Vec3 },
    /// In-flight transit dropped on entering editing mode
    TransitCancelled,
    WaypointActivated {
        index: usize,
        previous: Option<usize>,
    },
    WaypointDeactivated { index: usize },
    SnapshotSaved,
    SaveFailed { reason: String },
}

/// The navigation core.
pub struct NavigationCore {
    config: NavigationConfig,
    camera: CameraState,
    raycast: RaycastConfig,
    gate: PointerLockGate,
    keys: MovementKeys,
    scene: Scene,
    locomotion: LocomotionController,
    reticle: ReticleResolver,
    transit: TransitAnimator,
    waypoints: WaypointMonitor,
    waypoint_task: IntervalTask,
    mode: NavMode,
    editor: ModelEditor,
    /// Last pointer position in normalized screen coordinates (guided view)
    pointer_uv: Option<(f32, f32)>,
    /// Model placement from a saved scene, applied once the model arrives
    pending_model_transform: Option<ModelTransform>,
    commands: Receiver<NavCommand>,
    command_tx: Sender<NavCommand>,
    sink: Box<dyn SnapshotSink>,
    events: Vec<NavEvent>,
    shut_down: bool,
}

impl Default for NavigationCore {
    fn default() -> Self {
        Self::new(NavigationConfig::default())
    }
}

impl NavigationCore {
    /// Core with the configured ground plane and no model loaded.
    pub fn new(config: NavigationConfig) -> Self {
        let scene = Scene::with_ground(GroundPlane::new(
            config.ground_name.clone(),
            0.0,
            config.ground_half_extent,
        ));
        Self::with_scene(config, scene)
    }

    /// Core navigating an existing scene.
    pub fn with_scene(config: NavigationConfig, scene: Scene) -> Self {
        let mut camera = CameraState::with_position(config.camera_start);
        camera.sensitivity = config.mouse_sensitivity;
        camera.set_pitch_limit(config.pitch_limit());

        let (command_tx, commands) = mpsc::channel();

        Self {
            raycast: RaycastConfig {
                aspect_ratio: config.aspect_ratio,
                fov: config.fov(),
            },
            gate: PointerLockGate::new(),
            keys: MovementKeys::new(),
            scene,
            locomotion: LocomotionController::new(
                config.walk_speed,
                CollisionProbe::new(config.collision_clearance, config.probe_drop),
            ),
            reticle: ReticleResolver::new(config.ground_name.clone(), config.reticle_lift),
            transit: TransitAnimator::new(
                config.transit_speed,
                config.transit_epsilon,
                config.look_blend_min_duration,
            ),
            waypoints: WaypointMonitor::new(config.waypoints.clone()),
            waypoint_task: IntervalTask::new(config.waypoint_poll_interval),
            mode: NavMode::default(),
            editor: ModelEditor::new(),
            pointer_uv: None,
            pending_model_transform: None,
            commands,
            command_tx,
            sink: Box::new(DiscardSink),
            events: Vec::new(),
            shut_down: false,
            camera,
            config,
        }
    }

    /// Replace the storage collaborator that receives saved snapshots
    pub fn with_sink(mut self, sink: impl SnapshotSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn mode(&self) -> NavMode {
        self.mode
    }

    pub fn lock_state(&self) -> LockState {
        self.gate.state()
    }

    /// Status line for the host UI
    pub fn status_message(&self) -> &'static str {
        match self.mode {
            NavMode::FreeRoam => self.gate.status_message(),
            NavMode::Guided => "Click the ground to move, walk into a waypoint for a guided view.",
            NavMode::Editing => "T translate, R rotate, S scale.",
            NavMode::Immersive => "Immersive session active.",
        }
    }

    pub fn movement_keys(&self) -> &MovementKeys {
        &self.keys
    }

    pub fn reticle(&self) -> ReticleState {
        self.reticle.state()
    }

    /// Where the host should draw the reticle marker
    pub fn reticle_marker(&self) -> Option<Vec3> {
        self.reticle.marker_position()
    }

    pub fn gizmo_mode(&self) -> GizmoMode {
        self.editor.mode()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        self.waypoints.waypoints()
    }

    pub fn active_waypoint(&self) -> Option<usize> {
        self.waypoints.active()
    }

    pub fn is_transiting(&self) -> bool {
        self.transit.is_transiting()
    }

    pub fn authority(&self) -> CameraAuthority {
        if self.transit.is_transiting() {
            CameraAuthority::Transit
        } else {
            CameraAuthority::Locomotion
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Handle for queuing commands from UI code or other threads
    pub fn command_sender(&self) -> NavCommandSender {
        NavCommandSender {
            tx: self.command_tx.clone(),
        }
    }

    /// Update the viewport aspect ratio (window resize)
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            self.raycast.aspect_ratio = aspect_ratio;
        }
    }

    // ------------------------------------------------------------------
    // Host input
    // ------------------------------------------------------------------

    /// Key press or release. Escape releases the pointer lock.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> CursorAction {
        if self.shut_down {
            return CursorAction::None;
        }

        if key == KeyCode::Escape {
            return if pressed {
                self.gate.handle_escape()
            } else {
                CursorAction::None
            };
        }

        match self.mode {
            NavMode::Editing => {
                if pressed {
                    self.editor.handle_key(key);
                }
            }
            _ => {
                self.keys.handle_key(key, pressed);
            }
        }
        CursorAction::None
    }

    /// Raw mouse motion (pixels). Rotates the view while locked.
    pub fn handle_mouse_motion(&mut self, dx: f32, dy: f32) {
        if self.shut_down || self.mode == NavMode::Immersive || !self.gate.is_locked() {
            return;
        }
        let forced_look = self
            .transit
            .active()
            .is_some_and(|t| t.forced_look_at.is_some());
        if forced_look {
            return;
        }
        self.camera.apply_mouse_delta(dx, dy);
    }

    /// Pointer moved to normalized screen coordinates, (0,0) bottom-left
    pub fn handle_pointer_move(&mut self, uv: (f32, f32)) {
        self.pointer_uv = Some(uv);
    }

    /// Primary button click on the viewport.
    ///
    /// Free roam: acquires the lock when unlocked (that click never teleports),
    /// otherwise consumes the current reticle point. Guided view: teleports to
    /// the ground under the last pointer position and also acquires the lock,
    /// so walking and mouse look work there too.
    pub fn handle_primary_click(&mut self) -> CursorAction {
        if self.shut_down {
            return CursorAction::None;
        }

        match self.mode {
            NavMode::FreeRoam => {
                if !self.gate.is_locked() {
                    return self.gate.handle_left_click();
                }
                match self.reticle.state().point() {
                    Some(point) => self.teleport_to_ground(point),
                    None => tracing::trace!("click ignored, reticle hidden"),
                }
                CursorAction::None
            }
            NavMode::Guided => {
                if let Some(uv) = self.pointer_uv {
                    self.handle_pointer_click(uv);
                }
                self.gate.handle_left_click()
            }
            NavMode::Editing | NavMode::Immersive => CursorAction::None,
        }
    }

    /// Guided-view click at a pointer position. Returns true if a transit started.
    pub fn handle_pointer_click(&mut self, uv: (f32, f32)) -> bool {
        if self.shut_down || self.mode != NavMode::Guided {
            return false;
        }
        self.pointer_uv = Some(uv);
        let ray = self.raycast.screen_ray(&self.camera, uv);
        match self.reticle.resolve(&ray, &self.scene).point() {
            Some(point) => {
                self.teleport_to_ground(point);
                true
            }
            None => false,
        }
    }

    /// Host-driven lock release (Escape handled by the host itself)
    pub fn handle_escape(&mut self) -> CursorAction {
        self.gate.handle_escape()
    }

    /// Window lost focus: the lock goes with it and held keys are forgotten
    pub fn handle_focus_lost(&mut self) -> CursorAction {
        self.keys.reset();
        self.gate.handle_focus_lost()
    }

    /// Switch navigation mode.
    ///
    /// Entering editing drops any in-flight transit and releases the lock.
    /// Entering immersive mode freezes a transit until the session ends.
    pub fn set_mode(&mut self, mode: NavMode) -> CursorAction {
        if self.shut_down || mode == self.mode {
            return CursorAction::None;
        }
        tracing::info!(from = ?self.mode, to = ?mode, "navigation mode changed");
        self.mode = mode;
        self.keys.reset();
        self.reticle.clear();

        match mode {
            NavMode::Editing => {
                if self.transit.is_transiting() {
                    self.transit.clear();
                    self.events.push(NavEvent::TransitCancelled);
                }
                self.gate.unlock()
            }
            NavMode::Immersive => self.gate.unlock(),
            NavMode::FreeRoam | NavMode::Guided => CursorAction::None,
        }
    }

    // ------------------------------------------------------------------
    // Scene and model
    // ------------------------------------------------------------------

    /// Install (or remove) the collidable model from the model loader.
    ///
    /// A placement restored from a saved scene is applied on arrival.
    pub fn set_collidable(&mut self, node: Option<SceneNode>) {
        let node = node.map(|mut n| {
            if let Some(transform) = self.pending_model_transform.take() {
                n.transform = transform;
            }
            n
        });
        self.scene.set_collidable(node);
    }

    /// Initialise the camera start pose and model placement from saved data
    pub fn load_saved(&mut self, saved: &SavedScene) {
        saved.apply_camera(&mut self.camera);
        match self.scene.collidable_mut() {
            Some(model) => model.transform = saved.model_transform,
            None => self.pending_model_transform = Some(saved.model_transform),
        }
        tracing::info!(position = ?saved.camera_start.position, "saved scene loaded");
    }

    /// Apply a gizmo drag to the model in the current gizmo mode
    pub fn apply_gizmo_delta(&mut self, delta: Vec3) -> Result<()> {
        if self.mode != NavMode::Editing {
            return Err(NavError::NotEditing);
        }
        let model = self.scene.collidable_mut().ok_or(NavError::NoModelLoaded)?;
        self.editor.apply(&mut model.transform, delta);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------

    /// Transit to a ground point. Ignored in editing and immersive modes.
    pub fn request_teleport(&mut self, target: Vec3) -> bool {
        if !self.transit_allowed() {
            tracing::debug!(mode = ?self.mode, "teleport ignored in this mode");
            return false;
        }
        self.teleport_to_ground(target);
        true
    }

    /// Transit to a waypoint and make it active. Returns false for an unknown index.
    pub fn select_waypoint(&mut self, index: usize) -> bool {
        if !self.transit_allowed() {
            return false;
        }
        let Some(waypoint) = self.waypoints.get(index) else {
            tracing::warn!(index, "unknown waypoint");
            return false;
        };
        let request = TransitRequest::with_look_at(waypoint.position, waypoint.look_at);
        if let Some(change) = self.waypoints.activate(index) {
            self.push_waypoint_change(change);
        }
        self.start_transit(request);
        true
    }

    /// Save the scene with an optional thumbnail source frame.
    pub fn save(&mut self, capture: Option<FrameCapture>) -> Result<()> {
        if self.mode != NavMode::Editing {
            return Err(NavError::NotEditing);
        }
        let model = self.scene.collidable().ok_or(NavError::NoModelLoaded)?;
        let saved = SavedScene::capture(&self.camera, &model.transform);

        let thumbnail_jpeg = capture
            .map(|c| encode_thumbnail(c, self.config.thumbnail_quality))
            .transpose()?;

        self.sink.store(SceneSnapshot {
            saved,
            thumbnail_jpeg,
        })?;
        tracing::info!("scene snapshot saved");
        self.events.push(NavEvent::SnapshotSaved);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------

    /// Advance one rendered frame and return what happened since the last one.
    pub fn update(&mut self, delta_time: f32) -> Vec<NavEvent> {
        if self.shut_down {
            return Vec::new();
        }

        self.drain_commands();

        if self.mode == NavMode::Immersive {
            self.reticle.clear();
            return std::mem::take(&mut self.events);
        }

        match self.transit.update(&mut self.camera, delta_time) {
            TransitStep::Idle => {
                let gate = self.locomotion_gate();
                let outcome = self.locomotion.update(
                    &self.keys,
                    gate,
                    &mut self.camera,
                    self.scene.collidable(),
                    delta_time,
                );
                if let LocomotionOutcome::Blocked { direction } = outcome {
                    tracing::trace!(?direction, "locomotion blocked");
                }
            }
            TransitStep::InFlight { .. } => {}
            TransitStep::Completed { position } => {
                self.events.push(NavEvent::TransitCompleted { position });
            }
        }

        if self.mode == NavMode::Guided && self.waypoint_task.tick(delta_time) {
            self.poll_waypoints();
        }

        self.update_reticle();

        std::mem::take(&mut self.events)
    }

    /// Tear down: release the lock, stop the waypoint task, drop any transit.
    ///
    /// Returns the cursor action the host must apply. The core is inert afterwards.
    pub fn shutdown(&mut self) -> CursorAction {
        if self.shut_down {
            return CursorAction::None;
        }
        self.shut_down = true;
        self.waypoint_task.cancel();
        self.transit.clear();
        self.keys.reset();
        self.reticle.clear();
        self.events.clear();
        tracing::info!("navigation core shut down");
        self.gate.unlock()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn transit_allowed(&self) -> bool {
        !self.shut_down && matches!(self.mode, NavMode::FreeRoam | NavMode::Guided)
    }

    fn locomotion_gate(&self) -> LocomotionGate {
        match self.mode {
            NavMode::Immersive => LocomotionGate::Immersive,
            NavMode::Editing => LocomotionGate::Unlocked,
            NavMode::FreeRoam | NavMode::Guided if self.gate.is_locked() => LocomotionGate::Live,
            NavMode::FreeRoam | NavMode::Guided => LocomotionGate::Unlocked,
        }
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            match command {
                NavCommand::Save { capture } => {
                    if let Err(err) = self.save(capture) {
                        tracing::warn!(error = %err, "save failed");
                        self.events.push(NavEvent::SaveFailed {
                            reason: err.to_string(),
                        });
                    }
                }
                NavCommand::Teleport { target } => {
                    self.request_teleport(target);
                }
                NavCommand::SelectWaypoint(index) => {
                    self.select_waypoint(index);
                }
            }
        }
    }

    /// Free ground teleport: clears the active waypoint, no forced look
    fn teleport_to_ground(&mut self, point: Vec3) {
        if let Some(change) = self.waypoints.clear_active() {
            self.push_waypoint_change(change);
        }
        self.start_transit(TransitRequest::to(point));
    }

    fn start_transit(&mut self, request: TransitRequest) {
        if let Some(previous) = self.transit.begin(request, &self.camera) {
            self.events.push(NavEvent::TransitPreempted {
                abandoned_target: previous.target,
            });
        }
        if let Some(transit) = self.transit.active() {
            self.events.push(NavEvent::TransitStarted {
                target: transit.target,
                forced_look_at: transit.forced_look_at,
            });
        }
    }

    fn poll_waypoints(&mut self) {
        let Some(change) = self.waypoints.poll(self.camera.position) else {
            return;
        };
        let look_at = match change {
            WaypointChange::Activated { index, .. } => self.waypoints.get(index).map(|w| w.look_at),
            WaypointChange::Deactivated { .. } => None,
        };
        self.push_waypoint_change(change);

        // Proximity only turns the gaze: stay put, or keep the in-flight destination
        if let Some(look_at) = look_at {
            let target = self
                .transit
                .active()
                .map_or(self.camera.position, |transit| transit.target);
            self.start_transit(TransitRequest::with_look_at(target, look_at));
        }
    }

    fn push_waypoint_change(&mut self, change: WaypointChange) {
        let event = match change {
            WaypointChange::Activated { index, previous } => NavEvent::WaypointActivated { index, previous },
            WaypointChange::Deactivated { index } => NavEvent::WaypointDeactivated { index },
        };
        self.events.push(event);
    }

    fn update_reticle(&mut self) {
        match self.mode {
            NavMode::FreeRoam if self.gate.is_locked() => {
                let ray = center_ray(&self.camera);
                self.reticle.resolve(&ray, &self.scene);
            }
            NavMode::Guided => match self.pointer_uv {
                Some(uv) => {
                    let ray = self.raycast.screen_ray(&self.camera, uv);
                    self.reticle.resolve(&ray, &self.scene);
                }
                None => self.reticle.clear(),
            },
            _ => self.reticle.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemorySink;
    use crate::physics::TriMesh;

    fn locked_core() -> NavigationCore {
        let mut core = NavigationCore::default();
        core.handle_primary_click();
        core
    }

    fn model() -> SceneNode {
        SceneNode::with_mesh(
            "Model",
            TriMesh::cuboid(Vec3::splat(0.5)),
            ModelTransform::from_position(Vec3::new(0.0, 0.5, -20.0)),
        )
    }

    #[test]
    fn test_first_click_locks_without_teleport() {
        let mut core = NavigationCore::default();
        core.camera.set_pitch(-0.5);
        core.update(0.016);
        assert_eq!(core.handle_primary_click(), CursorAction::ApplyState);
        assert_eq!(core.lock_state(), LockState::Locked);
        assert!(!core.is_transiting());
    }

    #[test]
    fn test_locked_click_consumes_reticle() {
        let mut core = locked_core();
        core.camera.set_pitch(-0.5);
        core.update(0.016);
        let point = core.reticle().point().unwrap();

        core.handle_primary_click();
        let events = core.update(0.0);
        assert!(events.iter().any(|e| matches!(e, NavEvent::TransitStarted { .. })));
        assert_eq!(core.authority(), CameraAuthority::Transit);

        for _ in 0..200 {
            core.update(0.05);
        }
        assert!((core.camera().position.x - point.x).abs() < 1e-5);
        assert!((core.camera().position.z - point.z).abs() < 1e-5);
        assert!((core.camera().position.y - 1.6).abs() < 1e-6);
    }

    #[test]
    fn test_reticle_hidden_while_unlocked() {
        let mut core = NavigationCore::default();
        core.camera.set_pitch(-0.5);
        core.update(0.016);
        assert!(!core.reticle().is_visible());
    }

    #[test]
    fn test_escape_unlocks_but_transit_continues() {
        let mut core = locked_core();
        core.request_teleport(Vec3::new(8.0, 0.0, 0.0));
        core.update(0.5);
        assert_eq!(core.handle_key(KeyCode::Escape, true), CursorAction::ApplyState);
        core.update(0.25);
        assert!((core.camera().position.x - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_mouse_look_requires_lock() {
        let mut core = NavigationCore::default();
        core.handle_mouse_motion(100.0, 0.0);
        assert_eq!(core.camera().yaw, 0.0);

        core.handle_primary_click();
        core.handle_mouse_motion(100.0, 0.0);
        assert!((core.camera().yaw - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_guided_click_teleports_and_locks() {
        let mut core = NavigationCore::default();
        core.set_mode(NavMode::Guided);
        core.handle_pointer_move((0.5, 0.0));
        assert_eq!(core.handle_primary_click(), CursorAction::ApplyState);
        assert_eq!(core.lock_state(), LockState::Locked);
        assert!(core.is_transiting());

        // Second click with the lock held only teleports
        assert_eq!(core.handle_primary_click(), CursorAction::None);
    }

    #[test]
    fn test_waypoint_proximity_keeps_position() {
        let config = NavigationConfig {
            waypoints: vec![Waypoint::new("Near", Vec3::new(0.0, 1.6, -1.0), Vec3::new(5.0, 1.6, 0.0))],
            ..Default::default()
        };
        let mut core = NavigationCore::new(config);
        core.set_mode(NavMode::Guided);
        core.update(0.1);
        let transit = *core.transit.active().unwrap();
        assert_eq!(transit.target, Vec3::new(0.0, 1.6, 0.0));
        assert_eq!(transit.forced_look_at, Some(Vec3::new(5.0, 1.6, 0.0)));
        assert!((transit.duration - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_editing_routes_keys_to_gizmo() {
        let mut core = locked_core();
        assert_eq!(core.set_mode(NavMode::Editing), CursorAction::ApplyState);
        core.handle_key(KeyCode::S, true);
        assert_eq!(core.gizmo_mode(), GizmoMode::Scale);
        assert!(!core.movement_keys().backward);
        assert!(!core.request_teleport(Vec3::new(1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_entering_editing_cancels_transit() {
        let mut core = NavigationCore::default();
        core.request_teleport(Vec3::new(10.0, 0.0, 0.0));
        core.set_mode(NavMode::Editing);
        let events = core.update(0.1);
        assert!(events.contains(&NavEvent::TransitCancelled));
        assert!(!core.is_transiting());
    }

    #[test]
    fn test_gizmo_requires_model() {
        let mut core = NavigationCore::default();
        assert!(matches!(core.apply_gizmo_delta(Vec3::X), Err(NavError::NotEditing)));
        core.set_mode(NavMode::Editing);
        assert!(matches!(core.apply_gizmo_delta(Vec3::X), Err(NavError::NoModelLoaded)));

        core.set_collidable(Some(model()));
        core.apply_gizmo_delta(Vec3::X).unwrap();
        let position = core.scene().collidable().unwrap().transform.position;
        assert_eq!(position, Vec3::new(1.0, 0.5, -20.0));
    }

    #[test]
    fn test_save_outside_editing_fails() {
        let mut core = NavigationCore::default();
        core.set_collidable(Some(model()));
        assert!(matches!(core.save(None), Err(NavError::NotEditing)));
    }

    #[test]
    fn test_save_command_reaches_sink() {
        let sink = MemorySink::new();
        let mut core = NavigationCore::default().with_sink(sink.clone());
        core.set_collidable(Some(model()));
        core.set_mode(NavMode::Editing);

        let capture = FrameCapture::new(2, 2, vec![255; 16]);
        assert!(core.command_sender().save(Some(capture)));
        let events = core.update(0.016);
        assert!(events.contains(&NavEvent::SnapshotSaved));

        let stored = sink.snapshots();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].saved.model_transform.position, Vec3::new(0.0, 0.5, -20.0));
        assert_eq!(stored[0].saved.camera_start.position, Vec3::new(0.0, 1.6, 0.0));
        assert!(stored[0].thumbnail_jpeg.is_some());
    }

    #[test]
    fn test_save_command_without_model_reports_failure() {
        let mut core = NavigationCore::default();
        core.set_mode(NavMode::Editing);
        core.command_sender().save(None);
        let events = core.update(0.016);
        assert!(matches!(events.as_slice(), [NavEvent::SaveFailed { .. }]));
    }

    #[test]
    fn test_load_saved_before_model_arrives() {
        let mut core = NavigationCore::default();
        let mut saved = SavedScene::default();
        saved.model_transform.position = Vec3::new(3.0, 0.0, 3.0);
        saved.camera_start.position = Vec3::new(1.0, 1.6, 2.0);
        core.load_saved(&saved);
        assert_eq!(core.camera().position, Vec3::new(1.0, 1.6, 2.0));

        core.set_collidable(Some(model()));
        let position = core.scene().collidable().unwrap().transform.position;
        assert_eq!(position, Vec3::new(3.0, 0.0, 3.0));
    }

    #[test]
    fn test_immersive_freezes_transit() {
        let mut core = NavigationCore::default();
        core.request_teleport(Vec3::new(8.0, 0.0, 0.0));
        core.set_mode(NavMode::Immersive);
        core.update(1.0);
        assert_eq!(core.camera().position, Vec3::new(0.0, 1.6, 0.0));
        assert!(core.is_transiting());

        core.set_mode(NavMode::FreeRoam);
        core.update(0.5);
        assert!((core.camera().position.x - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_shutdown_is_terminal() {
        let mut core = locked_core();
        core.request_teleport(Vec3::new(8.0, 0.0, 0.0));
        assert_eq!(core.shutdown(), CursorAction::ApplyState);
        assert_eq!(core.lock_state(), LockState::Unlocked);
        assert!(!core.is_transiting());
        assert!(core.is_shut_down());

        core.handle_key(KeyCode::W, true);
        assert!(core.update(1.0).is_empty());
        assert_eq!(core.camera().position, Vec3::new(0.0, 1.6, 0.0));
        assert_eq!(core.shutdown(), CursorAction::None);
    }
}
