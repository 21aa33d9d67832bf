//! Showroom Viewer - Navigation Host
//!
//! Run with: `cargo run --bin showroom_viewer -- [--config nav.json] [--guided] [--edit]`
//!
//! Opens a window and drives the navigation core from real input. Rendering is
//! left to the embedding application; this host reports the camera in the
//! window title and logs navigation events.
//!
//! Controls:
//! - Click: Lock pointer, then click to teleport to the reticle (guided view
//!   teleports to the pointer on the locking click too)
//! - WASD / Arrows: Walk
//! - Mouse: Look (while locked)
//! - 1-4: Jump to guided waypoint
//! - F1 / F2 / F3 / F4: Free roam / Guided / Editing / Immersive
//! - T / R / S (editing): Translate / Rotate / Scale gizmo, mouse wheel to drag
//! - F5 (editing): Save scene to the save directory
//! - ESC: Release pointer lock

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use glam::Vec3;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode as WinitKey, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowAttributes, WindowId};

use showroom_engine::physics::TriMesh;
use showroom_engine::{
    CursorAction, GizmoMode, JsonFileSink, KeyCode, LockState, ModelTransform, NavCommandSender, NavEvent, NavMode,
    NavigationConfig, NavigationCore, SceneNode,
};

/// Seconds between window title refreshes
const TITLE_REFRESH: f32 = 0.25;

/// Command-line options
#[derive(Parser, Debug)]
#[command(name = "showroom_viewer")]
#[command(about = "Walk, teleport and take guided views around a showroom model")]
struct Options {
    /// Navigation config JSON (partial overrides of the defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for scene.json and thumbnail.jpg
    #[arg(long, default_value = "showroom_save")]
    save_dir: PathBuf,

    /// Restore the camera start and model placement from the save directory
    #[arg(long)]
    load: bool,

    /// Start in guided view
    #[arg(long, conflicts_with = "edit")]
    guided: bool,

    /// Start in editing mode
    #[arg(long)]
    edit: bool,
}

impl Options {
    fn mode(&self) -> NavMode {
        if self.guided {
            NavMode::Guided
        } else if self.edit {
            NavMode::Editing
        } else {
            NavMode::FreeRoam
        }
    }
}

/// Map a physical key to the engine's key code
fn map_key(key: WinitKey) -> KeyCode {
    match key {
        WinitKey::KeyW => KeyCode::W,
        WinitKey::KeyA => KeyCode::A,
        WinitKey::KeyS => KeyCode::S,
        WinitKey::KeyD => KeyCode::D,
        WinitKey::ArrowUp => KeyCode::ArrowUp,
        WinitKey::ArrowDown => KeyCode::ArrowDown,
        WinitKey::ArrowLeft => KeyCode::ArrowLeft,
        WinitKey::ArrowRight => KeyCode::ArrowRight,
        WinitKey::KeyT => KeyCode::T,
        WinitKey::KeyR => KeyCode::R,
        WinitKey::Escape => KeyCode::Escape,
        _ => KeyCode::Unknown,
    }
}

/// Placeholder showroom model: a pavilion with two walls and a pedestal.
fn demo_model() -> SceneNode {
    let wall = TriMesh::cuboid(Vec3::new(6.0, 1.5, 0.1));
    let side = TriMesh::cuboid(Vec3::new(0.1, 1.5, 4.0));
    let pedestal = TriMesh::cuboid(Vec3::new(0.6, 0.45, 0.6));

    SceneNode::group("Showroom")
        .with_child(SceneNode::with_mesh(
            "BackWall",
            wall,
            ModelTransform::from_position(Vec3::new(0.0, 1.5, -10.0)),
        ))
        .with_child(SceneNode::with_mesh(
            "SideWall",
            side,
            ModelTransform::from_position(Vec3::new(-6.0, 1.5, -6.0)),
        ))
        .with_child(SceneNode::with_mesh(
            "Pedestal",
            pedestal,
            ModelTransform::from_position(Vec3::new(0.0, 0.45, -5.0)),
        ))
}

struct ViewerApp {
    window: Option<Arc<Window>>,
    core: NavigationCore,
    commands: NavCommandSender,
    last_frame: Instant,
    title_timer: f32,
}

impl ViewerApp {
    fn new(options: &Options) -> Self {
        let config = match &options.config {
            Some(path) => NavigationConfig::from_json_file(path).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "falling back to default navigation config");
                NavigationConfig::default()
            }),
            None => NavigationConfig::default(),
        };

        let sink = JsonFileSink::new(&options.save_dir);
        let saved = if options.load {
            match sink.load() {
                Ok(saved) => Some(saved),
                Err(err) => {
                    tracing::warn!(error = %err, dir = %options.save_dir.display(), "no saved scene loaded");
                    None
                }
            }
        } else {
            None
        };

        let mut core = NavigationCore::new(config).with_sink(sink);
        if let Some(saved) = &saved {
            core.load_saved(saved);
        }
        core.set_collidable(Some(demo_model()));
        core.set_mode(options.mode());

        let commands = core.command_sender();
        Self {
            window: None,
            core,
            commands,
            last_frame: Instant::now(),
            title_timer: 0.0,
        }
    }

    fn apply_cursor(&self, action: CursorAction) {
        if action != CursorAction::ApplyState {
            return;
        }
        let Some(window) = &self.window else {
            return;
        };

        if self.core.lock_state() == LockState::Locked {
            if window.set_cursor_grab(CursorGrabMode::Locked).is_err() {
                let _ = window.set_cursor_grab(CursorGrabMode::Confined);
            }
            window.set_cursor_visible(false);
        } else {
            let _ = window.set_cursor_grab(CursorGrabMode::None);
            window.set_cursor_visible(true);
        }
    }

    fn handle_key(&mut self, key: WinitKey, pressed: bool) {
        if pressed {
            let mode = match key {
                WinitKey::F1 => Some(NavMode::FreeRoam),
                WinitKey::F2 => Some(NavMode::Guided),
                WinitKey::F3 => Some(NavMode::Editing),
                WinitKey::F4 => Some(NavMode::Immersive),
                _ => None,
            };
            if let Some(mode) = mode {
                let action = self.core.set_mode(mode);
                self.apply_cursor(action);
                return;
            }

            let waypoint = match key {
                WinitKey::Digit1 => Some(0),
                WinitKey::Digit2 => Some(1),
                WinitKey::Digit3 => Some(2),
                WinitKey::Digit4 => Some(3),
                _ => None,
            };
            if let Some(index) = waypoint {
                self.commands.select_waypoint(index);
                return;
            }

            if key == WinitKey::F5 {
                // No renderer attached, so the snapshot has no thumbnail
                self.commands.save(None);
                return;
            }
        }

        let action = self.core.handle_key(map_key(key), pressed);
        self.apply_cursor(action);
    }

    fn handle_scroll(&mut self, scroll: f32) {
        if self.core.mode() != NavMode::Editing {
            return;
        }
        let delta = match self.core.gizmo_mode() {
            GizmoMode::Translate => Vec3::Y * scroll * 0.1,
            GizmoMode::Rotate => Vec3::Y * scroll * 0.1,
            GizmoMode::Scale => Vec3::splat(scroll * 0.05),
        };
        if let Err(err) = self.core.apply_gizmo_delta(delta) {
            tracing::warn!(error = %err, "gizmo edit rejected");
        }
    }

    fn update(&mut self, delta_time: f32) {
        for event in self.core.update(delta_time) {
            match &event {
                NavEvent::SaveFailed { reason } => tracing::warn!(%reason, "save failed"),
                _ => tracing::info!(?event, "navigation"),
            }
        }

        self.title_timer += delta_time;
        if self.title_timer >= TITLE_REFRESH {
            self.title_timer = 0.0;
            self.refresh_title();
        }
    }

    fn refresh_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        let camera = self.core.camera();
        let reticle = match self.core.reticle_marker() {
            Some(p) => format!("({:.1}, {:.1})", p.x, p.z),
            None => "-".to_string(),
        };
        let waypoint = self
            .core
            .active_waypoint()
            .and_then(|i| self.core.waypoints().get(i))
            .map(|w| w.label.as_str())
            .unwrap_or("-");

        window.set_title(&format!(
            "Showroom - {:?} | Pos ({:.1}, {:.1}, {:.1}) | Yaw {:.0}° | Reticle {} | Waypoint {} | {}",
            self.core.mode(),
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.yaw.to_degrees(),
            reticle,
            waypoint,
            self.core.status_message(),
        ));
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let attrs = WindowAttributes::default()
                .with_title("Showroom")
                .with_inner_size(PhysicalSize::new(1280, 720));
            let window = Arc::new(event_loop.create_window(attrs).expect("failed to create window"));
            let size = window.inner_size();
            if size.height > 0 {
                self.core.set_aspect_ratio(size.width as f32 / size.height as f32);
            }
            self.window = Some(window);
            self.last_frame = Instant::now();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                let action = self.core.shutdown();
                self.apply_cursor(action);
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return;
                }
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.handle_key(key, event.state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                let action = self.core.handle_primary_click();
                self.apply_cursor(action);
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    if size.width > 0 && size.height > 0 {
                        let u = position.x as f32 / size.width as f32;
                        let v = 1.0 - position.y as f32 / size.height as f32;
                        self.core.handle_pointer_move((u, v));
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.handle_scroll(scroll);
            }
            WindowEvent::Focused(false) => {
                let action = self.core.handle_focus_lost();
                self.apply_cursor(action);
            }
            WindowEvent::Resized(size) => {
                if size.height > 0 {
                    self.core.set_aspect_ratio(size.width as f32 / size.height as f32);
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = now.duration_since(self.last_frame).as_secs_f32();
                self.last_frame = now;
                self.update(delta_time);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.core.handle_mouse_motion(delta.0 as f32, delta.1 as f32);
        }
    }
}

fn main() {
    tracing_subscriber::fmt().init();

    let options = Options::parse();
    tracing::info!("showroom viewer starting, click the window to look around");

    let event_loop = EventLoop::new().expect("failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = ViewerApp::new(&options);
    event_loop.run_app(&mut app).expect("event loop terminated with an error");
}
