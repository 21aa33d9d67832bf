//! Showroom Engine Library
//!
//! First-person navigation core for a 3D architectural showroom: keyboard
//! walking with collision, pointer-lock mouse look, ground-targeted teleports
//! with a reticle, guided waypoints and scene save/restore.
//! Window-system and renderer agnostic; hosts feed input events in and read the
//! camera back out.
//!
//! # Modules
//!
//! - [`input`] - Movement keys, gizmo keys and the pointer-lock gate
//! - [`camera`] - Camera pose, mouse look and screen rays
//! - [`physics`] - Ray queries and the collision probe
//! - [`scene`] - Ground plane and the collidable model
//! - [`navigation`] - Locomotion, reticle, transits, waypoints and the core
//! - [`editing`] - Model placement gizmo
//! - [`persistence`] - Saved scene format and snapshot sinks
//! - [`config`] - Tunables
//!
//! # Example
//!
//! ```ignore
//! use showroom_engine::{KeyCode, NavigationConfig, NavigationCore};
//!
//! let mut core = NavigationCore::new(NavigationConfig::default());
//!
//! // Canvas click acquires pointer lock
//! core.handle_primary_click();
//! core.handle_key(KeyCode::W, true);
//!
//! // Once per rendered frame
//! for event in core.update(1.0 / 60.0) {
//!     println!("{event:?}");
//! }
//! let eye = core.camera().position;
//! ```

pub mod camera;
pub mod config;
pub mod editing;
pub mod error;
pub mod input;
pub mod navigation;
pub mod persistence;
pub mod physics;
pub mod scene;

pub use camera::CameraState;
pub use config::NavigationConfig;
pub use error::{NavError, Result};
pub use input::{CursorAction, GizmoMode, KeyCode, LockState};
pub use navigation::{NavCommand, NavCommandSender, NavEvent, NavMode, NavigationCore};
pub use persistence::{FrameCapture, JsonFileSink, SavedScene, SceneSnapshot, SnapshotSink};
pub use scene::{GroundPlane, ModelTransform, Scene, SceneNode};
