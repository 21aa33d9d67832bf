//! Persistence Module
//!
//! The save contract with the storage collaborator: the model placement, the
//! camera start pose and a JPEG thumbnail of the current frame.
//!
//! # Format
//!
//! ```json
//! {
//!   "modelTransform": { "position": [0,0,0], "rotation": [0,0,0], "scale": [1,1,1] },
//!   "cameraStart": { "position": [0,1.6,0], "rotation": [0,0,0] }
//! }
//! ```
//!
//! Rotations are XYZ Euler angles in radians.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use glam::Vec3;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::camera::CameraState;
use crate::error::{NavError, Result};
use crate::scene::ModelTransform;

/// File name of the scene JSON written by [`JsonFileSink`].
pub const SCENE_FILE: &str = "scene.json";

/// File name of the thumbnail written by [`JsonFileSink`].
pub const THUMBNAIL_FILE: &str = "thumbnail.jpg";

/// Camera pose the viewer starts from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraStart {
    pub position: Vec3,
    /// XYZ Euler angles (radians)
    pub rotation: Vec3,
}

impl Default for CameraStart {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.6, 0.0),
            rotation: Vec3::ZERO,
        }
    }
}

/// Persisted scene layout, exchanged with the storage collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedScene {
    pub model_transform: ModelTransform,
    pub camera_start: CameraStart,
}

impl SavedScene {
    /// Capture the current camera pose and model placement
    pub fn capture(camera: &CameraState, model: &ModelTransform) -> Self {
        Self {
            model_transform: *model,
            camera_start: CameraStart {
                position: camera.position,
                rotation: camera.euler_xyz(),
            },
        }
    }

    /// Apply the camera start pose to a camera
    pub fn apply_camera(&self, camera: &mut CameraState) {
        camera.position = self.camera_start.position;
        camera.set_euler_xyz(self.camera_start.rotation);
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Raw RGBA8 frame handed over by the rendering host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameCapture {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, `width * height * 4` bytes
    pub rgba: Vec<u8>,
}

impl FrameCapture {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self { width, height, rgba }
    }

    /// Byte length a valid capture of these dimensions has
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    fn into_image(self) -> Result<RgbaImage> {
        let expected = self.expected_len();
        let actual = self.rgba.len();
        let (width, height) = (self.width, self.height);
        RgbaImage::from_raw(width, height, self.rgba).ok_or(NavError::InvalidCapture {
            width,
            height,
            expected,
            actual,
        })
    }
}

/// Encode a frame capture as JPEG. Alpha is dropped.
///
/// # Arguments
/// * `capture` - The host's RGBA frame
/// * `quality` - JPEG quality, 1-100
pub fn encode_thumbnail(capture: FrameCapture, quality: u8) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgba8(capture.into_image()?).to_rgb8();

    let mut bytes = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(Cursor::new(&mut bytes), quality.clamp(1, 100));
        encoder.encode_image(&rgb)?;
    }
    Ok(bytes)
}

/// A saved scene plus its thumbnail, as emitted on save.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneSnapshot {
    pub saved: SavedScene,
    /// JPEG bytes; absent when the host supplied no frame
    pub thumbnail_jpeg: Option<Vec<u8>>,
}

/// Storage collaborator receiving snapshots.
pub trait SnapshotSink {
    fn store(&mut self, snapshot: SceneSnapshot) -> Result<()>;
}

/// Sink that drops every snapshot (no storage configured).
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl SnapshotSink for DiscardSink {
    fn store(&mut self, _snapshot: SceneSnapshot) -> Result<()> {
        tracing::debug!("snapshot discarded, no storage configured");
        Ok(())
    }
}

/// Sink that keeps snapshots in memory; clones share the same storage.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    snapshots: Arc<Mutex<Vec<SceneSnapshot>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything stored so far
    pub fn snapshots(&self) -> Vec<SceneSnapshot> {
        self.snapshots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl SnapshotSink for MemorySink {
    fn store(&mut self, snapshot: SceneSnapshot) -> Result<()> {
        self.snapshots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(snapshot);
        Ok(())
    }
}

/// Sink writing `scene.json` and `thumbnail.jpg` into a directory.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read back a previously stored scene
    pub fn load(&self) -> Result<SavedScene> {
        let json = std::fs::read_to_string(self.dir.join(SCENE_FILE))?;
        SavedScene::from_json_str(&json)
    }
}

impl SnapshotSink for JsonFileSink {
    fn store(&mut self, snapshot: SceneSnapshot) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let scene_path = self.dir.join(SCENE_FILE);
        std::fs::write(&scene_path, snapshot.saved.to_json_pretty()?)?;

        if let Some(jpeg) = &snapshot.thumbnail_jpeg {
            std::fs::write(self.dir.join(THUMBNAIL_FILE), jpeg)?;
        }
        tracing::info!(path = %scene_path.display(), "scene saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_capture(width: u32, height: u32) -> FrameCapture {
        let rgba = [200u8, 120, 40, 255].repeat((width * height) as usize);
        FrameCapture::new(width, height, rgba)
    }

    #[test]
    fn test_saved_scene_uses_camel_case_keys() {
        let scene = SavedScene::default();
        let json = serde_json::to_string(&scene).unwrap();
        assert!(json.contains("\"modelTransform\""));
        assert!(json.contains("\"cameraStart\""));
        assert!(json.contains("\"position\":[0.0,1.6,0.0]"));
    }

    #[test]
    fn test_parses_stored_layout() {
        let json = r#"{
            "modelTransform": { "position": [1, 0, 2], "rotation": [0, 1.5, 0], "scale": [2, 2, 2] },
            "cameraStart": { "position": [3, 1.6, 4], "rotation": [0, 0, 0] }
        }"#;
        let scene = SavedScene::from_json_str(json).unwrap();
        assert_eq!(scene.model_transform.position, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(scene.model_transform.scale, Vec3::splat(2.0));
        assert_eq!(scene.camera_start.position, Vec3::new(3.0, 1.6, 4.0));
    }

    #[test]
    fn test_capture_and_apply_camera() {
        let mut camera = CameraState::with_position(Vec3::new(2.0, 1.6, -3.0));
        camera.yaw = 0.8;
        camera.set_pitch(-0.2);
        let scene = SavedScene::capture(&camera, &ModelTransform::default());

        let mut restored = CameraState::new();
        scene.apply_camera(&mut restored);
        assert_eq!(restored.position, camera.position);
        assert!((restored.get_forward() - camera.get_forward()).length() < 1e-4);
    }

    #[test]
    fn test_encode_thumbnail_produces_jpeg() {
        let jpeg = encode_thumbnail(solid_capture(8, 4), 50).unwrap();
        // SOI marker
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_rejects_short_buffer() {
        let capture = FrameCapture::new(4, 4, vec![0; 10]);
        let err = encode_thumbnail(capture, 50).unwrap_err();
        assert!(matches!(err, NavError::InvalidCapture { expected: 64, actual: 10, .. }));
    }

    #[test]
    fn test_memory_sink_clones_share_storage() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();
        writer
            .store(SceneSnapshot {
                saved: SavedScene::default(),
                thumbnail_jpeg: None,
            })
            .unwrap();
        assert_eq!(sink.snapshots().len(), 1);
    }

    #[test]
    fn test_json_file_sink_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonFileSink::new(dir.path().join("showroom"));
        let saved = SavedScene {
            model_transform: ModelTransform::from_position(Vec3::new(1.0, 0.0, -1.0)),
            camera_start: CameraStart::default(),
        };
        sink.store(SceneSnapshot {
            saved,
            thumbnail_jpeg: Some(encode_thumbnail(solid_capture(2, 2), 50).unwrap()),
        })
        .unwrap();

        assert_eq!(sink.load().unwrap(), saved);
        assert!(sink.dir().join(THUMBNAIL_FILE).exists());
    }
}
