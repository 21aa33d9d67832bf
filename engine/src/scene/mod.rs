//! Scene Module
//!
//! The slice of the scene graph the navigation core consumes: a named,
//! ray-intersectable ground plane and the optional collidable model supplied by
//! the model loader. The core only reads these; the loader owns the geometry.

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::physics::{Ray, RayHit, TriMesh};

/// Position / XYZ-Euler rotation (radians) / scale of a scene node.
///
/// Serializes as three-element arrays, the persisted model transform format.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelTransform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl ModelTransform {
    /// Identity transform moved to `position`
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Local-to-parent matrix (scale, then rotation, then translation)
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

/// A node of the loaded model hierarchy: optional geometry plus children.
#[derive(Clone, Debug, Default)]
pub struct SceneNode {
    pub name: String,
    pub transform: ModelTransform,
    pub mesh: Option<TriMesh>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Empty group node
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Leaf node with geometry
    pub fn with_mesh(name: impl Into<String>, mesh: TriMesh, transform: ModelTransform) -> Self {
        Self {
            name: name.into(),
            transform,
            mesh: Some(mesh),
            children: Vec::new(),
        }
    }

    /// Append a child (builder style)
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Nearest hit of a world-space ray against this node.
    ///
    /// With `recursive`, descendant geometry is tested too (deep intersection).
    pub fn intersect_ray(&self, ray: &Ray, recursive: bool) -> Option<RayHit> {
        self.intersect_with_parent(ray, &Mat4::IDENTITY, recursive)
    }

    fn intersect_with_parent(&self, ray: &Ray, parent: &Mat4, recursive: bool) -> Option<RayHit> {
        let world = *parent * self.transform.matrix();
        let mut nearest = self.mesh.as_ref().and_then(|mesh| mesh.intersect_ray(ray, &world));

        if recursive {
            for child in &self.children {
                nearest = RayHit::nearest(nearest, child.intersect_with_parent(ray, &world, true));
            }
        }
        nearest
    }

    /// Depth-first lookup of a descendant (or self) by name
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }
}

/// Finite horizontal ground plane, square, centered on the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundPlane {
    pub name: String,
    /// Y coordinate of the surface
    pub height: f32,
    /// Half side length of the square
    pub half_extent: f32,
}

impl GroundPlane {
    pub fn new(name: impl Into<String>, height: f32, half_extent: f32) -> Self {
        Self {
            name: name.into(),
            height,
            half_extent,
        }
    }

    /// Intersect a ray with the plane surface (either side).
    ///
    /// # Returns
    /// * `Some(RayHit)` - The hit, if in front of the ray and inside the square
    /// * `None` - Parallel ray, hit behind the origin, or past the plane edge
    pub fn intersect_ray(&self, ray: &Ray) -> Option<RayHit> {
        if ray.direction.y.abs() < 0.0001 {
            // Ray is parallel to plane
            return None;
        }

        let t = (self.height - ray.origin.y) / ray.direction.y;
        if t < 0.0 {
            // Intersection is behind camera
            return None;
        }

        let hit = RayHit::from_ray(ray, t);
        let inside = hit.point.x.abs() <= self.half_extent && hit.point.z.abs() <= self.half_extent;
        inside.then_some(hit)
    }
}

/// Scene handle consumed by the navigation core.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    grounds: Vec<GroundPlane>,
    collidable: Option<SceneNode>,
}

impl Scene {
    /// Scene with a single ground plane and no model yet
    pub fn with_ground(ground: GroundPlane) -> Self {
        Self {
            grounds: vec![ground],
            collidable: None,
        }
    }

    /// Add another ground object
    pub fn add_ground(&mut self, ground: GroundPlane) {
        self.grounds.push(ground);
    }

    /// Look up a ground object by its name
    pub fn ground_named(&self, name: &str) -> Option<&GroundPlane> {
        self.grounds.iter().find(|g| g.name == name)
    }

    /// Collidable model, absent until the model loader supplies it
    pub fn collidable(&self) -> Option<&SceneNode> {
        self.collidable.as_ref()
    }

    /// Mutable collidable access (editing-mode gizmo)
    pub fn collidable_mut(&mut self) -> Option<&mut SceneNode> {
        self.collidable.as_mut()
    }

    /// Install or remove the collidable model
    pub fn set_collidable(&mut self, node: Option<SceneNode>) {
        match &node {
            Some(n) => tracing::info!(name = %n.name, "collidable model attached"),
            None => tracing::info!("collidable model detached"),
        }
        self.collidable = node;
    }
}
