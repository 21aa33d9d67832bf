//! Collision detection module
//!
//! Ray queries against triangle geometry. A mesh is tested with a cheap
//! ray-AABB slab test first, then each triangle with the Möller–Trumbore
//! algorithm. Triangles are double-sided: loaded models are frequently
//! open shells and a wall must block from both sides.
//!
//! # Example
//!
//! ```ignore
//! use showroom_engine::physics::collision::{Ray, TriMesh};
//! use glam::{Mat4, Vec3};
//!
//! let wall = TriMesh::cuboid(Vec3::new(2.0, 2.0, 0.1));
//! let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
//!
//! if let Some(hit) = wall.intersect_ray(&ray, &Mat4::IDENTITY) {
//!     println!("Hit at distance {}: {:?}", hit.distance, hit.point);
//! }
//! ```

use glam::{Mat4, Vec3};

/// A half-line in world space. `direction` is normalized on construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray. A zero direction stays zero and never hits anything.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Nearest intersection of a ray with some geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from ray origin to hit point
    pub distance: f32,
    /// World-space position where the collision occurred
    pub point: Vec3,
}

impl RayHit {
    /// Build a hit from a ray parameter
    pub fn from_ray(ray: &Ray, distance: f32) -> Self {
        Self {
            distance,
            point: ray.at(distance),
        }
    }

    /// Keep whichever of two optional hits is nearer
    pub fn nearest(a: Option<RayHit>, b: Option<RayHit>) -> Option<RayHit> {
        match (a, b) {
            (Some(a), Some(b)) => Some(if b.distance < a.distance { b } else { a }),
            (a, None) => a,
            (None, b) => b,
        }
    }
}

/// Performs ray-AABB intersection using the slab method.
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the intersection point (t >= 0)
/// * `None` - No intersection or intersection is behind the ray origin
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    // Near-zero components get a huge inverse so their slab never constrains
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() > 1e-10 { 1.0 / ray_dir.x } else { f32::MAX },
        if ray_dir.y.abs() > 1e-10 { 1.0 / ray_dir.y } else { f32::MAX },
        if ray_dir.z.abs() > 1e-10 { 1.0 / ray_dir.z } else { f32::MAX },
    );

    let t1 = (aabb_min - ray_origin) * inv_dir;
    let t2 = (aabb_max - ray_origin) * inv_dir;

    let t_enter = t1.min(t2).max_element();
    let t_exit = t1.max(t2).min_element();

    if t_exit >= t_enter && t_exit >= 0.0 {
        if t_enter >= 0.0 {
            Some(t_enter)
        } else {
            // Ray starts inside the AABB
            Some(t_exit)
        }
    } else {
        None
    }
}

/// Double-sided ray-triangle intersection (Möller–Trumbore).
///
/// Returns the ray parameter of the hit, if it lies in front of the origin.
pub fn ray_triangle_intersect(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = b - a;
    let edge2 = c - a;
    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);

    // Parallel to the triangle plane (either face)
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t > EPSILON).then_some(t)
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Bounds of a point set. Returns `None` for an empty set.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    /// Center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full extents
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Bounds of this box after an affine transform (all eight corners)
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let corners = (0..8).map(|i| {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            matrix.transform_point3(corner)
        });
        // Eight corners are never empty
        Self::from_points(corners).unwrap_or(*self)
    }

    /// Slab test against this box
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        ray_aabb_intersect(ray.origin, ray.direction, self.min, self.max)
    }
}

/// Indexed triangle mesh in local (model) space.
#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    pub positions: Vec<Vec3>,
    /// Three indices per triangle
    pub indices: Vec<u32>,
    bounds: Option<Aabb>,
}

impl TriMesh {
    /// Build a mesh and cache its local bounds
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let bounds = Aabb::from_points(positions.iter().copied());
        Self {
            positions,
            indices,
            bounds,
        }
    }

    /// Axis-aligned box centered at the origin
    pub fn cuboid(half_extents: Vec3) -> Self {
        let h = half_extents;
        let positions = vec![
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1, 0, 3, 2, // -Z
            4, 5, 6, 4, 6, 7, // +Z
            0, 4, 7, 0, 7, 3, // -X
            1, 2, 6, 1, 6, 5, // +X
            0, 1, 5, 0, 5, 4, // -Y
            3, 7, 6, 3, 6, 2, // +Y
        ];
        Self::new(positions, indices)
    }

    /// Local-space bounds, `None` for an empty mesh
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Nearest hit of a world-space ray against this mesh placed by `world`.
    ///
    /// Triangles are transformed to world space so hit distances are in world
    /// units even under non-uniform scale.
    pub fn intersect_ray(&self, ray: &Ray, world: &Mat4) -> Option<RayHit> {
        let bounds = self.bounds?.transformed(world);
        bounds.intersect_ray(ray)?;

        let vertex = |i: u32| {
            self.positions
                .get(i as usize)
                .map(|p| world.transform_point3(*p))
        };

        let mut nearest: Option<f32> = None;
        for tri in self.indices.chunks_exact(3) {
            let (Some(a), Some(b), Some(c)) = (vertex(tri[0]), vertex(tri[1]), vertex(tri[2])) else {
                continue;
            };
            if let Some(t) = ray_triangle_intersect(ray, a, b, c) {
                if nearest.is_none_or(|best| t < best) {
                    nearest = Some(t);
                }
            }
        }

        nearest.map(|t| RayHit::from_ray(ray, t))
    }
}
