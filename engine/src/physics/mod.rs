//! Physics module
//!
//! Ray queries only: there is no rigid-body simulation. Locomotion collision
//! is a single ray per frame against the loaded model.
//!
//! # Unit System
//!
//! **1 unit = 1 meter**
//!
//! # Submodules
//!
//! - [`collision`] - Rays, ray-AABB and ray-triangle tests, triangle meshes
//! - [`probe`] - Horizontal obstruction probe for keyboard locomotion

pub mod collision;
pub mod probe;

// Re-export commonly used types at the physics module level
pub use collision::{Aabb, Ray, RayHit, TriMesh, ray_aabb_intersect, ray_triangle_intersect};
pub use probe::CollisionProbe;
