//! Collision shape variants
//!
//! Shapes are stored in local space and carry no placement of their own; the
//! owning body supplies a body-local transform per shape, and tests receive
//! the composed world transform.

use super::convex::ConvexPolyhedron;
use crate::foundation::math::{Transform, Vec3};

/// Collision shape variants
#[derive(Debug, Clone)]
pub enum Shape {
    /// An implicit half-space. The outward normal in the local frame is the
    /// +Z unit vector; everything below the plane is solid.
    Plane,
    /// A sphere of the given radius, centered at the shape-transform origin
    Sphere(f64),
    /// An arbitrary convex polyhedron
    Convex(ConvexPolyhedron),
}

impl Shape {
    /// Create a spherical shape with the given radius
    pub fn sphere(radius: f64) -> Self {
        Self::Sphere(radius)
    }

    /// Create a box shape with the given half-extents
    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::Convex(ConvexPolyhedron::from_box(half_extents))
    }

    /// World-space outward normal of a plane placed by `transform`
    pub fn plane_world_normal(transform: &Transform) -> Vec3 {
        transform.vector_to_world_frame(Vec3::z())
    }
}
