//! # Narrowphase
//!
//! Narrow-phase collision detection core for a 3D rigid-body physics engine.
//!
//! Given a world of rigid bodies whose bounding volumes have already been
//! paired by an external broad phase, this crate computes the precise set of
//! contact equations a downstream constraint solver needs to resolve
//! penetration and apply impulses.
//!
//! ## Features
//!
//! - **Separating-axis test** between arbitrary convex polyhedra, including
//!   edge-edge axis enumeration
//! - **Sutherland–Hodgman clipping** of the incident face against the
//!   reference face's side planes, producing contact manifolds
//! - **Sphere-vs-convex** resolution handling face, edge, and vertex contact
//!   regions with consistent winner selection
//! - **Plane and sphere primitives** with analytic contact generators
//!
//! ## Quick Start
//!
//! ```rust
//! use narrowphase::physics::body::{Body, World};
//! use narrowphase::physics::collision::Shape;
//! use narrowphase::physics::collision_system::get_contacts;
//! use narrowphase::foundation::math::{Quat, Transform, Vec3};
//!
//! let mut world = World::new();
//!
//! let mut ground = Body::new(Vec3::zeros(), Quat::identity());
//! ground.add_shape(Shape::Plane, Transform::identity());
//! let ground_id = world.add_body(ground);
//!
//! let mut ball = Body::new(Vec3::new(0.0, 0.0, 0.8), Quat::identity());
//! ball.add_shape(Shape::sphere(1.0), Transform::identity());
//! let ball_id = world.add_body(ball);
//!
//! world.add_pair(ground_id, ball_id);
//!
//! let contacts = get_contacts(&world);
//! assert_eq!(contacts.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod physics;

// Re-export key types for easier use
pub use foundation::math::{Quat, Transform, Vec3};
pub use physics::body::{Body, BodyId, BodyPair, ShapeId, World};
pub use physics::collision::{ContactEquation, ConvexPolyhedron, Shape};
pub use physics::collision_system::{get_contacts, get_contacts_with, CollisionConfig};
