//! Physics module: the narrow-phase collision detection core
//!
//! The broad phase and the constraint solver are external collaborators;
//! this module consumes the broad phase's pair set and produces the contact
//! equations the solver consumes.

pub mod body;
pub mod collision;
pub mod collision_system;

pub use body::{Body, BodyId, BodyPair, ShapeId, World};
pub use collision::{ContactEquation, ConvexPolyhedron, Shape};
pub use collision_system::{get_contacts, get_contacts_with, CollisionConfig};
