//! Narrow-phase collision geometry
//!
//! # Module Organization
//!
//! - [`shape`] - The three collision shape variants (plane, sphere, convex)
//! - [`convex`] - Convex polyhedron model, separating-axis search, clipping
//! - [`contact`] - The contact equation output record
//! - [`narrow_phase`] - Per-shape-pair contact generators
//!
//! # Key Types
//!
//! - [`Shape`] - Tagged shape variant attached to bodies
//! - [`ConvexPolyhedron`] - Immutable convex hull with precomputed edge
//!   directions
//! - [`ContactEquation`] - One contact point, consumed by the constraint
//!   solver

pub mod contact;
pub mod convex;
pub mod narrow_phase;
pub mod shape;

// Re-export commonly used types
pub use contact::ContactEquation;
pub use convex::{ClippedPoint, ConvexError, ConvexPolyhedron, Face};
pub use shape::Shape;
