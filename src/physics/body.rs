//! Rigid bodies and the world that owns them
//!
//! Bodies are read-only during narrow-phase execution; the world is a plain
//! data container filled in by the caller (body construction and the broad
//! phase are external).

use crate::foundation::math::{Quat, Transform, Vec3};
use crate::physics::collision::Shape;
use std::collections::HashMap;

/// Stable identifier of a body within a [`World`].
///
/// Totally ordered so that pairs `(a, b)` with `a < b` are canonical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub u32);

/// Stable identifier of a shape within a [`Body`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId(pub u32);

/// A pair of bodies nominated for narrow-phase testing by the broad phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyPair {
    /// The smaller body id
    pub body_a: BodyId,
    /// The larger body id
    pub body_b: BodyId,
}

impl BodyPair {
    /// Create a new pair (always stores the smaller body id first for
    /// consistency)
    pub fn new(body_a: BodyId, body_b: BodyId) -> Self {
        if body_a < body_b {
            Self { body_a, body_b }
        } else {
            Self {
                body_a: body_b,
                body_b: body_a,
            }
        }
    }
}

/// One shape attached to a body, with its body-local transform
#[derive(Debug, Clone)]
pub struct BodyShape {
    /// Identifier of this shape within its body
    pub id: ShapeId,
    /// The collision geometry
    pub shape: Shape,
    /// Placement of the shape in the body frame
    pub transform: Transform,
}

/// A rigid body: a world transform plus a collection of shapes.
///
/// Shapes are stored densely in insertion order, which is also their
/// deterministic iteration order during contact generation.
#[derive(Debug, Clone)]
pub struct Body {
    /// Body origin in world space
    pub position: Vec3,
    /// Body orientation in world space
    pub rotation: Quat,
    shapes: Vec<BodyShape>,
    next_shape: u32,
}

impl Body {
    /// Create a body at the given world position and orientation, with no
    /// shapes yet
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            shapes: Vec::new(),
            next_shape: 0,
        }
    }

    /// Attach a shape at the given body-local transform, returning its id
    pub fn add_shape(&mut self, shape: Shape, transform: Transform) -> ShapeId {
        let id = ShapeId(self.next_shape);
        self.next_shape += 1;
        self.shapes.push(BodyShape {
            id,
            shape,
            transform,
        });
        id
    }

    /// The body's shapes in insertion order
    pub fn shapes(&self) -> &[BodyShape] {
        &self.shapes
    }

    /// The body's world transform
    pub fn transform(&self) -> Transform {
        Transform::from_position_rotation(self.position, self.rotation)
    }
}

/// The set of bodies plus the broad-phase pair list.
///
/// The pair list is trusted input: canonical (`a < b`), duplicate-free, and
/// self-pair-free per the broad-phase contract. A pair naming a missing body
/// is silently skipped during contact generation, since the broad phase may
/// hold stale pairs while bodies are being removed.
#[derive(Debug, Clone, Default)]
pub struct World {
    bodies: HashMap<BodyId, Body>,
    pairs: Vec<BodyPair>,
    next_body: u32,
}

impl World {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a body, returning its freshly allocated id
    pub fn add_body(&mut self, body: Body) -> BodyId {
        let id = BodyId(self.next_body);
        self.next_body += 1;
        self.bodies.insert(id, body);
        id
    }

    /// Remove a body. Pairs referring to it remain and are skipped during
    /// contact generation.
    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        self.bodies.remove(&id)
    }

    /// Look up a body by id
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    /// Number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Append a broad-phase pair, canonicalized to smaller-id-first
    pub fn add_pair(&mut self, a: BodyId, b: BodyId) {
        self.pairs.push(BodyPair::new(a, b));
    }

    /// The broad-phase pairs in iteration order
    pub fn pairs(&self) -> &[BodyPair] {
        &self.pairs
    }
}
