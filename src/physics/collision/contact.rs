//! The contact equation output record
//!
//! One record per contact point. Records are created during a single
//! narrow-phase call, owned by the caller, never mutated, and consumed by
//! the external constraint solver within the same tick.

use crate::foundation::math::Vec3;
use crate::physics::body::BodyId;

/// A single contact point between two bodies
#[derive(Debug, Clone, PartialEq)]
pub struct ContactEquation {
    /// First body of the pair, in the order the generator received them
    pub body_id1: BodyId,
    /// Second body of the pair
    pub body_id2: BodyId,
    /// Unit contact normal
    pub ni: Vec3,
    /// World-space vector from body 1's position to the contact point on
    /// body 1
    pub ri: Vec3,
    /// World-space vector from body 2's position to the contact point on
    /// body 2
    pub rj: Vec3,
    /// Always zero here; downstream code overwrites this per material
    pub restitution: f64,
}

impl ContactEquation {
    /// Create a contact with zero restitution
    pub fn new(body_id1: BodyId, body_id2: BodyId, ni: Vec3, ri: Vec3, rj: Vec3) -> Self {
        Self {
            body_id1,
            body_id2,
            ni,
            ri,
            rj,
            restitution: 0.0,
        }
    }

    /// The same contact with the body roles exchanged: ids and contact
    /// vectors swapped, normal negated
    pub fn flipped(self) -> Self {
        Self {
            body_id1: self.body_id2,
            body_id2: self.body_id1,
            ni: -self.ni,
            ri: self.rj,
            rj: self.ri,
            restitution: self.restitution,
        }
    }

    /// Separation measure along the normal, as the solver sees it
    pub fn depth(&self) -> f64 {
        (self.ri - self.rj).dot(&self.ni)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flipped_swaps_roles_and_negates_normal() {
        let c = ContactEquation::new(
            BodyId(0),
            BodyId(1),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        );
        let f = c.clone().flipped();
        assert_eq!(f.body_id1, BodyId(1));
        assert_eq!(f.body_id2, BodyId(0));
        assert_relative_eq!(f.ni, -c.ni, epsilon = 1e-12);
        assert_relative_eq!(f.ri, c.rj, epsilon = 1e-12);
        assert_relative_eq!(f.rj, c.ri, epsilon = 1e-12);
    }

    #[test]
    fn test_restitution_starts_at_zero() {
        let c = ContactEquation::new(
            BodyId(0),
            BodyId(1),
            Vec3::z(),
            Vec3::zeros(),
            Vec3::zeros(),
        );
        assert_eq!(c.restitution, 0.0);
    }
}
