//! Math utilities and types
//!
//! Provides the fundamental math types for 3D collision geometry. All scalar
//! arithmetic is `f64`; contact generation is sensitive to cancellation near
//! grazing configurations and single precision is not enough headroom.

pub use nalgebra::{Quaternion, Unit, UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// Unit quaternion type for rotations
pub type Quat = UnitQuaternion<f64>;

/// A rigid transform: rotation followed by translation.
///
/// Composable; a shape's world transform is the owning body's transform
/// composed with the shape's body-local transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in world (or parent) space
    pub position: Vec3,
    /// Rotation quaternion
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Map a point from this transform's local frame to the world frame
    pub fn point_to_world_frame(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.position
    }

    /// Map a world-frame point into this transform's local frame.
    ///
    /// Inverse of [`point_to_world_frame`](Self::point_to_world_frame).
    pub fn point_to_local_frame(&self, point: Vec3) -> Vec3 {
        self.rotation.inverse() * (point - self.position)
    }

    /// Rotate a direction from the local frame to the world frame, ignoring
    /// translation
    pub fn vector_to_world_frame(&self, vector: Vec3) -> Vec3 {
        self.rotation * vector
    }

    /// Compose this transform with a child transform expressed in this
    /// frame, yielding the child's world transform
    pub fn compose(&self, local: &Transform) -> Transform {
        Transform {
            position: self.point_to_world_frame(local.position),
            rotation: self.rotation * local.rotation,
        }
    }
}

/// Unit vector pointing from `b` toward `a`.
///
/// Undefined for `a == b`; callers must rule that out with a distance check
/// before calling.
pub fn direction(a: Vec3, b: Vec3) -> Vec3 {
    (a - b).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_point_to_world_frame_translates() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let p = t.point_to_world_frame(Vec3::new(0.5, 0.0, 0.0));
        assert_relative_eq!(p, Vec3::new(1.5, 2.0, 3.0), epsilon = EPSILON);
    }

    #[test]
    fn test_point_to_world_frame_rotates_then_translates() {
        // Quarter turn about Z maps +X to +Y
        let rotation = Quat::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2);
        let t = Transform::from_position_rotation(Vec3::new(1.0, 0.0, 0.0), rotation);
        let p = t.point_to_world_frame(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Vec3::new(1.0, 1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_local_frame_round_trip() {
        let rotation = Quat::from_axis_angle(&Vector3::y_axis(), 0.7);
        let t = Transform::from_position_rotation(Vec3::new(-2.0, 4.0, 1.5), rotation);
        let p = Vec3::new(0.3, -0.9, 2.2);
        let round_trip = t.point_to_local_frame(t.point_to_world_frame(p));
        assert_relative_eq!(round_trip, p, epsilon = EPSILON);
    }

    #[test]
    fn test_compose_matches_sequential_mapping() {
        let body = Transform::from_position_rotation(
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_axis_angle(&Vector3::z_axis(), 0.3),
        );
        let local = Transform::from_position_rotation(
            Vec3::new(0.0, 2.0, 0.0),
            Quat::from_axis_angle(&Vector3::x_axis(), -1.1),
        );
        let composed = body.compose(&local);

        let p = Vec3::new(0.4, 0.5, 0.6);
        let expected = body.point_to_world_frame(local.point_to_world_frame(p));
        assert_relative_eq!(composed.point_to_world_frame(p), expected, epsilon = EPSILON);
    }

    #[test]
    fn test_direction_is_unit_and_points_toward_first_argument() {
        let d = direction(Vec3::new(3.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(d, Vec3::new(1.0, 0.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(d.norm(), 1.0, epsilon = EPSILON);
    }
}
