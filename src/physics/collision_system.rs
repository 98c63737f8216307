//! World-level contact generation
//!
//! Walks the broad-phase pair set, fetches both bodies, composes per-shape
//! world transforms, dispatches the shape-pair generators, and accumulates
//! the resulting contact equations. Single-threaded and synchronous; one
//! call per simulation tick, driven by the caller.

use crate::physics::body::World;
use crate::physics::collision::narrow_phase::generate_contacts;
use crate::physics::collision::ContactEquation;
use serde::{Deserialize, Serialize};

/// Narrow-phase tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionConfig {
    /// Lower bound on the signed reference-plane distance a clipped vertex
    /// may have and still produce a contact
    pub contact_min_dist: f64,
    /// Upper bound on the signed reference-plane distance
    pub contact_max_dist: f64,
    /// Edge-edge cross products shorter than this are not usable as
    /// separating-axis candidates; normalizing them would blow up
    pub sat_cross_epsilon: f64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            contact_min_dist: -100.0,
            contact_max_dist: 100.0,
            sat_cross_epsilon: 1e-6,
        }
    }
}

/// Compute the contact equations for every broad-phase pair in the world,
/// using the default [`CollisionConfig`].
pub fn get_contacts(world: &World) -> Vec<ContactEquation> {
    get_contacts_with(world, &CollisionConfig::default())
}

/// Compute the contact equations for every broad-phase pair in the world.
///
/// Output order is deterministic: pair order, then the first body's shape
/// order, then the second body's, then per-generator append order. A pair
/// naming a missing body is skipped; the broad phase may hold stale pairs
/// while bodies are being removed.
pub fn get_contacts_with(world: &World, config: &CollisionConfig) -> Vec<ContactEquation> {
    let mut contacts = Vec::new();
    for pair in world.pairs() {
        let (Some(body1), Some(body2)) = (world.body(pair.body_a), world.body(pair.body_b))
        else {
            continue;
        };
        let transform1 = body1.transform();
        let transform2 = body2.transform();
        for entry1 in body1.shapes() {
            let t1 = transform1.compose(&entry1.transform);
            for entry2 in body2.shapes() {
                let t2 = transform2.compose(&entry2.transform);
                generate_contacts(
                    &mut contacts,
                    config,
                    pair.body_a,
                    body1,
                    &entry1.shape,
                    &t1,
                    pair.body_b,
                    body2,
                    &entry2.shape,
                    &t2,
                );
            }
        }
    }
    log::trace!(
        "narrow phase: {} pairs in, {} contacts out",
        world.pairs().len(),
        contacts.len()
    );
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Transform, Vec3};
    use crate::physics::body::{Body, BodyId};
    use crate::physics::collision::Shape;
    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-9;

    fn single_shape_body(shape: Shape, position: Vec3) -> Body {
        let mut body = Body::new(position, Quat::identity());
        body.add_shape(shape, Transform::identity());
        body
    }

    #[test]
    fn test_box_dropped_into_ground_plane() {
        // Unit cube 0.05 into the ground: exactly one contact per
        // penetrating vertex
        let mut world = World::new();
        let ground = world.add_body(single_shape_body(Shape::Plane, Vec3::zeros()));
        let cube = world.add_body(single_shape_body(
            Shape::cuboid(Vec3::new(0.5, 0.5, 0.5)),
            Vec3::new(0.0, 0.0, 0.45),
        ));
        world.add_pair(ground, cube);

        let contacts = get_contacts(&world);
        assert_eq!(contacts.len(), 4);
        for c in &contacts {
            assert_eq!(c.body_id1, ground);
            assert_eq!(c.body_id2, cube);
            assert_relative_eq!(c.ni, Vec3::new(0.0, 0.0, 1.0), epsilon = EPSILON);
            // Penetrating vertex sits 0.05 below the surface
            let vertex = Vec3::new(0.0, 0.0, 0.45) + c.rj;
            assert_relative_eq!(vertex.z, -0.05, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_lifting_the_box_sheds_contacts() {
        // Raising the body along the plane normal monotonically reduces the
        // number of penetrating vertices
        let heights = [0.45, 0.5, 0.6];
        let mut counts = Vec::new();
        for z in heights {
            let mut world = World::new();
            let ground = world.add_body(single_shape_body(Shape::Plane, Vec3::zeros()));
            let cube = world.add_body(single_shape_body(
                Shape::cuboid(Vec3::new(0.5, 0.5, 0.5)),
                Vec3::new(0.0, 0.0, z),
            ));
            world.add_pair(ground, cube);
            counts.push(get_contacts(&world).len());
        }
        assert_eq!(counts, vec![4, 4, 0]);
        // z = 0.5 rests exactly on the surface, a valid zero-depth contact
    }

    #[test]
    fn test_two_boxes_overlap_rectangle() {
        let mut world = World::new();
        let left = world.add_body(single_shape_body(
            Shape::cuboid(Vec3::new(0.5, 0.5, 0.5)),
            Vec3::zeros(),
        ));
        let right = world.add_body(single_shape_body(
            Shape::cuboid(Vec3::new(0.5, 0.5, 0.5)),
            Vec3::new(0.9, 0.0, 0.0),
        ));
        world.add_pair(left, right);

        let contacts = get_contacts(&world);
        assert_eq!(contacts.len(), 4);
        for c in &contacts {
            assert_relative_eq!(c.ni, Vec3::new(-1.0, 0.0, 0.0), epsilon = EPSILON);
        }
    }

    #[test]
    fn test_missing_body_pair_is_skipped() {
        let mut world = World::new();
        let a = world.add_body(single_shape_body(Shape::sphere(1.0), Vec3::zeros()));
        let b = world.add_body(single_shape_body(
            Shape::sphere(1.0),
            Vec3::new(1.5, 0.0, 0.0),
        ));
        world.add_pair(a, b);
        world.remove_body(b);

        let contacts = get_contacts(&world);
        assert!(contacts.is_empty());
    }

    #[test]
    fn test_output_is_deterministic() {
        crate::foundation::logging::init();
        let mut world = World::new();
        let ground = world.add_body(single_shape_body(Shape::Plane, Vec3::zeros()));
        let cube = world.add_body(single_shape_body(
            Shape::cuboid(Vec3::new(0.5, 0.5, 0.5)),
            Vec3::new(0.0, 0.0, 0.45),
        ));
        let ball = world.add_body(single_shape_body(
            Shape::sphere(1.0),
            Vec3::new(0.3, 0.0, 1.2),
        ));
        world.add_pair(ground, cube);
        world.add_pair(ground, ball);
        world.add_pair(cube, ball);

        let first = get_contacts(&world);
        let second = get_contacts(&world);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_shape_offset_composes_with_body_transform() {
        // Sphere shape hung 1 unit below its body origin; the body sits
        // high enough that only the offset shape touches the ground
        let mut world = World::new();
        let ground = world.add_body(single_shape_body(Shape::Plane, Vec3::zeros()));
        let mut carrier = Body::new(Vec3::new(0.0, 0.0, 1.8), Quat::identity());
        carrier.add_shape(
            Shape::sphere(1.0),
            Transform::from_position(Vec3::new(0.0, 0.0, -1.0)),
        );
        let carrier_id = world.add_body(carrier);
        world.add_pair(ground, carrier_id);

        let contacts = get_contacts(&world);
        assert_eq!(contacts.len(), 1);
        // Shape center is at z = 0.8, so the sphere dips 0.2 under
        let sphere_point = Vec3::new(0.0, 0.0, 1.8) + contacts[0].rj;
        assert_relative_eq!(sphere_point, Vec3::new(0.0, 0.0, -0.2), epsilon = EPSILON);
    }

    #[test]
    fn test_multi_shape_bodies_visit_cartesian_product() {
        let mut world = World::new();

        let mut compound = Body::new(Vec3::zeros(), Quat::identity());
        compound.add_shape(Shape::sphere(1.0), Transform::identity());
        compound.add_shape(
            Shape::sphere(1.0),
            Transform::from_position(Vec3::new(3.0, 0.0, 0.0)),
        );
        let compound_id = world.add_body(compound);

        let mut others = Body::new(Vec3::new(1.5, 0.0, 0.0), Quat::identity());
        others.add_shape(Shape::sphere(1.0), Transform::identity());
        let other_id = world.add_body(others);

        world.add_pair(compound_id, other_id);

        // Both of the compound's spheres touch the middle one
        let contacts = get_contacts(&world);
        assert_eq!(contacts.len(), 2);
        assert_relative_eq!(
            contacts[0].ni,
            Vec3::new(-1.0, 0.0, 0.0),
            epsilon = EPSILON
        );
        assert_relative_eq!(contacts[1].ni, Vec3::new(1.0, 0.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_custom_config_narrows_clip_window() {
        let mut world = World::new();
        let left = world.add_body(single_shape_body(
            Shape::cuboid(Vec3::new(0.5, 0.5, 0.5)),
            Vec3::zeros(),
        ));
        let right = world.add_body(single_shape_body(
            Shape::cuboid(Vec3::new(0.5, 0.5, 0.5)),
            Vec3::new(0.9, 0.0, 0.0),
        ));
        world.add_pair(left, right);

        // Clip window that excludes the -0.1 reference-plane distance
        let config = CollisionConfig {
            contact_min_dist: -0.05,
            ..CollisionConfig::default()
        };
        assert!(get_contacts_with(&world, &config).is_empty());
        assert_eq!(get_contacts(&world).len(), 4);
    }

    #[test]
    fn test_contact_point_reconstruction() {
        // body1.position + ri and body2.position + rj straddle the contact
        // along the normal by the geometric penetration
        let mut world = World::new();
        let a = world.add_body(single_shape_body(Shape::sphere(1.0), Vec3::zeros()));
        let b = world.add_body(single_shape_body(
            Shape::sphere(1.0),
            Vec3::new(0.0, 1.5, 0.0),
        ));
        world.add_pair(a, b);

        let contacts = get_contacts(&world);
        assert_eq!(contacts.len(), 1);
        let c = &contacts[0];
        assert_eq!((c.body_id1, c.body_id2), (BodyId(0), BodyId(1)));
        let p1 = Vec3::zeros() + c.ri;
        let p2 = Vec3::new(0.0, 1.5, 0.0) + c.rj;
        // Both points lie on the center line, separated along the normal
        let gap = (p1 - p2).dot(&c.ni);
        assert_relative_eq!((p1 - p2).norm(), gap.abs(), epsilon = EPSILON);
        assert_eq!(c.restitution, 0.0);
    }
}
