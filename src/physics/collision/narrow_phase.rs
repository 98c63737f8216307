//! Per-shape-pair contact generators
//!
//! One canonical generator per unordered shape pair, plus an explicit 9-way
//! dispatch over the ordered pair. Swapped orders run the canonical
//! generator with exchanged body roles and flip the resulting contacts, so
//! emitted normals and contact vectors always refer to the caller's argument
//! order. A plane-plane pair deliberately emits nothing.
//!
//! Within one generator execution is strictly sequential: sphere-convex
//! keeps a running best candidate whose winner depends on iteration order.

use super::contact::ContactEquation;
use super::convex::ConvexPolyhedron;
use super::shape::Shape;
use crate::foundation::math::{direction, Transform, Vec3};
use crate::physics::body::{Body, BodyId};
use crate::physics::collision_system::CollisionConfig;
use smallvec::SmallVec;

/// Below this center distance two spheres are treated as coincident and the
/// contact normal falls back to +Z
const CENTER_EPSILON: f64 = 1e-10;

/// Generate the contacts for one shape pair and append them to `out`.
///
/// `t1` and `t2` are the shapes' world transforms (body transform composed
/// with the shape's body-local transform).
pub fn generate_contacts(
    out: &mut Vec<ContactEquation>,
    config: &CollisionConfig,
    id1: BodyId,
    body1: &Body,
    shape1: &Shape,
    t1: &Transform,
    id2: BodyId,
    body2: &Body,
    shape2: &Shape,
    t2: &Transform,
) {
    match (shape1, shape2) {
        // Two half-spaces have no localized contact
        (Shape::Plane, Shape::Plane) => {}
        (Shape::Plane, Shape::Sphere(radius)) => {
            plane_sphere(out, id1, body1, t1, id2, body2, t2, *radius);
        }
        (Shape::Sphere(radius), Shape::Plane) => {
            flipped(out, |acc| {
                plane_sphere(acc, id2, body2, t2, id1, body1, t1, *radius);
            });
        }
        (Shape::Plane, Shape::Convex(hull)) => {
            plane_convex(out, id1, body1, t1, id2, body2, hull, t2);
        }
        (Shape::Convex(hull), Shape::Plane) => {
            flipped(out, |acc| {
                plane_convex(acc, id2, body2, t2, id1, body1, hull, t1);
            });
        }
        (Shape::Sphere(r1), Shape::Sphere(r2)) => {
            sphere_sphere(out, id1, t1, *r1, id2, t2, *r2);
        }
        (Shape::Sphere(radius), Shape::Convex(hull)) => {
            sphere_convex(out, id1, t1, *radius, id2, body2, hull, t2);
        }
        (Shape::Convex(hull), Shape::Sphere(radius)) => {
            flipped(out, |acc| {
                sphere_convex(acc, id2, t2, *radius, id1, body1, hull, t1);
            });
        }
        (Shape::Convex(h1), Shape::Convex(h2)) => {
            convex_convex(out, config, id1, body1, h1, t1, id2, body2, h2, t2);
        }
    }
}

/// Run a canonical generator with swapped body roles, then append its output
/// flipped back into the caller's order
fn flipped(out: &mut Vec<ContactEquation>, generate: impl FnOnce(&mut Vec<ContactEquation>)) {
    let mut swapped = Vec::new();
    generate(&mut swapped);
    out.extend(swapped.into_iter().map(ContactEquation::flipped));
}

/// Plane against convex hull: every hull vertex at or below the plane
/// surface yields a contact. Duplicate-looking contacts are fine, the
/// solver handles redundancy.
fn plane_convex(
    out: &mut Vec<ContactEquation>,
    plane_id: BodyId,
    plane_body: &Body,
    t_plane: &Transform,
    convex_id: BodyId,
    convex_body: &Body,
    hull: &ConvexPolyhedron,
    t_convex: &Transform,
) {
    let normal = Shape::plane_world_normal(t_plane);
    for vertex in hull.vertices() {
        let world = t_convex.point_to_world_frame(*vertex);
        let distance = normal.dot(&(world - t_plane.position));
        if distance <= 0.0 {
            out.push(ContactEquation::new(
                plane_id,
                convex_id,
                normal,
                (world - normal * distance) - plane_body.position,
                world - convex_body.position,
            ));
        }
    }
}

/// Plane against sphere: test the sphere's deepest point against the plane
fn plane_sphere(
    out: &mut Vec<ContactEquation>,
    plane_id: BodyId,
    plane_body: &Body,
    t_plane: &Transform,
    sphere_id: BodyId,
    sphere_body: &Body,
    t_sphere: &Transform,
    radius: f64,
) {
    let normal = Shape::plane_world_normal(t_plane);
    let deepest = t_sphere.position - normal * radius;
    let distance = normal.dot(&(deepest - t_plane.position));
    if distance <= 0.0 {
        out.push(ContactEquation::new(
            plane_id,
            sphere_id,
            normal,
            (deepest - normal * distance) - plane_body.position,
            deepest - sphere_body.position,
        ));
    }
}

/// Sphere against sphere: analytic center-distance test
fn sphere_sphere(
    out: &mut Vec<ContactEquation>,
    id1: BodyId,
    t1: &Transform,
    r1: f64,
    id2: BodyId,
    t2: &Transform,
    r2: f64,
) {
    let c1 = t1.position;
    let c2 = t2.position;
    let dist = (c2 - c1).norm();
    if dist > r1 + r2 {
        return;
    }
    // Coincident centers leave the normal undefined; fall back to +Z
    let ni = if dist > CENTER_EPSILON {
        direction(c1, c2)
    } else {
        Vec3::z()
    };
    out.push(ContactEquation::new(id1, id2, ni, ni * r1, ni * -r2));
}

/// Sphere against convex hull.
///
/// Three-stage search keeping a running best `(point, penetration)` pair,
/// seeded at penetration zero so grazing candidates still win over nothing.
/// A candidate wins on `penetration >= best`, which lets later candidates
/// take ties: faces beat vertices as iterated. Edges are only tested for a
/// face whose plane the sphere crosses but whose interior rejects the center
/// projection; a small sphere straddling a corner without crossing any face
/// plane produces no contact. Known limitation.
fn sphere_convex(
    out: &mut Vec<ContactEquation>,
    sphere_id: BodyId,
    t_sphere: &Transform,
    radius: f64,
    convex_id: BodyId,
    convex_body: &Body,
    hull: &ConvexPolyhedron,
    t_convex: &Transform,
) {
    let center = t_sphere.position;

    let mut best_point: Option<Vec3> = None;
    let mut best_pen = 0.0f64;

    // Stage 1: hull vertices inside the sphere
    for vertex in hull.vertices() {
        let world = t_convex.point_to_world_frame(*vertex);
        let pen = radius - (world - center).norm();
        if pen >= best_pen {
            best_pen = pen;
            best_point = Some(world);
        }
    }

    // Stage 2: face interiors, falling back per face to stage 3, its edges
    let (best_point, best_pen) = hull.fold_face_normals(
        t_convex,
        (best_point, best_pen),
        |(mut best_point, mut best_pen), face_normal, face_vertex, face_index| {
            let side = face_normal.dot(&(center - face_vertex));
            let pen = radius - side;
            if side > 0.0 && pen >= best_pen {
                let ring = &hull.faces()[face_index].vertices;
                let mut polygon: SmallVec<[Vec3; 8]> = SmallVec::new();
                for &vi in ring {
                    // A degenerate ring gives no face contact and falls
                    // through to the edge test
                    if let Some(vertex) = hull.vertices().get(vi) {
                        polygon.push(t_convex.point_to_world_frame(*vertex));
                    }
                }
                if point_in_polygon(&polygon, &face_normal, &center) {
                    best_pen = pen;
                    best_point = Some(center + face_normal * (pen - radius));
                } else if let Some(&last) = polygon.last() {
                    let mut prev = last;
                    for &curr in &polygon {
                        let edge = curr - prev;
                        let len_sq = edge.norm_squared();
                        if len_sq > 0.0 {
                            let unit = edge / len_sq.sqrt();
                            let s = (center - prev).dot(&unit);
                            if s > 0.0 && s * s < len_sq {
                                let closest = prev + unit * s;
                                let pen_edge = radius - (closest - center).norm();
                                if pen_edge >= best_pen {
                                    best_pen = pen_edge;
                                    best_point = Some(closest);
                                }
                            }
                        }
                        prev = curr;
                    }
                }
            }
            (best_point, best_pen)
        },
    );

    if let Some(best) = best_point {
        if (best - center).norm_squared() > 0.0 {
            let ni = direction(best, center);
            out.push(ContactEquation::new(
                sphere_id,
                convex_id,
                ni,
                (best - center) + ni * best_pen,
                best - convex_body.position,
            ));
        }
    }
}

/// Convex against convex: separating-axis search, then clipping of the
/// incident face against the reference face's side planes
fn convex_convex(
    out: &mut Vec<ContactEquation>,
    config: &CollisionConfig,
    id1: BodyId,
    body1: &Body,
    hull1: &ConvexPolyhedron,
    t1: &Transform,
    id2: BodyId,
    body2: &Body,
    hull2: &ConvexPolyhedron,
    t2: &Transform,
) {
    let Some(sep_axis) = hull1.find_separating_axis(t1, hull2, t2, config.sat_cross_epsilon)
    else {
        return;
    };
    let ni = -sep_axis;
    for clipped in hull1.clip_against_hull(
        t1,
        hull2,
        t2,
        &sep_axis,
        config.contact_min_dist,
        config.contact_max_dist,
    ) {
        let q = clipped.normal * -clipped.depth;
        out.push(ContactEquation::new(
            id1,
            id2,
            ni,
            (clipped.point + q) - body1.position,
            clipped.point - body2.position,
        ));
    }
}

/// Test whether `point` projects inside the polygon ring.
///
/// Fewer than three vertices is never inside. For each ring pair
/// `(v, prev)` the sign of `((v - prev) × normal) · (point - prev)` is
/// examined; the point is inside iff the sign is consistent (all strictly
/// positive or all non-positive), with the first edge fixing the reference
/// sign.
pub fn point_in_polygon(vertices: &[Vec3], normal: &Vec3, point: &Vec3) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut positive: Option<bool> = None;
    let mut prev = vertices[vertices.len() - 1];
    for &vertex in vertices {
        let edge = vertex - prev;
        let s = edge.cross(normal).dot(&(*point - prev));
        match positive {
            None => positive = Some(s > 0.0),
            Some(reference) => {
                if reference != (s > 0.0) {
                    return false;
                }
            }
        }
        prev = vertex;
    }
    true
}
