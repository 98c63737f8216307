//! Convex polyhedron model and queries
//!
//! A hull is an immutable record built once and queried per pair: face
//! normals and supporting vertices, separating-axis search, and clipping of
//! an incident face against the side planes of a reference face. Unique edge
//! directions are precomputed at construction because the separating-axis
//! search runs per pair and must not rebuild them each call.

use crate::foundation::math::{Transform, Vec3};
use smallvec::SmallVec;
use thiserror::Error;

/// Edge-edge cross products shorter than this are degenerate and produce no
/// separating-axis candidate; directions closer than this are deduplicated.
const EDGE_EPSILON: f64 = 1e-6;

/// Working polygon for Sutherland-Hodgman clipping. Eight inline slots cover
/// the common quad-face case even after a few plane insertions.
type Polygon = SmallVec<[Vec3; 8]>;

/// Invalid hull geometry handed to [`ConvexPolyhedron::new`]
#[derive(Error, Debug)]
pub enum ConvexError {
    /// A face ring with fewer than three vertices
    #[error("face {face} has {count} vertices, need at least 3")]
    FaceTooSmall {
        /// Index of the offending face
        face: usize,
        /// Number of vertices the face ring actually has
        count: usize,
    },
    /// A face ring referencing a vertex that does not exist
    #[error("face {face} references vertex {index}, but the hull has {len} vertices")]
    VertexOutOfRange {
        /// Index of the offending face
        face: usize,
        /// The out-of-range vertex index
        index: usize,
        /// Number of vertices in the hull
        len: usize,
    },
    /// A face normal pointing into the hull interior
    #[error("face {face} normal points into the hull interior")]
    InwardNormal {
        /// Index of the offending face
        face: usize,
    },
}

/// One face of a convex polyhedron: an ordered ring of vertex indices and
/// the outward unit normal of the face plane
#[derive(Debug, Clone)]
pub struct Face {
    /// Indices into the hull's vertex list, wound consistently around the
    /// outward normal
    pub vertices: Vec<usize>,
    /// Outward unit normal in the hull's local frame
    pub normal: Vec3,
}

/// One vertex surviving the clip of an incident face against a reference
/// face's side planes, projected onto the reference plane
#[derive(Debug, Clone, Copy)]
pub struct ClippedPoint {
    /// Contact point on the reference plane, world space
    pub point: Vec3,
    /// World-space reference face normal
    pub normal: Vec3,
    /// Penetration depth (negated signed distance of the unprojected vertex)
    pub depth: f64,
}

/// An immutable convex polyhedron in local space
#[derive(Debug, Clone)]
pub struct ConvexPolyhedron {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    unique_edges: Vec<Vec3>,
}

impl ConvexPolyhedron {
    /// Build a hull from vertices and faces, validating the geometry.
    ///
    /// Face normals must point outward; every face ring needs at least three
    /// in-range vertex indices.
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> Result<Self, ConvexError> {
        for (i, face) in faces.iter().enumerate() {
            if face.vertices.len() < 3 {
                return Err(ConvexError::FaceTooSmall {
                    face: i,
                    count: face.vertices.len(),
                });
            }
            for &index in &face.vertices {
                if index >= vertices.len() {
                    return Err(ConvexError::VertexOutOfRange {
                        face: i,
                        index,
                        len: vertices.len(),
                    });
                }
            }
        }

        // The centroid must be interior to every face plane
        let centroid = vertices.iter().sum::<Vec3>() / vertices.len() as f64;
        for (i, face) in faces.iter().enumerate() {
            let on_face = vertices[face.vertices[0]];
            if face.normal.dot(&(centroid - on_face)) > 1e-9 {
                return Err(ConvexError::InwardNormal { face: i });
            }
        }

        let unique_edges = Self::compute_unique_edges(&vertices, &faces);
        Ok(Self {
            vertices,
            faces,
            unique_edges,
        })
    }

    /// Build an axis-aligned box of the given half-extents, centered at the
    /// origin. Face normals are the six unit axis directions.
    pub fn from_box(half_extents: Vec3) -> Self {
        let (hx, hy, hz) = (half_extents.x, half_extents.y, half_extents.z);
        let vertices = vec![
            Vec3::new(-hx, -hy, -hz),
            Vec3::new(hx, -hy, -hz),
            Vec3::new(hx, hy, -hz),
            Vec3::new(-hx, hy, -hz),
            Vec3::new(-hx, -hy, hz),
            Vec3::new(hx, -hy, hz),
            Vec3::new(hx, hy, hz),
            Vec3::new(-hx, hy, hz),
        ];
        let faces = vec![
            Face {
                vertices: vec![0, 3, 2, 1],
                normal: -Vec3::z(),
            },
            Face {
                vertices: vec![4, 5, 6, 7],
                normal: Vec3::z(),
            },
            Face {
                vertices: vec![0, 1, 5, 4],
                normal: -Vec3::y(),
            },
            Face {
                vertices: vec![2, 3, 7, 6],
                normal: Vec3::y(),
            },
            Face {
                vertices: vec![0, 4, 7, 3],
                normal: -Vec3::x(),
            },
            Face {
                vertices: vec![1, 2, 6, 5],
                normal: Vec3::x(),
            },
        ];
        let unique_edges = Self::compute_unique_edges(&vertices, &faces);
        Self {
            vertices,
            faces,
            unique_edges,
        }
    }

    /// Local-frame vertices
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Faces in stored order
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// De-duplicated local edge directions (unit length, sign arbitrary)
    pub fn unique_edges(&self) -> &[Vec3] {
        &self.unique_edges
    }

    fn compute_unique_edges(vertices: &[Vec3], faces: &[Face]) -> Vec<Vec3> {
        let mut edges: Vec<Vec3> = Vec::new();
        for face in faces {
            let ring = &face.vertices;
            for (i, &vi) in ring.iter().enumerate() {
                let prev = vertices[ring[(i + ring.len() - 1) % ring.len()]];
                let edge = vertices[vi] - prev;
                let len = edge.norm();
                if len < EDGE_EPSILON {
                    continue;
                }
                let dir = edge / len;
                let seen = edges
                    .iter()
                    .any(|known| known.cross(&dir).norm() < EDGE_EPSILON);
                if !seen {
                    edges.push(dir);
                }
            }
        }
        edges
    }

    /// Fold a visitor over the faces in stored order. The visitor receives
    /// the accumulator, the world-space face normal, one world-space vertex
    /// of the face, and the face index.
    pub fn fold_face_normals<T, F>(&self, transform: &Transform, seed: T, mut visitor: F) -> T
    where
        F: FnMut(T, Vec3, Vec3, usize) -> T,
    {
        let mut acc = seed;
        for (index, face) in self.faces.iter().enumerate() {
            let Some(&first) = face.vertices.first() else {
                continue;
            };
            let world_normal = transform.vector_to_world_frame(face.normal);
            let world_vertex = transform.point_to_world_frame(self.vertices[first]);
            acc = visitor(acc, world_normal, world_vertex, index);
        }
        acc
    }

    /// Project every world-space vertex onto `axis` and return the min/max
    /// interval
    fn project_onto(&self, transform: &Transform, axis: &Vec3) -> (f64, f64) {
        let mut min_proj = f64::INFINITY;
        let mut max_proj = f64::NEG_INFINITY;
        for vertex in &self.vertices {
            let projection = transform.point_to_world_frame(*vertex).dot(axis);
            min_proj = min_proj.min(projection);
            max_proj = max_proj.max(projection);
        }
        (min_proj, max_proj)
    }

    /// Search for a separating axis between `self` (hull A) and `other`
    /// (hull B).
    ///
    /// Candidates are A's world face normals, then B's, then the normalized
    /// cross products of A's unique edges with B's (crosses shorter than
    /// `cross_epsilon` are skipped). Returns `None` if any candidate fully
    /// separates the hulls; otherwise the candidate with the smallest
    /// positive overlap, oriented to point from A toward B. Ties keep the
    /// earliest candidate.
    pub fn find_separating_axis(
        &self,
        ta: &Transform,
        other: &Self,
        tb: &Transform,
        cross_epsilon: f64,
    ) -> Option<Vec3> {
        let mut best_axis: Option<Vec3> = None;
        let mut best_overlap = f64::INFINITY;

        let mut consider = |axis: Vec3| -> bool {
            let (min_a, max_a) = self.project_onto(ta, &axis);
            let (min_b, max_b) = other.project_onto(tb, &axis);
            let overlap = (max_a - min_b).min(max_b - min_a);
            if overlap <= 0.0 {
                return false;
            }
            if overlap < best_overlap {
                best_overlap = overlap;
                best_axis = Some(axis);
            }
            true
        };

        for face in &self.faces {
            if !consider(ta.vector_to_world_frame(face.normal)) {
                return None;
            }
        }
        for face in &other.faces {
            if !consider(tb.vector_to_world_frame(face.normal)) {
                return None;
            }
        }
        for edge_a in &self.unique_edges {
            let world_a = ta.vector_to_world_frame(*edge_a);
            for edge_b in &other.unique_edges {
                let world_b = tb.vector_to_world_frame(*edge_b);
                let cross = world_a.cross(&world_b);
                let len = cross.norm();
                if len < cross_epsilon {
                    continue;
                }
                if !consider(cross / len) {
                    return None;
                }
            }
        }

        let mut axis = best_axis?;
        if axis.dot(&(tb.position - ta.position)) < 0.0 {
            axis = -axis;
        }
        Some(axis)
    }

    /// Clip the incident face of `other` (hull B) against the side planes of
    /// `self`'s (hull A's) reference face.
    ///
    /// The incident face is B's face whose outward normal is most
    /// anti-parallel to `sep_axis`; its world-space ring is the polygon
    /// handed to [`clip_face_against_hull`](Self::clip_face_against_hull).
    pub fn clip_against_hull(
        &self,
        ta: &Transform,
        other: &Self,
        tb: &Transform,
        sep_axis: &Vec3,
        min_dist: f64,
        max_dist: f64,
    ) -> Vec<ClippedPoint> {
        let mut incident = None;
        let mut dot_min = f64::INFINITY;
        for (index, face) in other.faces.iter().enumerate() {
            let dot = tb.vector_to_world_frame(face.normal).dot(sep_axis);
            if dot < dot_min {
                dot_min = dot;
                incident = Some(index);
            }
        }
        let Some(incident) = incident else {
            return Vec::new();
        };

        let world_polygon: Polygon = other.faces[incident]
            .vertices
            .iter()
            .map(|&vi| tb.point_to_world_frame(other.vertices[vi]))
            .collect();
        self.clip_face_against_hull(ta, sep_axis, &world_polygon, min_dist, max_dist)
    }

    /// Clip a caller-supplied world-space polygon against the side planes of
    /// this hull's reference face, then filter the survivors by signed
    /// distance to the reference plane.
    ///
    /// The reference face is the one whose outward world normal has the
    /// largest dot with `sep_axis`. The polygon is clipped against the plane
    /// of every face sharing an edge with the reference face
    /// (Sutherland-Hodgman, inside = signed distance <= 0). Survivors with
    /// reference-plane distance in `[min_dist, max_dist]` each yield a
    /// [`ClippedPoint`] projected onto the reference plane.
    pub fn clip_face_against_hull(
        &self,
        ta: &Transform,
        sep_axis: &Vec3,
        world_polygon: &[Vec3],
        min_dist: f64,
        max_dist: f64,
    ) -> Vec<ClippedPoint> {
        let mut reference = None;
        let mut dot_max = f64::NEG_INFINITY;
        for (index, face) in self.faces.iter().enumerate() {
            let dot = ta.vector_to_world_frame(face.normal).dot(sep_axis);
            if dot > dot_max {
                dot_max = dot;
                reference = Some(index);
            }
        }
        let Some(reference) = reference else {
            return Vec::new();
        };
        let ref_face = &self.faces[reference];
        let Some(&ref_first) = ref_face.vertices.first() else {
            return Vec::new();
        };
        let ref_normal = ta.vector_to_world_frame(ref_face.normal);
        let ref_point = ta.point_to_world_frame(self.vertices[ref_first]);

        let mut polygon: Polygon = world_polygon.iter().copied().collect();
        for (index, face) in self.faces.iter().enumerate() {
            if index == reference || !shares_edge(ref_face, face) {
                continue;
            }
            let Some(&first) = face.vertices.first() else {
                continue;
            };
            let plane_normal = ta.vector_to_world_frame(face.normal);
            let plane_point = ta.point_to_world_frame(self.vertices[first]);
            polygon = clip_polygon_against_plane(&polygon, &plane_normal, &plane_point);
            if polygon.is_empty() {
                return Vec::new();
            }
        }

        let mut contacts = Vec::with_capacity(polygon.len());
        for &vertex in &polygon {
            let distance = ref_normal.dot(&(vertex - ref_point));
            if distance >= min_dist && distance <= max_dist {
                contacts.push(ClippedPoint {
                    point: vertex - ref_normal * distance,
                    normal: ref_normal,
                    depth: -distance,
                });
            }
        }
        contacts
    }
}

/// Two faces are adjacent when their rings share an edge, i.e. at least two
/// vertex indices
fn shares_edge(a: &Face, b: &Face) -> bool {
    let mut common = 0;
    for index in &a.vertices {
        if b.vertices.contains(index) {
            common += 1;
            if common >= 2 {
                return true;
            }
        }
    }
    false
}

/// One Sutherland-Hodgman step: keep the part of `polygon` on the inner side
/// of the plane (signed distance <= 0 toward the outward `normal`), inserting
/// edge-plane intersections where edges cross
fn clip_polygon_against_plane(polygon: &Polygon, normal: &Vec3, point_on_plane: &Vec3) -> Polygon {
    let mut out = Polygon::new();
    let Some(&last) = polygon.last() else {
        return out;
    };
    let mut prev = last;
    let mut d_prev = normal.dot(&(prev - point_on_plane));
    for &curr in polygon {
        let d_curr = normal.dot(&(curr - point_on_plane));
        if d_curr <= 0.0 {
            if d_prev > 0.0 {
                out.push(intersect_edge_plane(prev, curr, d_prev, d_curr));
            }
            out.push(curr);
        } else if d_prev <= 0.0 {
            out.push(intersect_edge_plane(prev, curr, d_prev, d_curr));
        }
        prev = curr;
        d_prev = d_curr;
    }
    out
}

/// Point where the segment from `from` to `to` crosses the plane; only valid
/// when the signed distances straddle zero
fn intersect_edge_plane(from: Vec3, to: Vec3, d_from: f64, d_to: f64) -> Vec3 {
    let t = d_from / (d_from - d_to);
    from + (to - from) * t
}
