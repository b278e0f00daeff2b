//! EPA: penetration depth and minimum translation vector from a GJK
//! tetrahedron.

use std::collections::HashMap;

use glam::Vec3;
use tracing::{debug, trace, warn};

use crate::error::{CollisionError, Result};

use super::collider::Collider;
use super::simplex::{Simplex, MAX_SIMPLEX_POINTS};
use super::support::collider_support;
use super::CollisionConfig;

/// Faces of the seed tetrahedron, as indices into the simplex points.
pub const TETRAHEDRON_FACES: [[usize; 3]; 4] = [[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]];

/// Faces with a cross product shorter than this have no usable normal.
const DEGENERATE_FACE_EPSILON: f32 = 1e-10;

/// Support points this close (squared) to an existing vertex add nothing.
const DUPLICATE_VERTEX_EPSILON: f32 = 1e-12;

/// How an EPA run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpaStatus {
    /// The closest face stopped moving within the tolerance.
    Converged,
    /// Iteration cap reached; the result is the best estimate so far.
    Capped,
    /// The polytope could not grow any further before converging.
    Stalled,
}

/// Result of resolving a penetration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpaResult {
    /// Translate B by this vector (or A by its negation) to separate them.
    pub mtv: Vec3,
    /// Unit contact normal, from A toward B.
    pub normal: Vec3,
    /// Penetration depth, `mtv.length()`.
    pub depth: f32,
    pub status: EpaStatus,
    pub iterations: usize,
}

impl EpaResult {
    fn from_normals(info: &NormalInfo, status: EpaStatus, iterations: usize) -> Self {
        Self {
            mtv: info.normal * info.distance,
            normal: info.normal,
            depth: info.distance,
            status,
            iterations,
        }
    }

    /// Whether the result can be trusted to the configured tolerance.
    pub fn is_converged(&self) -> bool {
        self.status == EpaStatus::Converged
    }
}

/// Per-iteration face analysis of a [`Polytope`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalInfo {
    /// Outward unit normal of the face closest to the origin.
    pub normal: Vec3,
    /// Vertex indices of the closest face.
    pub face: [usize; 3],
    pub face_index: usize,
    /// Signed distance of the closest face from the origin.
    pub distance: f32,
    /// Outward unit normal of every face, parallel to [`Polytope::faces`].
    /// Degenerate faces get [`Vec3::ZERO`].
    pub normals: Vec<Vec3>,
}

/// Convex polytope grown by EPA inside the Minkowski difference.
#[derive(Debug, Clone, PartialEq)]
pub struct Polytope {
    vertices: Vec<Vec3>,
    faces: Vec<[usize; 3]>,
}

impl Polytope {
    /// Seed a tetrahedron from a terminal GJK simplex.
    pub fn from_simplex(simplex: &Simplex) -> Result<Self> {
        if simplex.len() != MAX_SIMPLEX_POINTS {
            return Err(CollisionError::InvalidSimplex {
                points: simplex.len(),
            });
        }
        Ok(Self {
            vertices: simplex.to_point_list(),
            faces: TETRAHEDRON_FACES.to_vec(),
        })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Mean of all vertices; always inside a convex polytope.
    pub fn centroid(&self) -> Vec3 {
        if self.vertices.is_empty() {
            return Vec3::ZERO;
        }
        self.vertices.iter().copied().sum::<Vec3>() / self.vertices.len() as f32
    }

    /// Compute every face normal and find the face closest to the origin.
    ///
    /// Faces whose winding points toward the centroid are re-wound in place,
    /// so normals are always outward afterwards.
    pub fn face_normals(&mut self) -> Result<NormalInfo> {
        let centroid = self.centroid();
        let mut normals = Vec::with_capacity(self.faces.len());
        let mut closest: Option<(usize, f32)> = None;

        for (i, face) in self.faces.iter_mut().enumerate() {
            let a = self.vertices[face[0]];
            let b = self.vertices[face[1]];
            let c = self.vertices[face[2]];
            let normal = (b - a).cross(c - a);
            let len = normal.length();
            if len < DEGENERATE_FACE_EPSILON {
                normals.push(Vec3::ZERO);
                continue;
            }
            let mut normal = normal / len;

            if normal.dot(a - centroid) < 0.0 {
                face.swap(1, 2);
                normal = -normal;
            }

            let distance = normal.dot(a);
            if closest.map_or(true, |(_, best)| distance < best) {
                closest = Some((i, distance));
            }
            normals.push(normal);
        }

        let (face_index, distance) = closest.ok_or(CollisionError::DegeneratePolytope)?;
        Ok(NormalInfo {
            normal: normals[face_index],
            face: self.faces[face_index],
            face_index,
            distance,
            normals,
        })
    }

    /// Add `support` as a vertex, replacing every face that can see it.
    ///
    /// `normals` must come from [`Polytope::face_normals`] on the current
    /// faces. Returns false when the point adds nothing.
    pub fn expand(&mut self, support: Vec3, normals: &[Vec3]) -> bool {
        debug_assert_eq!(normals.len(), self.faces.len());

        if self
            .vertices
            .iter()
            .any(|v| v.distance_squared(support) <= DUPLICATE_VERTEX_EPSILON)
        {
            return false;
        }

        let mut edges = EdgeCounter::default();
        let mut kept = Vec::with_capacity(self.faces.len() + 4);
        for (face, normal) in self.faces.iter().zip(normals) {
            if normal.dot(support - self.vertices[face[0]]) > 0.0 {
                edges.add(face[0], face[1]);
                edges.add(face[1], face[2]);
                edges.add(face[2], face[0]);
            } else {
                kept.push(*face);
            }
        }

        let horizon: Vec<[usize; 2]> = edges.boundary().collect();
        if horizon.is_empty() {
            return false;
        }

        let new_index = self.vertices.len();
        self.vertices.push(support);
        kept.extend(horizon.iter().map(|[i, j]| [*i, *j, new_index]));
        self.faces = kept;
        true
    }
}

/// Undirected edge multiset over the faces removed in one expansion.
///
/// Edges shared by two removed faces are interior to the hole and cancel;
/// edges seen once form its boundary.
#[derive(Debug, Default)]
struct EdgeCounter {
    order: Vec<[usize; 2]>,
    counts: HashMap<[usize; 2], u32>,
}

impl EdgeCounter {
    fn key(a: usize, b: usize) -> [usize; 2] {
        if a < b {
            [a, b]
        } else {
            [b, a]
        }
    }

    fn add(&mut self, a: usize, b: usize) {
        let count = self.counts.entry(Self::key(a, b)).or_insert(0);
        if *count == 0 {
            self.order.push([a, b]);
        }
        *count += 1;
    }

    /// Boundary edges in first-seen order, with their original winding.
    fn boundary(&self) -> impl Iterator<Item = [usize; 2]> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|[a, b]| self.counts.get(&Self::key(*a, *b)) == Some(&1))
    }
}

/// EPA with the default configuration.
pub fn resolve<A, B>(simplex: &Simplex, collider_a: &A, collider_b: &B) -> Result<EpaResult>
where
    A: Collider + ?Sized,
    B: Collider + ?Sized,
{
    resolve_with_config(simplex, collider_a, collider_b, &CollisionConfig::default())
}

/// Resolve the penetration of two colliders GJK found intersecting.
pub fn resolve_with_config<A, B>(
    simplex: &Simplex,
    collider_a: &A,
    collider_b: &B,
    config: &CollisionConfig,
) -> Result<EpaResult>
where
    A: Collider + ?Sized,
    B: Collider + ?Sized,
{
    resolve_with_polytope(simplex, collider_a, collider_b, config).map(|(result, _)| result)
}

/// Like [`resolve_with_config`], also handing back the final polytope for
/// debug overlays.
pub fn resolve_with_polytope<A, B>(
    simplex: &Simplex,
    collider_a: &A,
    collider_b: &B,
    config: &CollisionConfig,
) -> Result<(EpaResult, Polytope)>
where
    A: Collider + ?Sized,
    B: Collider + ?Sized,
{
    let mut polytope = Polytope::from_simplex(simplex)?;

    for iteration in 1..=config.epa_max_iterations {
        let info = polytope.face_normals()?;
        let support = collider_support(info.normal, collider_a, collider_b)?;
        let support_distance = support.dot(info.normal);

        if (support_distance - info.distance).abs() < config.epa_tolerance {
            debug!(iteration, depth = info.distance, "epa: converged");
            let result = EpaResult::from_normals(&info, EpaStatus::Converged, iteration);
            return Ok((result, polytope));
        }

        if !polytope.expand(support, &info.normals) {
            warn!(
                iteration,
                depth = info.distance,
                "epa: polytope stopped growing before converging"
            );
            let result = EpaResult::from_normals(&info, EpaStatus::Stalled, iteration);
            return Ok((result, polytope));
        }

        trace!(
            iteration,
            faces = polytope.faces().len(),
            gap = support_distance - info.distance,
            "epa: expanded"
        );
    }

    let info = polytope.face_normals()?;
    warn!(
        iterations = config.epa_max_iterations,
        depth = info.distance,
        "epa: iteration cap reached, returning best estimate"
    );
    let result = EpaResult::from_normals(&info, EpaStatus::Capped, config.epa_max_iterations);
    Ok((result, polytope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collider::{ColliderShape, ShapeCollider};
    use crate::physics::gjk::intersects;

    fn unit_box(center: Vec3) -> ShapeCollider {
        ShapeCollider::at(ColliderShape::cuboid(Vec3::splat(0.5)), center)
    }

    fn gjk_simplex(a: &ShapeCollider, b: &ShapeCollider) -> Simplex {
        let result = intersects(a, b).unwrap();
        assert!(result.intersecting);
        result.simplex
    }

    fn tetrahedron(points: [Vec3; 4]) -> Simplex {
        let mut simplex = Simplex::new();
        for p in points {
            simplex.push(p);
        }
        simplex
    }

    /// Every directed edge must be matched by its reverse exactly once, and
    /// every face must point away from the centroid.
    fn assert_closed_and_outward(polytope: &mut Polytope) {
        let info = polytope.face_normals().unwrap();
        let centroid = polytope.centroid();

        let mut directed: HashMap<[usize; 2], u32> = HashMap::new();
        for face in polytope.faces() {
            for (i, j) in [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])] {
                *directed.entry([i, j]).or_insert(0) += 1;
            }
        }
        for ([i, j], count) in &directed {
            assert_eq!(*count, 1, "edge {i}->{j} used twice");
            assert_eq!(directed.get(&[*j, *i]), Some(&1), "edge {i}->{j} unmatched");
        }

        for (face, normal) in polytope.faces().iter().zip(&info.normals) {
            if *normal == Vec3::ZERO {
                continue;
            }
            let a = polytope.vertices()[face[0]];
            assert!(normal.dot(a - centroid) >= 0.0, "inward face {face:?}");
        }
    }

    #[test]
    fn test_seed_requires_tetrahedron() {
        let mut simplex = Simplex::new();
        simplex.push(Vec3::X);
        simplex.push(Vec3::Y);
        assert_eq!(
            Polytope::from_simplex(&simplex),
            Err(CollisionError::InvalidSimplex { points: 2 })
        );
    }

    #[test]
    fn test_seed_winding_is_corrected() {
        // Swapping two points winds every fixed face inward
        let points = [
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(0.0, -1.0, -1.0),
        ];
        let mut swapped = points;
        swapped.swap(1, 2);

        for seed in [points, swapped] {
            let mut polytope = Polytope::from_simplex(&tetrahedron(seed)).unwrap();
            let info = polytope.face_normals().unwrap();
            assert_eq!(info.normals.len(), 4);
            // Origin is inside, so every outward face sits at a positive distance
            for (face, normal) in polytope.faces().iter().zip(&info.normals) {
                assert!(normal.dot(polytope.vertices()[face[0]]) > 0.0);
            }
            assert_closed_and_outward(&mut polytope);
        }
    }

    #[test]
    fn test_rewound_faces_stay_outward_on_recompute() {
        let mut polytope = Polytope::from_simplex(&tetrahedron([
            Vec3::new(0.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]))
        .unwrap();
        let first = polytope.face_normals().unwrap();
        let second = polytope.face_normals().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_expand_replaces_visible_face() {
        let mut polytope = Polytope::from_simplex(&tetrahedron([
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(0.0, -1.0, -1.0),
        ]))
        .unwrap();
        let info = polytope.face_normals().unwrap();

        // Straight below the bottom face only
        assert!(polytope.expand(Vec3::new(0.0, -3.0, 0.2), &info.normals));
        assert_eq!(polytope.vertices().len(), 5);
        assert_eq!(polytope.faces().len(), 6);
        assert_closed_and_outward(&mut polytope);
    }

    #[test]
    fn test_expand_across_several_faces() {
        let mut polytope = Polytope::from_simplex(&tetrahedron([
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(0.0, -1.0, -1.0),
        ]))
        .unwrap();
        let info = polytope.face_normals().unwrap();

        // Sees both the bottom face and the +x side face; their shared edge
        // must cancel
        assert!(polytope.expand(Vec3::new(6.0, -4.0, 0.1), &info.normals));
        assert_eq!(polytope.faces().len(), 6);
        assert_closed_and_outward(&mut polytope);
    }

    #[test]
    fn test_expand_rejects_existing_vertex() {
        let mut polytope = Polytope::from_simplex(&tetrahedron([
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(0.0, -1.0, -1.0),
        ]))
        .unwrap();
        let info = polytope.face_normals().unwrap();
        let before = polytope.clone();
        assert!(!polytope.expand(Vec3::new(0.0, 1.0, 0.0), &info.normals));
        assert_eq!(polytope, before);
    }

    #[test]
    fn test_box_overlap_half_unit_along_x() {
        let a = unit_box(Vec3::ZERO);
        let b = unit_box(Vec3::new(0.5, 0.0, 0.0));
        let simplex = gjk_simplex(&a, &b);
        let result = resolve(&simplex, &a, &b).unwrap();

        assert!(result.is_converged());
        assert!((result.depth - 0.5).abs() <= 0.1 + 1e-4, "depth {}", result.depth);
        assert!(result.mtv.x > 0.0);
        assert!((result.mtv - Vec3::new(0.5, 0.0, 0.0)).length() < 0.2);
        assert!((result.mtv.length() - result.depth).abs() < 1e-5);
        assert!((result.normal.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_box_overlap_point_three_along_each_axis() {
        let a = unit_box(Vec3::ZERO);
        for axis in [Vec3::X, Vec3::Y, Vec3::Z, -Vec3::X, -Vec3::Y, -Vec3::Z] {
            let b = unit_box(axis * 0.7);
            let simplex = gjk_simplex(&a, &b);
            let result = resolve(&simplex, &a, &b).unwrap();

            assert!(
                (result.depth - 0.3).abs() <= 0.1 + 1e-4,
                "axis {axis:?}: depth {}",
                result.depth
            );
            assert!(
                result.normal.dot(axis) > 0.95,
                "axis {axis:?}: normal {:?}",
                result.normal
            );
        }
    }

    #[test]
    fn test_mtv_separates_shapes() {
        let config = CollisionConfig::default();
        let a = unit_box(Vec3::ZERO);
        for offset in [
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(0.0, -0.6, 0.0),
            Vec3::new(0.3, 0.2, 0.1),
        ] {
            let mut b = unit_box(offset);
            let simplex = gjk_simplex(&a, &b);
            let result = resolve_with_config(&simplex, &a, &b, &config).unwrap();

            // Convergence slack plus a small gap
            b.translate(result.mtv + result.normal * (config.epa_tolerance + 0.01));
            assert!(
                !intersects(&a, &b).unwrap().intersecting,
                "offset {offset:?} still intersecting after mtv {:?}",
                result.mtv
            );
        }
    }

    #[test]
    fn test_final_polytope_faces_point_outward() {
        let a = ShapeCollider::at(ColliderShape::sphere(1.0), Vec3::ZERO);
        let b = ShapeCollider::at(
            ColliderShape::cuboid(Vec3::new(0.5, 0.8, 0.3)),
            Vec3::new(0.9, 0.3, -0.2),
        );
        let simplex = gjk_simplex(&a, &b);
        let (result, mut polytope) =
            resolve_with_polytope(&simplex, &a, &b, &CollisionConfig::default()).unwrap();

        assert!(result.depth >= 0.0);
        assert!(result.normal.dot(Vec3::new(0.9, 0.3, -0.2)) > 0.0);
        assert_closed_and_outward(&mut polytope);
    }

    #[test]
    fn test_coincident_boxes_bounded() {
        let a = unit_box(Vec3::ZERO);
        let b = unit_box(Vec3::ZERO);
        let simplex = gjk_simplex(&a, &b);
        let result = resolve(&simplex, &a, &b).unwrap();

        assert!(result.mtv.is_finite());
        assert!(result.depth >= 0.0);
        assert!(result.depth <= 1.0 + 1e-4, "depth {}", result.depth);
    }

    #[test]
    fn test_iteration_cap_returns_estimate() {
        let a = ShapeCollider::at(ColliderShape::sphere(1.0), Vec3::ZERO);
        let b = ShapeCollider::at(ColliderShape::sphere(1.0), Vec3::new(0.5, 0.2, 0.1));
        let simplex = gjk_simplex(&a, &b);
        let config = CollisionConfig {
            epa_max_iterations: 0,
            ..CollisionConfig::default()
        };
        let result = resolve_with_config(&simplex, &a, &b, &config).unwrap();

        assert_eq!(result.status, EpaStatus::Capped);
        assert!(!result.is_converged());
        assert!(result.mtv.is_finite());
        assert!(result.depth <= 2.0);
    }
}
