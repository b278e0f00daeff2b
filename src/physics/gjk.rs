//! GJK intersection test and the per-arity simplex reduction routines.

use glam::Vec3;
use tracing::{debug, trace};

use crate::error::{CollisionError, Result};

use super::collider::Collider;
use super::simplex::Simplex;
use super::support::collider_support;
use super::CollisionConfig;

/// Initial search direction. Any non-zero vector works.
const INITIAL_DIRECTION: Vec3 = Vec3::X;

/// Squared length below which a search direction counts as vanished.
const DIRECTION_EPSILON: f32 = 1e-12;

/// Outcome of one GJK query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GjkResult {
    pub intersecting: bool,
    /// Terminal simplex. A tetrahedron enclosing the origin when
    /// `intersecting` is true.
    pub simplex: Simplex,
    pub iterations: usize,
}

/// What a reduction step decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reduction {
    /// Keep searching along this direction.
    Continue(Vec3),
    /// The tetrahedron contains the origin.
    Enclosed,
}

/// GJK with the default configuration.
pub fn intersects<A, B>(collider_a: &A, collider_b: &B) -> Result<GjkResult>
where
    A: Collider + ?Sized,
    B: Collider + ?Sized,
{
    intersects_with_config(collider_a, collider_b, &CollisionConfig::default())
}

/// Test whether two convex colliders overlap.
///
/// Touching shapes (origin on the boundary of `A - B`) may be reported
/// either way; [`detect_collision`](super::narrowphase::detect_collision)
/// filters zero-depth results. Running out of iterations is an error rather
/// than a guess.
pub fn intersects_with_config<A, B>(
    collider_a: &A,
    collider_b: &B,
    config: &CollisionConfig,
) -> Result<GjkResult>
where
    A: Collider + ?Sized,
    B: Collider + ?Sized,
{
    let mut simplex = Simplex::new();

    let first = collider_support(INITIAL_DIRECTION, collider_a, collider_b)?;
    simplex.push(first);
    let mut direction = -first;

    for iteration in 1..=config.gjk_max_iterations {
        let point = collider_support(direction, collider_a, collider_b)?;
        if point.dot(direction) <= 0.0 {
            trace!(iteration, ?direction, "gjk: separating axis found");
            return Ok(GjkResult {
                intersecting: false,
                simplex,
                iterations: iteration,
            });
        }
        simplex.push(point);

        match reduce(&mut simplex) {
            Reduction::Enclosed => {
                debug!(iteration, "gjk: origin enclosed");
                return Ok(GjkResult {
                    intersecting: true,
                    simplex,
                    iterations: iteration,
                });
            }
            Reduction::Continue(next) => {
                trace!(iteration, points = simplex.len(), ?next, "gjk: reduced");
                direction = next;
            }
        }
    }

    Err(CollisionError::GjkDidNotConverge {
        iterations: config.gjk_max_iterations,
    })
}

/// Dispatch to the reduction routine for the simplex's arity.
pub fn reduce(simplex: &mut Simplex) -> Reduction {
    match simplex.len() {
        2 => Reduction::Continue(reduce_line(simplex)),
        3 => Reduction::Continue(reduce_triangle(simplex)),
        4 => reduce_tetrahedron(simplex),
        // A single point: search back toward the origin
        1 => Reduction::Continue(-simplex[0]),
        _ => Reduction::Continue(INITIAL_DIRECTION),
    }
}

/// Triple cross product: (a x b) x c
#[inline]
fn triple_cross_product(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    a.cross(b).cross(c)
}

/// Direction perpendicular to `ab`, toward the origin.
///
/// Falls back to an arbitrary perpendicular when the origin lies on the
/// line through `ab`.
#[inline]
fn toward_origin_from_edge(ab: Vec3, ao: Vec3) -> Vec3 {
    let direction = triple_cross_product(ab, ao, ab);
    if direction.length_squared() > DIRECTION_EPSILON {
        direction
    } else {
        ab.any_orthogonal_vector()
    }
}

/// Segment case. `simplex[0]` is the newest point `a`.
pub fn reduce_line(simplex: &mut Simplex) -> Vec3 {
    debug_assert_eq!(simplex.len(), 2);
    let a = simplex[0];
    let b = simplex[1];
    let ab = b - a;
    let ao = -a;

    if ab.dot(ao) > 0.0 {
        toward_origin_from_edge(ab, ao)
    } else {
        // Origin is in the vertex region of `a`
        simplex.reassign([a]);
        ao
    }
}

/// Triangle case. `simplex[0]` is the newest point `a`.
pub fn reduce_triangle(simplex: &mut Simplex) -> Vec3 {
    debug_assert_eq!(simplex.len(), 3);
    let a = simplex[0];
    let b = simplex[1];
    let c = simplex[2];
    let ab = b - a;
    let ac = c - a;
    let ao = -a;
    let abc = ab.cross(ac);

    if abc.length_squared() <= DIRECTION_EPSILON {
        // Collinear points carry no more information than an edge
        simplex.reassign([a, b]);
        return reduce_line(simplex);
    }

    if abc.cross(ac).dot(ao) > 0.0 {
        if ac.dot(ao) > 0.0 {
            simplex.reassign([a, c]);
            toward_origin_from_edge(ac, ao)
        } else {
            simplex.reassign([a, b]);
            reduce_line(simplex)
        }
    } else if ab.cross(abc).dot(ao) > 0.0 {
        simplex.reassign([a, b]);
        reduce_line(simplex)
    } else if abc.dot(ao) > 0.0 {
        abc
    } else {
        // Origin below the face: flip winding so the next tetrahedron's
        // faces around `a` keep pointing outward
        simplex.reassign([a, c, b]);
        -abc
    }
}

/// Tetrahedron case. `simplex[0]` is the newest point `a`.
pub fn reduce_tetrahedron(simplex: &mut Simplex) -> Reduction {
    debug_assert_eq!(simplex.len(), 4);
    let a = simplex[0];
    let b = simplex[1];
    let c = simplex[2];
    let d = simplex[3];
    let ab = b - a;
    let ac = c - a;
    let ad = d - a;
    let ao = -a;

    let abc = ab.cross(ac);
    let acd = ac.cross(ad);
    let adb = ad.cross(ab);

    if abc.dot(ao) > 0.0 {
        simplex.reassign([a, b, c]);
        return Reduction::Continue(reduce_triangle(simplex));
    }
    if acd.dot(ao) > 0.0 {
        simplex.reassign([a, c, d]);
        return Reduction::Continue(reduce_triangle(simplex));
    }
    if adb.dot(ao) > 0.0 {
        simplex.reassign([a, d, b]);
        return Reduction::Continue(reduce_triangle(simplex));
    }

    Reduction::Enclosed
}
