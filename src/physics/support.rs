//! Support mapping for vertex sets and their Minkowski difference.

use glam::Vec3;

use crate::error::{CollisionError, Result};

use super::collider::Collider;

/// Farthest vertex along `direction`.
///
/// Ties resolve to the first maximal vertex in iteration order.
#[inline]
pub fn support(direction: Vec3, vertices: &[Vec3]) -> Result<Vec3> {
    let (first, rest) = vertices
        .split_first()
        .ok_or(CollisionError::EmptyVertexSet)?;

    let mut best = *first;
    let mut best_dot = best.dot(direction);
    for p in rest {
        let d = p.dot(direction);
        if d > best_dot {
            best_dot = d;
            best = *p;
        }
    }
    Ok(best)
}

/// Support point of the Minkowski difference `A - B` along `direction`.
#[inline]
pub fn minkowski_support(
    direction: Vec3,
    vertices_a: &[Vec3],
    vertices_b: &[Vec3],
) -> Result<Vec3> {
    Ok(support(direction, vertices_a)? - support(-direction, vertices_b)?)
}

/// [`minkowski_support`] over two colliders.
#[inline]
pub fn collider_support<A, B>(direction: Vec3, collider_a: &A, collider_b: &B) -> Result<Vec3>
where
    A: Collider + ?Sized,
    B: Collider + ?Sized,
{
    minkowski_support(direction, collider_a.vertices(), collider_b.vertices())
}
