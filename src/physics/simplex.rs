//! Bounded point set used as GJK's working approximation of `A - B`.

use std::ops::Index;

use glam::Vec3;

/// Maximum number of points a 3D simplex can hold (a tetrahedron).
pub const MAX_SIMPLEX_POINTS: usize = 4;

/// Up to four points, newest first.
///
/// `simplex[0]` is always the most recently added support point; the
/// reduction routines depend on that ordering. Pushing onto a full simplex
/// drops the oldest point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simplex {
    points: [Vec3; MAX_SIMPLEX_POINTS],
    len: usize,
}

impl Default for Simplex {
    fn default() -> Self {
        Self::new()
    }
}

impl Simplex {
    pub const fn new() -> Self {
        Self {
            points: [Vec3::ZERO; MAX_SIMPLEX_POINTS],
            len: 0,
        }
    }

    /// Prepend `point`, shifting older points toward eviction.
    pub fn push(&mut self, point: Vec3) {
        self.points.copy_within(0..MAX_SIMPLEX_POINTS - 1, 1);
        self.points[0] = point;
        self.len = (self.len + 1).min(MAX_SIMPLEX_POINTS);
    }

    /// Replace the whole point set, newest first.
    pub fn reassign<const N: usize>(&mut self, points: [Vec3; N]) {
        const { assert!(N <= MAX_SIMPLEX_POINTS) };
        self.points[..N].copy_from_slice(&points);
        self.len = N;
    }

    /// Number of retained points, 0..=4.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Retained points, newest first.
    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points[..self.len]
    }

    /// Retained points in the order they were inserted (oldest first).
    pub fn to_point_list(&self) -> Vec<Vec3> {
        self.points().iter().rev().copied().collect()
    }
}

impl Index<usize> for Simplex {
    type Output = Vec3;

    fn index(&self, index: usize) -> &Vec3 {
        &self.points()[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_prepends() {
        let mut simplex = Simplex::new();
        assert!(simplex.is_empty());

        simplex.push(Vec3::X);
        simplex.push(Vec3::Y);
        assert_eq!(simplex.len(), 2);
        assert_eq!(simplex[0], Vec3::Y);
        assert_eq!(simplex[1], Vec3::X);
    }

    #[test]
    fn test_push_beyond_capacity_drops_oldest() {
        let mut simplex = Simplex::new();
        for i in 0..6 {
            simplex.push(Vec3::splat(i as f32));
        }
        assert_eq!(simplex.len(), MAX_SIMPLEX_POINTS);
        assert_eq!(simplex[0], Vec3::splat(5.0));
        assert_eq!(simplex[3], Vec3::splat(2.0));
    }

    #[test]
    fn test_reassign_shrinks() {
        let mut simplex = Simplex::new();
        simplex.push(Vec3::X);
        simplex.push(Vec3::Y);
        simplex.push(Vec3::Z);

        simplex.reassign([Vec3::Z, Vec3::X]);
        assert_eq!(simplex.len(), 2);
        assert_eq!(simplex.points(), &[Vec3::Z, Vec3::X]);

        // A later push still only sees the reassigned points
        simplex.push(Vec3::ONE);
        assert_eq!(simplex.points(), &[Vec3::ONE, Vec3::Z, Vec3::X]);
    }

    #[test]
    fn test_to_point_list_is_insertion_order() {
        let mut simplex = Simplex::new();
        simplex.push(Vec3::X);
        simplex.push(Vec3::Y);
        simplex.push(Vec3::Z);
        assert_eq!(simplex.to_point_list(), vec![Vec3::X, Vec3::Y, Vec3::Z]);
    }

    #[test]
    #[should_panic]
    fn test_index_past_len_panics() {
        let mut simplex = Simplex::new();
        simplex.push(Vec3::X);
        let _ = simplex[1];
    }
}
