//! Error types for collision queries.

use thiserror::Error;

/// Errors surfaced by the narrowphase.
///
/// EPA running out of iterations is not an error; see
/// [`EpaStatus`](crate::physics::epa::EpaStatus).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CollisionError {
    /// A support query was made against a shape with no vertices.
    #[error("support function called with an empty vertex set")]
    EmptyVertexSet,

    /// GJK hit its iteration cap without finding a separating axis or an
    /// enclosing tetrahedron. The pair should be skipped for this step.
    #[error("GJK did not converge within {iterations} iterations")]
    GjkDidNotConverge { iterations: usize },

    /// EPA was seeded with something other than a tetrahedron.
    #[error("EPA requires a 4-point simplex, got {points} points")]
    InvalidSimplex { points: usize },

    /// Every face of the EPA polytope collapsed to zero area.
    #[error("EPA polytope has no non-degenerate faces")]
    DegeneratePolytope,
}

pub type Result<T> = std::result::Result<T, CollisionError>;
