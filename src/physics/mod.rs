//! CPU narrowphase for convex colliders.
//!
//! # Architecture
//!
//! A single pair query runs in two stages:
//!
//! 1. GJK grows a simplex inside the Minkowski difference `A - B` until it
//!    either finds a separating direction or encloses the origin
//! 2. EPA expands the enclosing tetrahedron face by face until the closest
//!    face stops moving, yielding the penetration depth and the minimum
//!    translation vector
//!
//! All state is local to one query, so disjoint pairs may be processed on
//! separate threads.

pub mod collider;
pub mod contact;
pub mod epa;
pub mod gjk;
pub mod narrowphase;
pub mod simplex;
pub mod support;

/// Default iteration cap for GJK. Exceeding it is a hard error.
pub const DEFAULT_GJK_MAX_ITERATIONS: usize = 100;

/// Default iteration cap for EPA. Exceeding it yields a low-confidence result.
pub const DEFAULT_EPA_MAX_ITERATIONS: usize = 100;

/// Default EPA convergence threshold, in shape units.
pub const DEFAULT_EPA_TOLERANCE: f32 = 0.1;

/// Tunables for GJK/EPA queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionConfig {
    /// Maximum GJK iterations. Default: 100.
    pub gjk_max_iterations: usize,
    /// Maximum EPA expansion steps. Default: 100.
    pub epa_max_iterations: usize,
    /// EPA stops once the support distance along the closest face normal is
    /// within this distance of the face itself. Default: 0.1.
    pub epa_tolerance: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            gjk_max_iterations: DEFAULT_GJK_MAX_ITERATIONS,
            epa_max_iterations: DEFAULT_EPA_MAX_ITERATIONS,
            epa_tolerance: DEFAULT_EPA_TOLERANCE,
        }
    }
}
