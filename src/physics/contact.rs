//! Contact data handed to the rigid-body solver.

use glam::Vec3;

use super::epa::{EpaResult, EpaStatus};

/// Penetration between two convex colliders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Contact normal (from collider A to collider B).
    pub normal: Vec3,
    /// Penetration depth.
    pub depth: f32,
    /// Minimum translation vector: move B by `mtv`, or A by `-mtv`.
    pub mtv: Vec3,
    /// Whether EPA converged or returned an estimate.
    pub status: EpaStatus,
    pub gjk_iterations: usize,
    pub epa_iterations: usize,
}

impl Contact {
    pub(crate) fn new(epa: EpaResult, gjk_iterations: usize) -> Self {
        Self {
            normal: epa.normal,
            depth: epa.depth,
            mtv: epa.mtv,
            status: epa.status,
            gjk_iterations,
            epa_iterations: epa.iterations,
        }
    }

    /// Low-confidence contacts come from a capped or stalled EPA run.
    pub fn is_converged(&self) -> bool {
        self.status == EpaStatus::Converged
    }
}

/// A contact between two colliders of a batch, identified by index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairContact {
    pub pair: (usize, usize),
    pub contact: Contact,
}
