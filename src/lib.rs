//! Rein collision core
//!
//! Narrowphase collision detection for convex shapes given as vertex sets.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **physics::support** - Minkowski-difference support points
//! 2. **physics::simplex** - Bounded GJK simplex and its reduction rules
//! 3. **physics::gjk** - Boolean intersection test
//! 4. **physics::epa** - Penetration depth and minimum translation vector
//! 5. **physics::narrowphase** - Pair dispatch for the rigid-body step
//! 6. **debug** - Wireframe vertices for editor overlays (feature = "debug-render")

pub mod error;
pub mod physics;

#[cfg(feature = "debug-render")]
pub mod debug;

pub use error::{CollisionError, Result};

pub use physics::{
    collider::{Aabb, Collider, ColliderShape, ShapeCollider},
    contact::{Contact, PairContact},
    epa::{EpaResult, EpaStatus, NormalInfo, Polytope},
    gjk::GjkResult,
    narrowphase::{detect_collision, NarrowPhase},
    simplex::Simplex,
    CollisionConfig,
};

#[cfg(feature = "debug-render")]
pub use debug::{aabb_wireframe, polytope_wireframe, simplex_wireframe, DebugVertex};

// Re-export glam for convenience
pub use glam;
