//! Narrowphase dispatch: GJK, then EPA for intersecting pairs.

use tracing::{trace, warn};

use crate::error::Result;

use super::collider::Collider;
use super::contact::{Contact, PairContact};
use super::epa::resolve_with_config;
use super::gjk::intersects_with_config;
use super::CollisionConfig;

/// Contacts this shallow or shallower count as touching, not penetrating.
pub const TOUCHING_DEPTH_EPSILON: f32 = 1e-6;

/// Detect penetration between two colliders.
///
/// Returns `Ok(None)` for separated or merely touching shapes, whichever
/// way GJK classified the touch.
pub fn detect_collision<A, B>(
    collider_a: &A,
    collider_b: &B,
    config: &CollisionConfig,
) -> Result<Option<Contact>>
where
    A: Collider + ?Sized,
    B: Collider + ?Sized,
{
    let gjk = intersects_with_config(collider_a, collider_b, config)?;
    if !gjk.intersecting {
        return Ok(None);
    }

    let epa = resolve_with_config(&gjk.simplex, collider_a, collider_b, config)?;
    if epa.depth <= TOUCHING_DEPTH_EPSILON {
        trace!(depth = epa.depth, "narrowphase: touching, no penetration");
        return Ok(None);
    }
    Ok(Some(Contact::new(epa, gjk.iterations)))
}

/// Batch narrowphase over candidate pairs from the broadphase.
#[derive(Debug, Clone, Default)]
pub struct NarrowPhase {
    config: CollisionConfig,
}

impl NarrowPhase {
    pub fn new(config: CollisionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Collide every `(i, j)` pair of `colliders`.
    ///
    /// Pairs whose bounds do not overlap are skipped without running GJK.
    /// A pair whose query fails is logged and dropped for this step; the
    /// rest of the batch still runs. Out-of-range indices are skipped.
    pub fn find_contacts<C>(&self, colliders: &[C], pairs: &[(usize, usize)]) -> Vec<PairContact>
    where
        C: Collider,
    {
        let mut contacts = Vec::new();

        for &(i, j) in pairs {
            let (Some(collider_a), Some(collider_b)) = (colliders.get(i), colliders.get(j)) else {
                warn!(a = i, b = j, "narrowphase: pair index out of range");
                continue;
            };

            if !collider_a.aabb().overlaps(&collider_b.aabb()) {
                continue;
            }

            match detect_collision(collider_a, collider_b, &self.config) {
                Ok(Some(contact)) => {
                    if !contact.is_converged() {
                        warn!(
                            a = i,
                            b = j,
                            status = ?contact.status,
                            depth = contact.depth,
                            "narrowphase: low-confidence contact"
                        );
                    }
                    contacts.push(PairContact {
                        pair: (i, j),
                        contact,
                    });
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(a = i, b = j, %err, "narrowphase: skipping pair this step");
                }
            }
        }

        contacts
    }
}
