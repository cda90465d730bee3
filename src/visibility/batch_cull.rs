//! Bulk AABB-array culling for large instance counts (`spec.md` §4.5,
//! "BatchCuller").

use glam::Mat4;

use crate::mesh::bounds::Aabb;
use crate::visibility::frustum::{AabbTest, FrustumCuller};

/// Culls a slice of AABBs against a single view-projection in one pass,
/// returning a bitset of visible indices. Used where per-object visibility
/// bookkeeping (view masks, depth) is unnecessary overhead — e.g. particle
/// systems or instanced foliage with thousands of entries.
pub struct BatchCuller {
    frustum: FrustumCuller,
}

impl BatchCuller {
    #[must_use]
    pub fn new(view_projection: Mat4) -> Self {
        Self {
            frustum: FrustumCuller::from_view_projection(view_projection),
        }
    }

    /// Returns one bit per input AABB, set iff it is not entirely outside
    /// the frustum.
    #[must_use]
    pub fn cull(&self, aabbs: &[Aabb]) -> Vec<bool> {
        aabbs
            .iter()
            .map(|aabb| self.frustum.test_aabb(aabb) != AabbTest::Outside)
            .collect()
    }

    /// Like [`Self::cull`] but returns only the indices that survived.
    #[must_use]
    pub fn cull_indices(&self, aabbs: &[Aabb]) -> Vec<u32> {
        aabbs
            .iter()
            .enumerate()
            .filter(|(_, aabb)| self.frustum.test_aabb(aabb) != AabbTest::Outside)
            .map(|(i, _)| i as u32)
            .collect()
    }
}
