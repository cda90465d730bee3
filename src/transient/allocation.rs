//! A single sub-allocation from a [`super::TransientRing`].

use crate::hal::BufferId;

/// A sub-region of a per-frame ring buffer, valid only until the end of the
/// frame in which it was allocated (`spec.md` §3, "TransientAllocation").
///
/// An invalid allocation (`buffer.0 == u64::MAX`) signals overflow; the
/// caller must treat it as a frame-wide error, never write through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransientAllocation {
    pub buffer: BufferId,
    pub offset: u64,
    pub size: u64,
}

impl TransientAllocation {
    pub(crate) const INVALID: Self = Self {
        buffer: BufferId(u64::MAX),
        offset: 0,
        size: 0,
    };

    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.buffer != BufferId(u64::MAX)
    }
}
