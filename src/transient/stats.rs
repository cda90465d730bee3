//! Per-frame transient-allocator statistics (`spec.md` §4.2, §8 "FrameStats").

/// Snapshot of one ring's usage for a single frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RingStats {
    pub bytes_used: u64,
    pub capacity: u64,
    pub high_water_mark: u64,
}

/// Usage across all three transient rings, reported once per frame by
/// [`super::TransientBufferPool::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransientStats {
    pub vertex: RingStats,
    pub index: RingStats,
    pub uniform: RingStats,
}
