//! The three-ring transient allocator facade (`spec.md` §4.2).

use bytemuck::Pod;

use crate::hal::{Device, Queue};
use crate::transient::allocation::TransientAllocation;
use crate::transient::ring::{RingKind, TransientRing};
use crate::transient::stats::{RingStats, TransientStats};
use crate::transient::VERTEX_INDEX_ALIGNMENT;

/// Fallback alignment used when a `Device` reports no minimum uniform
/// offset alignment (e.g. a test double), matching the common 256-byte
/// requirement seen across desktop GPU backends.
const DEFAULT_UNIFORM_ALIGNMENT: u64 = 256;

/// Owns one [`TransientRing`] per transient data kind and drives their
/// per-frame rotation. Grounded on
/// `myth::renderer::core::resources::allocator::ModelBufferAllocator`,
/// generalized from a single uniform ring to the spec's vertex/index/uniform
/// trio.
pub struct TransientBufferPool {
    vertex: TransientRing,
    index: TransientRing,
    uniform: TransientRing,
}

impl TransientBufferPool {
    #[must_use]
    pub fn new(
        device: &dyn Device,
        vertex_capacity: u64,
        index_capacity: u64,
        uniform_capacity: u64,
    ) -> Self {
        let uniform_alignment = {
            let reported = device.caps().min_uniform_buffer_offset_alignment;
            if reported == 0 {
                DEFAULT_UNIFORM_ALIGNMENT
            } else {
                reported
            }
        };
        Self {
            vertex: TransientRing::new(RingKind::Vertex, VERTEX_INDEX_ALIGNMENT, vertex_capacity),
            index: TransientRing::new(RingKind::Index, VERTEX_INDEX_ALIGNMENT, index_capacity),
            uniform: TransientRing::new(RingKind::Uniform, uniform_alignment, uniform_capacity),
        }
    }

    /// Rotates every ring to this frame's buffer slot and resets its cursor.
    /// Must be called exactly once per frame, before any `allocate_*` call
    /// (`spec.md` §5, "Ordering guarantees").
    pub fn begin_frame(&mut self, frame_index: u64, device: &dyn Device) {
        self.vertex.begin_frame(frame_index, device);
        self.index.begin_frame(frame_index, device);
        self.uniform.begin_frame(frame_index, device);
    }

    /// Copies `data` into this frame's vertex ring and uploads it through
    /// `queue`. Returns an invalid allocation on overflow; the caller must
    /// not issue a draw referencing it.
    pub fn allocate_vertices<T: Pod>(&mut self, queue: &dyn Queue, data: &[T]) -> TransientAllocation {
        allocate_and_upload(&mut self.vertex, queue, data)
    }

    pub fn allocate_indices<T: Pod>(&mut self, queue: &dyn Queue, data: &[T]) -> TransientAllocation {
        allocate_and_upload(&mut self.index, queue, data)
    }

    pub fn allocate_uniform<T: Pod>(&mut self, queue: &dyn Queue, data: &T) -> TransientAllocation {
        allocate_and_upload(&mut self.uniform, queue, std::slice::from_ref(data))
    }

    /// Like [`Self::allocate_uniform`] but for a structured array (a packed
    /// light array, a GPU light-index list) rather than a single block.
    pub fn allocate_uniform_array<T: Pod>(&mut self, queue: &dyn Queue, data: &[T]) -> TransientAllocation {
        allocate_and_upload(&mut self.uniform, queue, data)
    }

    #[must_use]
    pub fn stats(&self) -> TransientStats {
        TransientStats {
            vertex: ring_stats(&self.vertex),
            index: ring_stats(&self.index),
            uniform: ring_stats(&self.uniform),
        }
    }
}

fn allocate_and_upload<T: Pod>(
    ring: &mut TransientRing,
    queue: &dyn Queue,
    data: &[T],
) -> TransientAllocation {
    let bytes = bytemuck::cast_slice(data);
    let allocation = ring.allocate(bytes.len() as u64);
    if allocation.is_valid() {
        queue.write_buffer(allocation.buffer, allocation.offset, bytes);
    }
    allocation
}

fn ring_stats(ring: &TransientRing) -> RingStats {
    RingStats {
        bytes_used: ring.bytes_used(),
        capacity: ring.capacity(),
        high_water_mark: ring.high_water_mark(),
    }
}
