//! A single ring allocator backing one kind of transient data.

use crate::hal::{BufferId, BufferUsage, Device};
use crate::pool::N_FRAMES_IN_FLIGHT;
use crate::transient::allocation::TransientAllocation;

/// Which transient stream a [`TransientRing`] serves. Determines the
/// required alignment and the `BufferUsage` flags of its backing buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingKind {
    Vertex,
    Index,
    Uniform,
}

impl RingKind {
    fn buffer_usage(self) -> BufferUsage {
        match self {
            RingKind::Vertex => BufferUsage::VERTEX | BufferUsage::COPY_DST,
            RingKind::Index => BufferUsage::INDEX | BufferUsage::COPY_DST,
            RingKind::Uniform => BufferUsage::UNIFORM | BufferUsage::COPY_DST,
        }
    }
}

/// A ring allocator with one backing buffer per frame-in-flight slot, so a
/// frame's writes never race the GPU's reads of an earlier frame's data
/// (`spec.md` §4.2). Its buffers live for the lifetime of the pool itself —
/// unlike pooled resources, transient buffers are never individually
/// released, so they bypass `BufferPool` and talk to the `Device` directly.
/// Grounded on
/// `myth::renderer::core::resources::allocator::ModelBufferAllocator`'s
/// cursor/capacity idiom, generalized to `N_FRAMES_IN_FLIGHT` rotating
/// buffers instead of one.
pub struct TransientRing {
    kind: RingKind,
    alignment: u64,
    capacity: u64,
    buffers: [Option<BufferId>; N_FRAMES_IN_FLIGHT as usize],
    active_slot: usize,
    cursor: u64,
    high_water_mark: u64,
}

impl TransientRing {
    #[must_use]
    pub fn new(kind: RingKind, alignment: u64, capacity: u64) -> Self {
        Self {
            kind,
            alignment,
            capacity,
            buffers: [None; N_FRAMES_IN_FLIGHT as usize],
            active_slot: 0,
            cursor: 0,
            high_water_mark: 0,
        }
    }

    /// Lazily creates the backing buffer for every rotation slot the first
    /// time it is needed, then selects this frame's slot and resets its
    /// cursor. Called once per frame from
    /// [`super::TransientBufferPool::begin_frame`].
    pub fn begin_frame(&mut self, frame_index: u64, device: &dyn Device) {
        self.active_slot = (frame_index % N_FRAMES_IN_FLIGHT) as usize;
        if self.buffers[self.active_slot].is_none() {
            let created = device.create_buffer(
                self.capacity,
                self.kind.buffer_usage(),
                Some(ring_label(self.kind)),
            );
            if created.is_none() {
                log::warn!(
                    "TransientRing({:?}): HAL failed to create {} byte ring buffer",
                    self.kind,
                    self.capacity
                );
            }
            self.buffers[self.active_slot] = created;
        }
        self.cursor = 0;
    }

    /// Carves out `size` bytes aligned to this ring's required alignment.
    /// Returns an invalid allocation on overflow rather than growing the
    /// buffer mid-frame (`spec.md` §4.2, "no dynamic growth mid-frame").
    pub fn allocate(&mut self, size: u64) -> TransientAllocation {
        let Some(buffer) = self.buffers[self.active_slot] else {
            return TransientAllocation::INVALID;
        };
        if size == 0 {
            return TransientAllocation::INVALID;
        }
        let aligned_offset = align_up(self.cursor, self.alignment);
        let Some(end) = aligned_offset.checked_add(size) else {
            return TransientAllocation::INVALID;
        };
        if end > self.capacity {
            return TransientAllocation::INVALID;
        }
        self.cursor = end;
        self.high_water_mark = self.high_water_mark.max(end);
        TransientAllocation {
            buffer,
            offset: aligned_offset,
            size,
        }
    }

    #[must_use]
    pub fn bytes_used(&self) -> u64 {
        self.cursor
    }

    #[must_use]
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    #[must_use]
    pub fn high_water_mark(&self) -> u64 {
        self.high_water_mark
    }

    #[must_use]
    pub fn alignment(&self) -> u64 {
        self.alignment
    }
}

fn align_up(value: u64, alignment: u64) -> u64 {
    debug_assert!(alignment.is_power_of_two(), "alignment must be a power of two");
    (value + alignment - 1) & !(alignment - 1)
}

fn ring_label(kind: RingKind) -> &'static str {
    match kind {
        RingKind::Vertex => "transient.vertex",
        RingKind::Index => "transient.index",
        RingKind::Uniform => "transient.uniform",
    }
}
