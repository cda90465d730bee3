//! GPU buffer pool (`spec.md` §4.1).

use crate::hal::{BufferId, BufferUsage, Device, GpuResource};
use crate::handle::Handle;
use crate::pool::{DeferredDestructionQueue, PoolStats, ResourcePool};

/// Marker type for `Handle<BufferSlotInfo>` = `BufferHandle`.
pub type BufferHandle = Handle<BufferSlotInfo>;

/// Metadata stored per buffer slot.
#[derive(Debug, Clone)]
pub struct BufferSlotInfo {
    pub buffer: BufferId,
    pub size: u64,
    pub usage: BufferUsage,
    pub label: Option<String>,
}

/// Stable, generation-safe allocation of GPU buffers with deferred
/// destruction on release.
#[derive(Default)]
pub struct BufferPool {
    pool: ResourcePool<BufferSlotInfo>,
    deferred: DeferredDestructionQueue,
}

impl BufferPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a slot and asks the HAL to create the backing buffer. On
    /// HAL failure the pool slot is rolled back and an invalid handle is
    /// returned — no partial state survives.
    pub fn create_buffer(
        &mut self,
        device: &dyn Device,
        size: u64,
        usage: BufferUsage,
        label: Option<&str>,
    ) -> BufferHandle {
        let Some(buffer) = device.create_buffer(size, usage, label) else {
            log::warn!("BufferPool: HAL failed to create buffer of {size} bytes");
            return BufferHandle::INVALID;
        };
        self.pool.allocate(BufferSlotInfo {
            buffer,
            size,
            usage,
            label: label.map(str::to_owned),
        })
    }

    /// No-op on an invalid handle. Otherwise enqueues the GPU resource for
    /// destruction `N_FRAMES_IN_FLIGHT` frames from now and frees the slot
    /// immediately (the handle is dead to the caller right away).
    pub fn release_buffer(&mut self, handle: BufferHandle, current_frame: u64) {
        if let Some(info) = self.pool.release(handle) {
            self.deferred
                .enqueue(GpuResource::Buffer(info.buffer), current_frame);
        }
    }

    #[must_use]
    pub fn get_size(&self, handle: BufferHandle) -> Option<u64> {
        self.pool.get(handle).map(|info| info.size)
    }

    #[must_use]
    pub fn get_buffer_id(&self, handle: BufferHandle) -> Option<BufferId> {
        self.pool.get(handle).map(|info| info.buffer)
    }

    #[must_use]
    pub fn is_valid(&self, handle: BufferHandle) -> bool {
        self.pool.is_valid(handle)
    }

    /// Drains deferred-destruction entries old enough to actually destroy.
    pub fn tick(&mut self, frame_index: u64, device: &dyn Device) {
        self.deferred.tick(frame_index, device);
    }

    #[must_use]
    pub fn stats(&self) -> PoolStats {
        let mut stats = self.pool.stats();
        stats.pending_deletions = self.deferred.pending_count();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{CommandEncoder, DeviceCaps, Format, TextureId, TextureUsage};

    struct NullEncoder;
    impl CommandEncoder for NullEncoder {
        fn copy_buffer_to_buffer(&mut self, _: BufferId, _: u64, _: BufferId, _: u64, _: u64) {}
        fn copy_buffer_to_texture(&mut self, _: BufferId, _: TextureId) {}
        fn copy_texture_to_texture(&mut self, _: TextureId, _: TextureId) {}
        fn generate_mipmaps(&mut self, _: TextureId) {}
    }

    struct AlwaysSucceedsDevice;
    impl Device for AlwaysSucceedsDevice {
        fn caps(&self) -> DeviceCaps {
            DeviceCaps::default()
        }
        fn create_buffer(&self, _: u64, _: BufferUsage, _: Option<&str>) -> Option<BufferId> {
            Some(BufferId(1))
        }
        fn create_texture_2d(
            &self,
            _: u32,
            _: u32,
            _: Format,
            _: TextureUsage,
            _: u32,
            _: Option<&str>,
        ) -> Option<TextureId> {
            Some(TextureId(1))
        }
        fn destroy_buffer(&self, _: BufferId) {}
        fn destroy_texture(&self, _: TextureId) {}
        fn create_command_encoder(&self) -> Box<dyn CommandEncoder> {
            Box::new(NullEncoder)
        }
        fn wait_idle(&self) {}
    }

    struct AlwaysFailsDevice;
    impl Device for AlwaysFailsDevice {
        fn caps(&self) -> DeviceCaps {
            DeviceCaps::default()
        }
        fn create_buffer(&self, _: u64, _: BufferUsage, _: Option<&str>) -> Option<BufferId> {
            None
        }
        fn create_texture_2d(
            &self,
            _: u32,
            _: u32,
            _: Format,
            _: TextureUsage,
            _: u32,
            _: Option<&str>,
        ) -> Option<TextureId> {
            None
        }
        fn destroy_buffer(&self, _: BufferId) {}
        fn destroy_texture(&self, _: TextureId) {}
        fn create_command_encoder(&self) -> Box<dyn CommandEncoder> {
            Box::new(NullEncoder)
        }
        fn wait_idle(&self) {}
    }

    #[test]
    fn create_buffer_succeeds_with_working_device() {
        let mut pool = BufferPool::new();
        let h = pool.create_buffer(&AlwaysSucceedsDevice, 256, BufferUsage::UNIFORM, None);
        assert!(pool.is_valid(h));
        assert_eq!(pool.get_size(h), Some(256));
    }

    #[test]
    fn create_buffer_returns_invalid_handle_on_hal_failure() {
        let mut pool = BufferPool::new();
        let h = pool.create_buffer(&AlwaysFailsDevice, 256, BufferUsage::UNIFORM, None);
        assert!(h.is_invalid());
        assert!(!pool.is_valid(h));
    }

    #[test]
    fn release_then_get_size_returns_none() {
        let mut pool = BufferPool::new();
        let device = AlwaysSucceedsDevice;
        let h = pool.create_buffer(&device, 128, BufferUsage::VERTEX, None);
        pool.release_buffer(h, 0);
        assert_eq!(pool.get_size(h), None);
        assert_eq!(pool.stats().pending_deletions, 1);
    }

    #[test]
    fn release_invalid_handle_is_noop() {
        let mut pool = BufferPool::new();
        pool.release_buffer(BufferHandle::INVALID, 0);
        assert_eq!(pool.stats().pending_deletions, 0);
    }
}
