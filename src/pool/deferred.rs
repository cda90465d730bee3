//! Deferred GPU-resource destruction queue (`spec.md` §3, §4.1).

use std::collections::VecDeque;

use crate::hal::{Device, GpuResource};
use crate::pool::N_FRAMES_IN_FLIGHT;

/// FIFO queue of `(resource, frame_retired)` pairs. A resource is actually
/// destroyed once `frame_retired + N_FRAMES_IN_FLIGHT <= current_frame`,
/// guaranteeing it outlives any command buffer that could still be
/// referencing it.
#[derive(Default)]
pub struct DeferredDestructionQueue {
    entries: VecDeque<(GpuResource, u64)>,
}

impl DeferredDestructionQueue {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Enqueues `resource` for destruction at least `N_FRAMES_IN_FLIGHT`
    /// frames after `frame_retired`.
    pub fn enqueue(&mut self, resource: GpuResource, frame_retired: u64) {
        self.entries.push_back((resource, frame_retired));
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    /// Drains and destroys every entry whose retirement frame is far enough
    /// in the past relative to `current_frame`. Called at most once per
    /// frame, from `begin_frame` (`spec.md` §5, "Ordering guarantees").
    pub fn tick(&mut self, current_frame: u64, device: &dyn Device) {
        while let Some((resource, frame_retired)) = self.entries.front() {
            if frame_retired + N_FRAMES_IN_FLIGHT > current_frame {
                break;
            }
            match resource {
                GpuResource::Buffer(id) => device.destroy_buffer(*id),
                GpuResource::Texture(id) => device.destroy_texture(*id),
            }
            self.entries.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{BufferId, CommandEncoder, DeviceCaps, Format, TextureId, TextureUsage, BufferUsage};
    use std::cell::RefCell;

    #[derive(Default)]
    struct NullEncoder;
    impl CommandEncoder for NullEncoder {
        fn copy_buffer_to_buffer(&mut self, _: BufferId, _: u64, _: BufferId, _: u64, _: u64) {}
        fn copy_buffer_to_texture(&mut self, _: BufferId, _: TextureId) {}
        fn copy_texture_to_texture(&mut self, _: TextureId, _: TextureId) {}
        fn generate_mipmaps(&mut self, _: TextureId) {}
    }

    #[derive(Default)]
    struct RecordingDevice {
        destroyed_buffers: RefCell<Vec<BufferId>>,
    }

    impl Device for RecordingDevice {
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
        fn destroy_buffer(&self, id: BufferId) {
            self.destroyed_buffers.borrow_mut().push(id);
        }
        fn destroy_texture(&self, _: TextureId) {}
        fn create_command_encoder(&self) -> Box<dyn CommandEncoder> {
            Box::new(NullEncoder)
        }
        fn wait_idle(&self) {}
    }

    #[test]
    fn resource_not_destroyed_before_n_frames_elapse() {
        let mut queue = DeferredDestructionQueue::new();
        let device = RecordingDevice::default();
        queue.enqueue(GpuResource::Buffer(BufferId(1)), 10);

        queue.tick(10 + N_FRAMES_IN_FLIGHT - 1, &device);
        assert_eq!(queue.pending_count(), 1);
        assert!(device.destroyed_buffers.borrow().is_empty());
    }

    #[test]
    fn resource_destroyed_once_n_frames_elapsed() {
        let mut queue = DeferredDestructionQueue::new();
        let device = RecordingDevice::default();
        queue.enqueue(GpuResource::Buffer(BufferId(7)), 10);

        queue.tick(10 + N_FRAMES_IN_FLIGHT, &device);
        assert_eq!(queue.pending_count(), 0);
        assert_eq!(device.destroyed_buffers.borrow().as_slice(), &[BufferId(7)]);
    }
}
