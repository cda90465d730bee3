//! GPU texture pool (`spec.md` §4.1).

use crate::hal::{Device, Format, GpuResource, TextureId, TextureUsage};
use crate::handle::Handle;
use crate::pool::{DeferredDestructionQueue, PoolStats, ResourcePool};

pub type TextureHandle = Handle<TextureSlotInfo>;

/// Metadata stored per texture slot.
#[derive(Debug, Clone)]
pub struct TextureSlotInfo {
    pub texture: TextureId,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub format: Format,
    pub mip_count: u32,
    pub array_layers: u32,
    pub sample_count: u32,
    pub usage: TextureUsage,
    pub label: Option<String>,
}

/// Stable, generation-safe allocation of GPU textures with deferred
/// destruction on release. Same contract as [`super::BufferPool`].
#[derive(Default)]
pub struct TexturePool {
    pool: ResourcePool<TextureSlotInfo>,
    deferred: DeferredDestructionQueue,
}

impl TexturePool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_texture_2d(
        &mut self,
        device: &dyn Device,
        width: u32,
        height: u32,
        format: Format,
        usage: TextureUsage,
        mip_count: u32,
        label: Option<&str>,
    ) -> TextureHandle {
        let Some(texture) = device.create_texture_2d(width, height, format, usage, mip_count, label)
        else {
            log::warn!("TexturePool: HAL failed to create {width}x{height} texture");
            return TextureHandle::INVALID;
        };
        self.pool.allocate(TextureSlotInfo {
            texture,
            width,
            height,
            depth: 1,
            format,
            mip_count,
            array_layers: 1,
            sample_count: 1,
            usage,
            label: label.map(str::to_owned),
        })
    }

    pub fn release_texture(&mut self, handle: TextureHandle, current_frame: u64) {
        if let Some(info) = self.pool.release(handle) {
            self.deferred
                .enqueue(GpuResource::Texture(info.texture), current_frame);
        }
    }

    #[must_use]
    pub fn get_dimensions(&self, handle: TextureHandle) -> Option<(u32, u32, u32)> {
        self.pool
            .get(handle)
            .map(|info| (info.width, info.height, info.depth))
    }

    #[must_use]
    pub fn get_format(&self, handle: TextureHandle) -> Option<Format> {
        self.pool.get(handle).map(|info| info.format)
    }

    #[must_use]
    pub fn get_texture_id(&self, handle: TextureHandle) -> Option<TextureId> {
        self.pool.get(handle).map(|info| info.texture)
    }

    #[must_use]
    pub fn is_valid(&self, handle: TextureHandle) -> bool {
        self.pool.is_valid(handle)
    }

    pub fn tick(&mut self, frame_index: u64, device: &dyn Device) {
        self.deferred.tick(frame_index, device);
    }

    #[must_use]
    pub fn stats(&self) -> PoolStats {
        let mut stats = self.pool.stats();
        stats.pending_deletions = self.deferred.pending_count();
        stats
    }

    /// Total VRAM estimate across occupied slots, for renderer stats.
    #[must_use]
    pub fn vram_bytes(&self) -> u64 {
        let mut total = 0u64;
        self.pool.for_each(|_, info| {
            let texel_bytes = u64::from(info.format.bytes_per_texel());
            total += u64::from(info.width) * u64::from(info.height) * u64::from(info.depth)
                * texel_bytes
                * u64::from(info.array_layers);
        });
        total
    }
}
