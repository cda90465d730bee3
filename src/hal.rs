//! Hardware-abstraction contracts consumed by the core.
//!
//! This module is the entire surface the core requires of a concrete
//! graphics backend (`spec.md` §6). The core is non-generic over the HAL:
//! it holds `Box<dyn Device>` / `Box<dyn Queue>` / etc. trait objects, so
//! one vtable indirection stands in for a full generic backend parameter
//! (`spec.md` §9, "Polymorphism"). No implementation of these traits lives
//! in this crate — only the contract.
//!
//! Handles returned by the HAL (`BufferId`, `TextureId`, ...) are opaque
//! `u64`s from the core's point of view; a real backend is free to pack
//! whatever it needs into them.

use std::fmt;

/// Opaque identifier for a HAL-backed GPU buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u64);

/// Opaque identifier for a HAL-backed GPU texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Opaque identifier for a HAL-backed texture view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureViewId(pub u64);

/// A GPU resource awaiting deferred destruction (`spec.md` §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuResource {
    Buffer(BufferId),
    Texture(TextureId),
}

/// Usage flags for a HAL buffer. Mirrors the common subset every backend
/// needs to expose (vertex/index/uniform/storage/copy roles).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferUsage(u32);

bitflags::bitflags! {
    impl BufferUsage: u32 {
        const VERTEX   = 1 << 0;
        const INDEX    = 1 << 1;
        const UNIFORM  = 1 << 2;
        const STORAGE  = 1 << 3;
        const COPY_SRC = 1 << 4;
        const COPY_DST = 1 << 5;
    }
}

/// Usage flags for a HAL texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureUsage(u32);

bitflags::bitflags! {
    impl TextureUsage: u32 {
        const SAMPLED           = 1 << 0;
        const COLOR_ATTACHMENT  = 1 << 1;
        const DEPTH_ATTACHMENT  = 1 << 2;
        const STORAGE           = 1 << 3;
        const COPY_SRC          = 1 << 4;
        const COPY_DST          = 1 << 5;
    }
}

/// Minimal pixel-format enumeration the core needs to reason about (depth
/// vs. color, byte size for transient sizing). A real backend maps these
/// onto its native format enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Rgba8Unorm,
    Rgba16Float,
    Rgba32Float,
    R32Float,
    Depth32Float,
    Depth24PlusStencil8,
}

impl Format {
    /// `true` for formats usable as a depth/stencil attachment.
    #[must_use]
    pub fn is_depth(self) -> bool {
        matches!(self, Format::Depth32Float | Format::Depth24PlusStencil8)
    }

    /// Bytes per texel, used only for VRAM-usage statistics.
    #[must_use]
    pub fn bytes_per_texel(self) -> u32 {
        match self {
            Format::Rgba8Unorm => 4,
            Format::Rgba16Float => 8,
            Format::Rgba32Float | Format::Depth24PlusStencil8 => 4,
            Format::R32Float | Format::Depth32Float => 4,
        }
    }
}

/// Backend-wide capability query (`spec.md` §9, matrix convention).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceCaps {
    /// When `true`, the renderer negates the projection matrix's `m22`
    /// element before uploading it, to keep NDC Y consistent across
    /// backends with a flipped clip-space Y axis.
    pub flip_projection_required: bool,
    /// Minimum alignment (bytes) for dynamic uniform-buffer offsets.
    pub min_uniform_buffer_offset_alignment: u64,
}

/// Fence wait/acquire outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitResult {
    Signaled,
    TimedOut,
}

/// A GPU/CPU synchronization fence.
pub trait Fence: fmt::Debug {
    /// Blocks until signaled or `timeout_ms` elapses.
    fn wait(&self, timeout_ms: u64) -> WaitResult;
    fn reset(&mut self);
    fn is_signaled(&self) -> bool;
}

/// Recording interface for a single command buffer.
pub trait CommandEncoder {
    fn copy_buffer_to_buffer(
        &mut self,
        src: BufferId,
        src_offset: u64,
        dst: BufferId,
        dst_offset: u64,
        size: u64,
    );
    fn copy_buffer_to_texture(&mut self, src: BufferId, dst: TextureId);
    fn copy_texture_to_texture(&mut self, src: TextureId, dst: TextureId);
    fn generate_mipmaps(&mut self, texture: TextureId);
}

/// The device that creates backend resources.
pub trait Device {
    fn caps(&self) -> DeviceCaps;
    fn create_buffer(&self, size: u64, usage: BufferUsage, label: Option<&str>) -> Option<BufferId>;
    fn create_texture_2d(
        &self,
        width: u32,
        height: u32,
        format: Format,
        usage: TextureUsage,
        mip_count: u32,
        label: Option<&str>,
    ) -> Option<TextureId>;
    fn destroy_buffer(&self, id: BufferId);
    fn destroy_texture(&self, id: TextureId);
    fn create_command_encoder(&self) -> Box<dyn CommandEncoder>;
    fn wait_idle(&self);
}

/// The submission queue.
pub trait Queue {
    fn write_buffer(&self, buffer: BufferId, offset: u64, data: &[u8]);
    fn write_texture(&self, texture: TextureId, data: &[u8]);
    fn submit(&self, encoder: Box<dyn CommandEncoder>);
    fn wait_idle(&self);
}
