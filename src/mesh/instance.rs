//! Per-instance draw data streamed through the transient vertex ring
//! (`spec.md` §4.4).

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

/// Caller-facing per-instance data; converted to the packed [`GpuInstance`]
/// at `build_batches()` time.
#[derive(Debug, Clone, Copy)]
pub struct MeshInstanceData {
    pub world_transform: Mat4,
    pub custom: Vec4,
}

impl Default for MeshInstanceData {
    fn default() -> Self {
        Self {
            world_transform: Mat4::IDENTITY,
            custom: Vec4::ZERO,
        }
    }
}

/// The exact 64-byte std140-compatible layout uploaded to the GPU: a 4x4
/// world transform plus a 16-byte "custom" float4 (`spec.md` §4.4).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct GpuInstance {
    pub world_transform: [[f32; 4]; 4],
    pub custom: [f32; 4],
}

impl From<MeshInstanceData> for GpuInstance {
    fn from(data: MeshInstanceData) -> Self {
        Self {
            world_transform: data.world_transform.to_cols_array_2d(),
            custom: data.custom.to_array(),
        }
    }
}

/// Bone-range descriptor for a skinned instance: a contiguous subrange of
/// the shared per-frame bone transient buffer, stride 64 bytes/matrix.
#[derive(Debug, Clone, Copy)]
pub struct BoneRange {
    pub first_bone_index: u32,
    pub bone_count: u32,
}
