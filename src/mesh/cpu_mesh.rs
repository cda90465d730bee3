//! CPU-side mesh data consumed by [`super::MeshUploader`] (`spec.md` §4.4).

use crate::mesh::bounds::Aabb;

/// Index format for a CPU mesh's index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    U16,
    U32,
}

impl IndexFormat {
    #[must_use]
    pub fn byte_size(self) -> usize {
        match self {
            IndexFormat::U16 => 2,
            IndexFormat::U32 => 4,
        }
    }
}

/// Standard vertex layout: position, normal, UV, color, tangent
/// (`spec.md` §4.4, "Primitives").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexLayout {
    /// `position: vec3, normal: vec3, uv: vec2, color: vec4, tangent: vec4`.
    Standard,
    /// [`VertexLayout::Standard`] plus `bone_indices: [u16; 4]`,
    /// `bone_weights: vec4`.
    Skinned,
}

impl VertexLayout {
    #[must_use]
    pub fn stride(self) -> usize {
        match self {
            VertexLayout::Standard => (3 + 3 + 2 + 4 + 4) * 4,
            VertexLayout::Skinned => (3 + 3 + 2 + 4 + 4) * 4 + 4 * 2 + 4 * 4,
        }
    }
}

/// One contiguous index range of a mesh drawn with a single material slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubMesh {
    pub first_index: u32,
    pub index_count: u32,
    pub material_slot: u32,
}

/// A mesh in main-memory form, ready to hand to [`super::MeshUploader`].
#[derive(Debug, Clone)]
pub struct CpuMesh {
    pub layout: VertexLayout,
    pub vertex_bytes: Vec<u8>,
    pub index_bytes: Vec<u8>,
    pub index_format: IndexFormat,
    pub submeshes: Vec<SubMesh>,
    pub bounds: Aabb,
}

impl CpuMesh {
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        (self.vertex_bytes.len() / self.layout.stride()) as u32
    }

    #[must_use]
    pub fn index_count(&self) -> u32 {
        (self.index_bytes.len() / self.index_format.byte_size()) as u32
    }
}
