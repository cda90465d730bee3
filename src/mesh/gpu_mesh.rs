//! GPU-resident mesh record (`spec.md` §3, "Mesh (GPU)").

use crate::handle::Handle;
use crate::mesh::bounds::Aabb;
use crate::mesh::cpu_mesh::{IndexFormat, SubMesh, VertexLayout};
use crate::pool::BufferHandle;

/// Handle into the crate-wide mesh pool.
pub type MeshHandle = Handle<GpuMesh>;

/// A mesh fully resident on the GPU: vertex/index buffers plus the metadata
/// needed to issue draws against it.
#[derive(Debug, Clone)]
pub struct GpuMesh {
    pub vertex_buffer: BufferHandle,
    pub index_buffer: BufferHandle,
    pub vertex_layout: VertexLayout,
    pub vertex_count: u32,
    pub index_count: u32,
    pub index_format: IndexFormat,
    pub submeshes: Vec<SubMesh>,
    pub bounds: Aabb,
    pub is_skinned: bool,
}
