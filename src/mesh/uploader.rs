//! CPU mesh → GPU mesh upload (`spec.md` §4.4, "MeshUploader").

use crate::hal::{BufferUsage, Device, Queue};
use crate::mesh::cpu_mesh::CpuMesh;
use crate::mesh::gpu_mesh::{GpuMesh, MeshHandle};
use crate::pool::{BufferPool, ResourcePool};

/// Turns [`CpuMesh`] descriptors into pooled [`GpuMesh`]s. Grounded on
/// `myth::renderer::managers::model`'s upload sequence (allocate buffers,
/// write data, assemble the GPU-facing record), made atomic: any buffer
/// failure rolls back every buffer already created for this mesh so no
/// dangling slot survives a partial upload.
pub struct MeshUploader;

impl MeshUploader {
    /// Uploads `cpu_mesh`, inserting the resulting [`GpuMesh`] into `pool`.
    /// Returns `MeshHandle::INVALID` (and leaves `pool`/`buffers` untouched
    /// beyond any rollback) if either buffer creation fails.
    pub fn upload(
        cpu_mesh: &CpuMesh,
        device: &dyn Device,
        queue: &dyn Queue,
        buffers: &mut BufferPool,
        pool: &mut ResourcePool<GpuMesh>,
        current_frame: u64,
    ) -> MeshHandle {
        let vertex_buffer = buffers.create_buffer(
            device,
            cpu_mesh.vertex_bytes.len() as u64,
            BufferUsage::VERTEX | BufferUsage::COPY_DST,
            Some("mesh.vertices"),
        );
        if vertex_buffer.is_invalid() {
            log::warn!("MeshUploader: vertex buffer allocation failed, aborting upload");
            return MeshHandle::INVALID;
        }

        let index_buffer = buffers.create_buffer(
            device,
            cpu_mesh.index_bytes.len() as u64,
            BufferUsage::INDEX | BufferUsage::COPY_DST,
            Some("mesh.indices"),
        );
        if index_buffer.is_invalid() {
            log::warn!("MeshUploader: index buffer allocation failed, rolling back vertex buffer");
            buffers.release_buffer(vertex_buffer, current_frame);
            return MeshHandle::INVALID;
        }

        if let Some(id) = buffers.get_buffer_id(vertex_buffer) {
            queue.write_buffer(id, 0, &cpu_mesh.vertex_bytes);
        }
        if let Some(id) = buffers.get_buffer_id(index_buffer) {
            queue.write_buffer(id, 0, &cpu_mesh.index_bytes);
        }

        pool.allocate(GpuMesh {
            vertex_buffer,
            index_buffer,
            vertex_layout: cpu_mesh.layout,
            vertex_count: cpu_mesh.vertex_count(),
            index_count: cpu_mesh.index_count(),
            index_format: cpu_mesh.index_format,
            submeshes: cpu_mesh.submeshes.clone(),
            bounds: cpu_mesh.bounds,
            is_skinned: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{BufferId, BufferUsage as HalBufferUsage, CommandEncoder, DeviceCaps, Format, TextureId, TextureUsage};
    use crate::mesh::cpu_mesh::{IndexFormat, SubMesh, VertexLayout};
    use crate::mesh::bounds::Aabb;
    use glam::Vec3;
    use std::cell::Cell;

    struct NullEncoder;
    impl CommandEncoder for NullEncoder {
        fn copy_buffer_to_buffer(&mut self, _: BufferId, _: u64, _: BufferId, _: u64, _: u64) {}
        fn copy_buffer_to_texture(&mut self, _: BufferId, _: TextureId) {}
        fn copy_texture_to_texture(&mut self, _: TextureId, _: TextureId) {}
        fn generate_mipmaps(&mut self, _: TextureId) {}
    }

    struct NullQueue;
    impl Queue for NullQueue {
        fn write_buffer(&self, _: BufferId, _: u64, _: &[u8]) {}
        fn write_texture(&self, _: TextureId, _: &[u8]) {}
        fn submit(&self, _: Box<dyn CommandEncoder>) {}
        fn wait_idle(&self) {}
    }

    struct CountingDevice {
        fail_after: Cell<i32>,
    }
    impl Device for CountingDevice {
        fn caps(&self) -> DeviceCaps {
            DeviceCaps::default()
        }
        fn create_buffer(&self, _: u64, _: HalBufferUsage, _: Option<&str>) -> Option<BufferId> {
            let remaining = self.fail_after.get();
            if remaining == 0 {
                None
            } else {
                self.fail_after.set(remaining - 1);
                Some(BufferId(1))
            }
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

    fn unit_cube_cpu_mesh() -> CpuMesh {
        CpuMesh {
            layout: VertexLayout::Standard,
            vertex_bytes: vec![0u8; VertexLayout::Standard.stride() * 24],
            index_bytes: vec![0u8; 2 * 36],
            index_format: IndexFormat::U16,
            submeshes: vec![SubMesh {
                first_index: 0,
                index_count: 36,
                material_slot: 0,
            }],
            bounds: Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5)),
        }
    }

    #[test]
    fn successful_upload_produces_valid_handle_and_counts() {
        let device = CountingDevice { fail_after: Cell::new(2) };
        let queue = NullQueue;
        let mut buffers = BufferPool::new();
        let mut pool = ResourcePool::<GpuMesh>::new();
        let cpu_mesh = unit_cube_cpu_mesh();

        let handle = MeshUploader::upload(&cpu_mesh, &device, &queue, &mut buffers, &mut pool, 0);
        assert!(!handle.is_invalid());
        let gpu_mesh = pool.get(handle).unwrap();
        assert_eq!(gpu_mesh.vertex_count, 24);
        assert_eq!(gpu_mesh.index_count, 36);
    }

    #[test]
    fn index_buffer_failure_rolls_back_vertex_buffer() {
        let device = CountingDevice { fail_after: Cell::new(1) };
        let queue = NullQueue;
        let mut buffers = BufferPool::new();
        let mut pool = ResourcePool::<GpuMesh>::new();
        let cpu_mesh = unit_cube_cpu_mesh();

        let handle = MeshUploader::upload(&cpu_mesh, &device, &queue, &mut buffers, &mut pool, 0);
        assert!(handle.is_invalid());
        assert_eq!(pool.count(), 0);
        assert_eq!(buffers.stats().pending_deletions, 1);
    }
}
