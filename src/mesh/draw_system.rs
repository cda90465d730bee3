//! Per-frame instance submission and batch assembly (`spec.md` §4.4,
//! "MeshDrawSystem").

use glam::Mat4;

use crate::batching::{Batch, DrawBatcher, DrawCommand, DrawLayer};
use crate::hal::Queue;
use crate::mesh::gpu_mesh::{GpuMesh, MeshHandle};
use crate::mesh::instance::{BoneRange, GpuInstance, MeshInstanceData};
use crate::pool::ResourcePool;
use crate::transient::{TransientAllocation, TransientBufferPool};
use crate::visibility::RenderView;

const STATIC_PIPELINE_ID: u32 = 0;
const SKINNED_PIPELINE_ID: u32 = 1;

struct PendingInstance {
    mesh: MeshHandle,
    material_id: u32,
    data: MeshInstanceData,
    layer: DrawLayer,
    bone_range: Option<BoneRange>,
}

/// The result of [`MeshDrawSystem::build_batches`]: a sorted command list,
/// its coalesced batches, and the transient allocations backing instance
/// and bone data this frame.
pub struct MeshDrawOutput {
    pub commands: Vec<DrawCommand>,
    pub batches: Vec<Batch>,
    pub instance_allocation: TransientAllocation,
    pub bone_allocation: TransientAllocation,
}

/// Accumulates instance submissions for one frame and turns them into
/// sorted, batched draws. Grounded on `spec.md` §4.4's instance-to-batch
/// pipeline: instances stream through the transient vertex ring as
/// [`GpuInstance`] records, skinned instances additionally reserve a
/// contiguous range of the shared bone buffer.
#[derive(Default)]
pub struct MeshDrawSystem {
    pending: Vec<PendingInstance>,
    bone_matrices: Vec<Mat4>,
}

impl MeshDrawSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all pending submissions; called at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.pending.clear();
        self.bone_matrices.clear();
    }

    pub fn add_instance(&mut self, mesh: MeshHandle, material_id: u32, data: MeshInstanceData, layer: DrawLayer) {
        self.pending.push(PendingInstance {
            mesh,
            material_id,
            data,
            layer,
            bone_range: None,
        });
    }

    /// Appends `bone_matrices` to the shared per-frame bone buffer and
    /// records the resulting contiguous range on the instance.
    pub fn add_skinned_instance(
        &mut self,
        mesh: MeshHandle,
        material_id: u32,
        data: MeshInstanceData,
        bone_matrices: &[Mat4],
        layer: DrawLayer,
    ) {
        let first_bone_index = self.bone_matrices.len() as u32;
        self.bone_matrices.extend_from_slice(bone_matrices);
        self.pending.push(PendingInstance {
            mesh,
            material_id,
            data,
            layer,
            bone_range: Some(BoneRange {
                first_bone_index,
                bone_count: bone_matrices.len() as u32,
            }),
        });
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Writes this frame's instance and bone data into the transient ring,
    /// runs every submission through a [`DrawBatcher`], and returns the
    /// sorted commands, coalesced batches, and backing allocations.
    ///
    /// Submission order is preserved within each `(pipeline, material,
    /// mesh, layer)` group because instances are appended to the transient
    /// buffer and to the batcher in submission order, and the batcher's
    /// sort is stable for equal keys.
    pub fn build_batches(
        &self,
        mesh_pool: &ResourcePool<GpuMesh>,
        view: &RenderView,
        transient: &mut TransientBufferPool,
        queue: &dyn Queue,
    ) -> MeshDrawOutput {
        let gpu_instances: Vec<GpuInstance> = self.pending.iter().map(|p| GpuInstance::from(p.data)).collect();
        let instance_allocation = if gpu_instances.is_empty() {
            TransientAllocation::INVALID
        } else {
            transient.allocate_vertices(queue, &gpu_instances)
        };

        let bone_allocation = if self.bone_matrices.is_empty() {
            TransientAllocation::INVALID
        } else {
            let flattened: Vec<[[f32; 4]; 4]> = self.bone_matrices.iter().map(Mat4::to_cols_array_2d).collect();
            transient.allocate_vertices(queue, &flattened)
        };

        let mut batcher = DrawBatcher::new();
        for (index, pending) in self.pending.iter().enumerate() {
            let Some(gpu_mesh) = mesh_pool.get(pending.mesh) else {
                log::warn!("MeshDrawSystem: skipping instance with invalid mesh handle");
                continue;
            };
            let pipeline_id = if pending.bone_range.is_some() { SKINNED_PIPELINE_ID } else { STATIC_PIPELINE_ID };
            let mesh_id = pending.mesh.index();
            let depth = view.linear_depth(pending.data.world_transform.w_axis.truncate());
            let _ = gpu_mesh;

            match pending.layer {
                DrawLayer::Opaque => {
                    batcher.add_opaque(pipeline_id, pending.material_id, mesh_id, index as u32, 1, depth);
                }
                DrawLayer::Transparent => {
                    batcher.add_transparent(pipeline_id, pending.material_id, mesh_id, index as u32, 1, depth);
                }
                DrawLayer::Overlay => {
                    batcher.add_overlay(pipeline_id, pending.material_id, mesh_id, index as u32, 1, depth);
                }
            }
        }

        let (commands, batches) = batcher.build_batches();
        MeshDrawOutput {
            commands,
            batches,
            instance_allocation,
            bone_allocation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{BufferId, BufferUsage, CommandEncoder, Device, DeviceCaps, Format, TextureId, TextureUsage};
    use crate::mesh::bounds::Aabb;
    use crate::mesh::cpu_mesh::{IndexFormat, VertexLayout};
    use glam::Vec3;

    struct NullEncoder;
    impl CommandEncoder for NullEncoder {
        fn copy_buffer_to_buffer(&mut self, _: BufferId, _: u64, _: BufferId, _: u64, _: u64) {}
        fn copy_buffer_to_texture(&mut self, _: BufferId, _: TextureId) {}
        fn copy_texture_to_texture(&mut self, _: TextureId, _: TextureId) {}
        fn generate_mipmaps(&mut self, _: TextureId) {}
    }

    struct FakeDevice;
    impl Device for FakeDevice {
        fn caps(&self) -> DeviceCaps {
            DeviceCaps { flip_projection_required: false, min_uniform_buffer_offset_alignment: 256 }
        }
        fn create_buffer(&self, _: u64, _: BufferUsage, _: Option<&str>) -> Option<BufferId> {
            Some(BufferId(1))
        }
        fn create_texture_2d(&self, _: u32, _: u32, _: Format, _: TextureUsage, _: u32, _: Option<&str>) -> Option<TextureId> {
            None
        }
        fn destroy_buffer(&self, _: BufferId) {}
        fn destroy_texture(&self, _: TextureId) {}
        fn create_command_encoder(&self) -> Box<dyn CommandEncoder> {
            Box::new(NullEncoder)
        }
        fn wait_idle(&self) {}
    }

    struct NullQueue;
    impl Queue for NullQueue {
        fn write_buffer(&self, _: BufferId, _: u64, _: &[u8]) {}
        fn write_texture(&self, _: TextureId, _: &[u8]) {}
        fn submit(&self, _: Box<dyn CommandEncoder>) {}
        fn wait_idle(&self) {}
    }

    fn test_view() -> RenderView {
        let eye = Vec3::new(0.0, 0.0, 10.0);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0);
        RenderView::new("main", proj * view, eye, Vec3::new(0.0, 0.0, -1.0), 0.1, 100.0)
    }

    #[test]
    fn single_instance_produces_one_command_and_batch() {
        let mut mesh_pool = ResourcePool::<GpuMesh>::new();
        let mesh_handle = mesh_pool.allocate(GpuMesh {
            vertex_buffer: crate::pool::BufferHandle::INVALID,
            index_buffer: crate::pool::BufferHandle::INVALID,
            vertex_layout: VertexLayout::Standard,
            vertex_count: 24,
            index_count: 36,
            index_format: IndexFormat::U16,
            submeshes: vec![],
            bounds: Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5)),
            is_skinned: false,
        });

        let device = FakeDevice;
        let queue = NullQueue;
        let mut transient = TransientBufferPool::new(&device, 4096, 4096, 4096);
        transient.begin_frame(0, &device);

        let mut draw_system = MeshDrawSystem::new();
        draw_system.add_instance(mesh_handle, 0, MeshInstanceData::default(), DrawLayer::Opaque);

        let output = draw_system.build_batches(&mesh_pool, &test_view(), &mut transient, &queue);
        assert_eq!(output.commands.len(), 1);
        assert_eq!(output.batches.len(), 1);
        assert!(output.instance_allocation.is_valid());
        assert!(!output.bone_allocation.is_valid());
    }
}
