//! Frame-level orchestration of clustered lighting (`spec.md` §4.6).

use glam::{Mat4, Vec3};

use crate::hal::Queue;
use crate::lighting::assignment::{assign_lights, ClusterLightAssignment, LightBound, MAX_LIGHTS_PER_CLUSTER};
use crate::lighting::cluster_grid::{ClusterGrid, ClusterGridDesc};
use crate::lighting::light_gpu::GpuLight;
use crate::lighting::uniforms::LightingUniforms;
use crate::transient::{TransientAllocation, TransientBufferPool};
use crate::world::{LightKind, LightProxy, RenderWorld};

/// Owns the cluster grid, this frame's light assignment, and the GPU
/// uploads for both the packed light array and the lighting uniform block.
pub struct ClusteredLightingSystem {
    grid_desc: ClusterGridDesc,
    max_lights_per_cluster: usize,
    assignment: ClusterLightAssignment,
    light_count: u32,
}

impl ClusteredLightingSystem {
    #[must_use]
    pub fn new(grid_desc: ClusterGridDesc) -> Self {
        Self { grid_desc, max_lights_per_cluster: MAX_LIGHTS_PER_CLUSTER, assignment: ClusterLightAssignment::default(), light_count: 0 }
    }

    #[must_use]
    pub fn with_max_lights_per_cluster(mut self, max: usize) -> Self {
        self.max_lights_per_cluster = max;
        self
    }

    pub fn begin_frame(&mut self) {
        self.assignment = ClusterLightAssignment::default();
        self.light_count = 0;
    }

    #[must_use]
    pub fn assignment(&self) -> &ClusterLightAssignment {
        &self.assignment
    }

    #[must_use]
    pub fn light_count(&self) -> u32 {
        self.light_count
    }

    /// Assigns every enabled light in `world` to clusters (view-space
    /// positions derived via `view_matrix`), uploads the packed `GpuLight`
    /// array and the lighting uniform block to the transient ring, and
    /// returns both transient allocations.
    #[allow(clippy::too_many_arguments)]
    pub fn build_frame(
        &mut self,
        world: &RenderWorld,
        view_matrix: Mat4,
        projection: Mat4,
        near: f32,
        far: f32,
        screen_size: (u32, u32),
        ambient_color: Vec3,
        ambient_intensity: f32,
        transient: &mut TransientBufferPool,
        queue: &dyn Queue,
    ) -> (TransientAllocation, TransientAllocation) {
        let grid = ClusterGrid::new(self.grid_desc, near, far);

        let mut gpu_lights = Vec::new();
        let mut bounds = Vec::new();
        let mut sun_direction = Vec3::NEG_Y;
        let mut sun_color = Vec3::ONE;
        let mut sun_intensity = 0.0;

        world.for_each_light(|handle, light| {
            let index = handle.index();
            gpu_lights.push(GpuLight::from(light));

            match light.kind {
                LightKind::Directional => {
                    sun_direction = light.direction;
                    sun_color = light.color;
                    sun_intensity = light.intensity;
                }
                LightKind::Point | LightKind::Area => {
                    let view_pos = view_matrix.transform_point3(light.position);
                    bounds.push(LightBound::point_or_area(index, light.kind, view_pos, light.range));
                }
                LightKind::Spot => {
                    let view_pos = view_matrix.transform_point3(light.position);
                    let view_axis = view_matrix.transform_vector3(light.direction);
                    bounds.push(LightBound::spot(index, view_pos, view_axis, light.range, light.outer_cone_cos()));
                }
            }
        });

        let inv_proj = projection.inverse();
        let cluster_aabbs = froxel_cluster_aabbs(&grid, inv_proj, screen_size);
        self.assignment = assign_lights(&grid, &cluster_aabbs, &bounds, self.max_lights_per_cluster);
        self.light_count = gpu_lights.len() as u32;

        let light_allocation = if gpu_lights.is_empty() {
            TransientAllocation::INVALID
        } else {
            transient.allocate_uniform_array(queue, &gpu_lights)
        };

        let uniforms = LightingUniforms::new(
            ambient_color,
            ambient_intensity,
            sun_direction,
            sun_color,
            sun_intensity,
            self.light_count,
            &grid,
            screen_size,
        );
        let uniform_allocation = transient.allocate_uniform(queue, &uniforms);

        (light_allocation, uniform_allocation)
    }

    /// Lights overlapping the cluster a proxy's approximate view-space
    /// sphere center falls into, used for debugging / introspection.
    #[must_use]
    pub fn lights_in_cluster(&self, cluster_index: usize) -> &[u32] {
        self.assignment.lights_in_cluster(cluster_index)
    }
}

/// Builds every cluster's view-space AABB by unprojecting its four screen
/// corners at the slice's near/far depths (`spec.md` §4.6, "AABB build"),
/// via `ClusterGrid::cluster_view_aabb`. Iterates `z`, then `y`, then `x`
/// so the result is indexed by `ClusterGrid::cluster_index` as
/// `assign_lights` expects.
fn froxel_cluster_aabbs(grid: &ClusterGrid, inv_proj: Mat4, screen_size: (u32, u32)) -> Vec<(Vec3, Vec3)> {
    let mut aabbs = Vec::with_capacity(grid.desc.cluster_count());
    for z in 0..grid.desc.gz {
        for y in 0..grid.desc.gy {
            for x in 0..grid.desc.gx {
                aabbs.push(grid.cluster_view_aabb(x, y, z, inv_proj, screen_size));
            }
        }
    }
    aabbs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{BufferId, BufferUsage, CommandEncoder, Device, DeviceCaps, Format, TextureId, TextureUsage};
    use crate::world::LightProxy;

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

    fn point_light(position: Vec3, range: f32) -> LightProxy {
        LightProxy {
            kind: LightKind::Point,
            position,
            direction: Vec3::NEG_Y,
            color: Vec3::ONE,
            intensity: 1.0,
            range,
            inner_cone_angle: 0.0,
            outer_cone_angle: 0.0,
            casts_shadows: false,
            shadow_bias: 0.0,
            normal_bias: 0.0,
            shadow_index: -1,
        }
    }

    #[test]
    fn twenty_five_point_lights_are_all_counted_and_capped() {
        let mut world = RenderWorld::new();
        for row in 0..5 {
            for col in 0..5 {
                let x = (col as f32 - 2.0) * 4.0;
                let y = (row as f32 - 2.0) * 4.0;
                world.create_light(point_light(Vec3::new(x, y, 0.0), 8.0));
            }
        }

        let device = FakeDevice;
        let queue = NullQueue;
        let mut transient = TransientBufferPool::new(&device, 1 << 16, 1 << 16, 1 << 16);
        transient.begin_frame(0, &device);

        let mut system = ClusteredLightingSystem::new(ClusterGridDesc { gx: 8, gy: 6, gz: 16 });
        system.begin_frame();
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO, Vec3::Y);
        let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1920.0 / 1080.0, 0.1, 100.0);
        system.build_frame(&world, view, projection, 0.1, 100.0, (1920, 1080), Vec3::ZERO, 0.0, &mut transient, &queue);

        assert_eq!(system.light_count(), 25);
        let max_in_any_cluster = (0..system.grid_desc.cluster_count()).map(|i| system.lights_in_cluster(i).len()).max().unwrap_or(0);
        assert!(max_in_any_cluster <= MAX_LIGHTS_PER_CLUSTER);

        let overlap_found = (0..system.grid_desc.cluster_count()).any(|i| system.lights_in_cluster(i).len() >= 2);
        assert!(overlap_found, "expected at least one cluster to overlap >= 2 lights");
    }
}
