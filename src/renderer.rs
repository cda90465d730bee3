//! The façade owning every subsystem and driving the per-frame lifecycle
//! (`spec.md` §4, item 10).

use glam::Vec3;

use crate::batching::DrawLayer;
use crate::error::{CoreError, Result};
use crate::graph::{ColorAttachment, PassFlags, RenderGraph};
use crate::hal::{Device, Format, Queue};
use crate::lighting::{ClusterGridDesc, ClusteredLightingSystem, MAX_LIGHTS_PER_CLUSTER};
use crate::mesh::{CpuMesh, MeshDrawSystem, MeshHandle, MeshInstanceData, MeshPool, MeshUploader};
use crate::pool::{BufferPool, TexturePool};
use crate::shadows::ShadowDrawSystem;
use crate::transient::{TransientBufferPool, TransientStats};
use crate::visibility::{RenderView, VisibilitySystem};
use crate::world::{CameraHandle, MeshFlags, RenderWorld};

/// Construction-time sizing for every subsystem the [`Renderer`] owns.
/// Every field is a plain value passed in by the caller — no statics, no
/// environment variables (`spec.md` §9, "no global state").
#[derive(Debug, Clone, Copy)]
pub struct RendererConfig {
    pub vertex_ring_capacity: u64,
    pub index_ring_capacity: u64,
    pub uniform_ring_capacity: u64,
    pub cluster_grid: ClusterGridDesc,
    pub max_lights_per_cluster: usize,
    pub shadow_atlas_size: u32,
    pub cascade_count: u32,
    pub cascade_split_lambda: f32,
    pub cascade_map_size: u32,
    pub local_shadow_map_size: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            vertex_ring_capacity: 4 << 20,
            index_ring_capacity: 2 << 20,
            uniform_ring_capacity: 1 << 20,
            cluster_grid: ClusterGridDesc::default(),
            max_lights_per_cluster: MAX_LIGHTS_PER_CLUSTER,
            shadow_atlas_size: 4096,
            cascade_count: 4,
            cascade_split_lambda: 0.5,
            cascade_map_size: 1024,
            local_shadow_map_size: 1024,
        }
    }
}

/// Per-frame counters reported once every frame (`spec.md` §8, "Renderer
/// per-frame stats").
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub triangles: u64,
    pub batch_count: u32,
    pub culled_objects: u32,
    pub light_count: u32,
    pub active_shadow_maps: u32,
    pub vram_allocated: u64,
    pub transient_bytes_used: TransientStats,
    pub graph_pass_count: u32,
    pub culled_pass_count: u32,
}

/// Owns resource pools, the transient allocator, the render world, the
/// mesh/visibility/batching/lighting/shadow subsystems, and the render
/// graph, and drives the per-frame lifecycle across all of them
/// (`spec.md` §4, item 10, "Renderer façade"). Holds no synchronization
/// primitives: every subsystem is driven serially, once per frame, exactly
/// as `spec.md` §5 requires.
pub struct Renderer {
    buffers: BufferPool,
    textures: TexturePool,
    transient: TransientBufferPool,
    world: RenderWorld,
    mesh_pool: MeshPool,
    draw_system: MeshDrawSystem,
    visibility: VisibilitySystem,
    lighting: ClusteredLightingSystem,
    shadows: ShadowDrawSystem,
    graph: RenderGraph,
    frame_index: u64,
    last_stats: FrameStats,
}

impl Renderer {
    #[must_use]
    pub fn new(device: &dyn Device, config: RendererConfig) -> Self {
        Self {
            buffers: BufferPool::new(),
            textures: TexturePool::new(),
            transient: TransientBufferPool::new(device, config.vertex_ring_capacity, config.index_ring_capacity, config.uniform_ring_capacity),
            world: RenderWorld::new(),
            mesh_pool: MeshPool::new(),
            draw_system: MeshDrawSystem::new(),
            visibility: VisibilitySystem::new(),
            lighting: ClusteredLightingSystem::new(config.cluster_grid).with_max_lights_per_cluster(config.max_lights_per_cluster),
            shadows: ShadowDrawSystem::new(config.shadow_atlas_size, config.cascade_count, config.cascade_split_lambda, config.cascade_map_size, config.local_shadow_map_size),
            graph: RenderGraph::new(),
            frame_index: 0,
            last_stats: FrameStats::default(),
        }
    }

    #[must_use]
    pub fn world(&self) -> &RenderWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut RenderWorld {
        &mut self.world
    }

    #[must_use]
    pub fn mesh_pool(&self) -> &MeshPool {
        &self.mesh_pool
    }

    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    #[must_use]
    pub fn stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Uploads a CPU mesh and inserts it into the crate-wide mesh pool.
    pub fn upload_mesh(&mut self, device: &dyn Device, queue: &dyn Queue, cpu_mesh: &CpuMesh) -> MeshHandle {
        MeshUploader::upload(cpu_mesh, device, queue, &mut self.buffers, &mut self.mesh_pool, self.frame_index)
    }

    /// Releases a mesh's pool slot and its backing vertex/index buffers.
    pub fn release_mesh(&mut self, handle: MeshHandle) {
        if let Some(gpu_mesh) = self.mesh_pool.release(handle) {
            self.buffers.release_buffer(gpu_mesh.vertex_buffer, self.frame_index);
            self.buffers.release_buffer(gpu_mesh.index_buffer, self.frame_index);
        }
    }

    /// Drains deferred destruction, rotates the transient rings, and
    /// clears every subsystem's per-frame state. Must run before any
    /// per-frame submission (`spec.md` §5, "Ordering guarantees").
    pub fn begin_frame(&mut self, device: &dyn Device) {
        self.buffers.tick(self.frame_index, device);
        self.textures.tick(self.frame_index, device);
        self.transient.begin_frame(self.frame_index, device);
        self.draw_system.begin_frame();
        self.visibility.begin_frame();
        self.lighting.begin_frame();
        self.shadows.begin_frame();
        self.graph.begin_frame();
    }

    /// Bookkeeping-only step closing out the frame (`spec.md` §4.8,
    /// "end_frame"). Advances the frame counter so the next `begin_frame`
    /// rotates to the following ring-in-flight slot.
    pub fn end_frame(&mut self) {
        self.graph.end_frame();
        self.frame_index += 1;
    }

    /// Runs one complete frame for `camera`: visibility, batching,
    /// clustered lighting, shadows, and a minimal render-graph pass,
    /// returning this frame's [`FrameStats`]. Calls `begin_frame` and
    /// `end_frame` itself, so this is the single entry point a caller with
    /// no finer-grained control needs.
    pub fn render_frame(
        &mut self,
        device: &dyn Device,
        queue: &dyn Queue,
        camera: CameraHandle,
        ambient_color: Vec3,
        ambient_intensity: f32,
    ) -> Result<FrameStats> {
        self.begin_frame(device);

        let Some(camera_proxy) = self.world.get_camera_mut(camera) else {
            log::warn!("Renderer::render_frame: invalid camera handle, skipping frame");
            self.end_frame();
            return Ok(FrameStats::default());
        };
        let view_matrix = camera_proxy.view_matrix();
        let projection_matrix = camera_proxy.projection_matrix();
        let view_projection = camera_proxy.view_projection_matrix();
        let eye_position = camera_proxy.position;
        let forward = camera_proxy.forward;
        let near = camera_proxy.near;
        let far = camera_proxy.far;
        let viewport = camera_proxy.viewport;

        let view = RenderView::new("main", view_projection, eye_position, forward, near, far);
        self.visibility.add_view(view.clone());

        let mut candidates = Vec::new();
        self.world.for_each_static_mesh(|_handle, proxy| {
            candidates.push((proxy.world_transform, proxy.mesh, proxy.material, proxy.flags, proxy.world_bounds));
        });

        let mut triangles = 0u64;
        for (world_transform, mesh, material, flags, world_bounds) in candidates {
            if !flags.contains(MeshFlags::VISIBLE) {
                continue;
            }
            let (visible, _mask) = self.visibility.test_aabb(&world_bounds);
            if !visible {
                continue;
            }
            let Some(gpu_mesh) = self.mesh_pool.get(mesh) else {
                log::warn!("Renderer::render_frame: static mesh proxy references an invalid mesh handle");
                continue;
            };
            triangles += u64::from(gpu_mesh.index_count) / 3;

            let instance = MeshInstanceData { world_transform, custom: glam::Vec4::ZERO };
            self.draw_system.add_instance(mesh, material, instance, DrawLayer::Opaque);
        }

        self.lighting.build_frame(
            &self.world,
            view_matrix,
            projection_matrix,
            near,
            far,
            viewport,
            ambient_color,
            ambient_intensity,
            &mut self.transient,
            queue,
        );
        self.shadows.build_frame(
            &self.world,
            view_matrix,
            std::f32::consts::FRAC_PI_4,
            viewport.0 as f32 / viewport.1.max(1) as f32,
            near,
            far,
            &mut self.transient,
            queue,
        );

        let output = self.draw_system.build_batches(&self.mesh_pool, &view, &mut self.transient, queue);

        self.graph.begin_frame();
        let scene_color = self.graph.create_texture("SceneColor", crate::graph::TextureResourceDesc::render_target(viewport.0, viewport.1, Format::Rgba8Unorm));
        self.graph
            .add_graphics_pass("Forward")
            .color_attachment(0, ColorAttachment::with_default_ops(scene_color))
            .flags(PassFlags::NEVER_CULL);
        self.graph.compile().map_err(CoreError::GraphCompile)?;
        self.graph.execute(device);

        let stats = FrameStats {
            draw_calls: output.commands.len() as u32,
            triangles,
            batch_count: output.batches.len() as u32,
            culled_objects: self.visibility.stats().objects_culled as u32,
            light_count: self.lighting.light_count(),
            active_shadow_maps: self.shadows.active_shadow_maps(),
            vram_allocated: self.textures.vram_bytes(),
            transient_bytes_used: self.transient.stats(),
            graph_pass_count: self.graph.pass_count() as u32,
            culled_pass_count: self.graph.culled_pass_count() as u32,
        };
        self.last_stats = stats;

        self.end_frame();
        Ok(stats)
    }
}
