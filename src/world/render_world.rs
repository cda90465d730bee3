//! The render-world proxy store (`spec.md` §4.3).

use crate::pool::ResourcePool;
use crate::world::proxies::{
    CameraHandle, CameraProxy, ForceFieldHandle, ForceFieldProxy, LightHandle, LightProxy, ParticleEmitterHandle,
    ParticleEmitterProxy, SkinnedMeshHandle, SkinnedMeshProxy, SpriteHandle, SpriteProxy, StaticMeshHandle,
    StaticMeshProxy,
};

macro_rules! proxy_table {
    ($field:ident, $handle:ty, $proxy:ty, $create:ident, $destroy:ident, $get:ident, $get_mut:ident, $for_each:ident, $count:ident) => {
        pub fn $create(&mut self, proxy: $proxy) -> $handle {
            self.$field.allocate(proxy)
        }

        pub fn $destroy(&mut self, handle: $handle) {
            self.$field.release(handle);
        }

        #[must_use]
        pub fn $get(&self, handle: $handle) -> Option<&$proxy> {
            self.$field.get(handle)
        }

        pub fn $get_mut(&mut self, handle: $handle) -> Option<&mut $proxy> {
            self.$field.get_mut(handle)
        }

        pub fn $for_each(&self, f: impl FnMut($handle, &$proxy)) {
            self.$field.for_each(f);
        }

        #[must_use]
        pub fn $count(&self) -> usize {
            self.$field.count()
        }
    };
}

/// Per-kind `ResourcePool`-backed tables for every proxy kind
/// (`spec.md` §4.3). Grounded on `myth::scene::scene::Scene`'s per-kind
/// storage, restructured as SoA tables rather than a scene-graph hierarchy
/// (hierarchy/transform propagation is out of scope — see `spec.md` §1).
#[derive(Default)]
pub struct RenderWorld {
    static_meshes: ResourcePool<StaticMeshProxy>,
    skinned_meshes: ResourcePool<SkinnedMeshProxy>,
    lights: ResourcePool<LightProxy>,
    cameras: ResourcePool<CameraProxy>,
    particle_emitters: ResourcePool<ParticleEmitterProxy>,
    sprites: ResourcePool<SpriteProxy>,
    force_fields: ResourcePool<ForceFieldProxy>,
}

impl RenderWorld {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    proxy_table!(
        static_meshes,
        StaticMeshHandle,
        StaticMeshProxy,
        create_static_mesh,
        destroy_static_mesh,
        get_static_mesh,
        get_static_mesh_mut,
        for_each_static_mesh,
        count_static_mesh
    );

    proxy_table!(
        skinned_meshes,
        SkinnedMeshHandle,
        SkinnedMeshProxy,
        create_skinned_mesh,
        destroy_skinned_mesh,
        get_skinned_mesh,
        get_skinned_mesh_mut,
        for_each_skinned_mesh,
        count_skinned_mesh
    );

    proxy_table!(
        lights,
        LightHandle,
        LightProxy,
        create_light,
        destroy_light,
        get_light,
        get_light_mut,
        for_each_light,
        count_light
    );

    proxy_table!(
        cameras,
        CameraHandle,
        CameraProxy,
        create_camera,
        destroy_camera,
        get_camera,
        get_camera_mut,
        for_each_camera,
        count_camera
    );

    proxy_table!(
        particle_emitters,
        ParticleEmitterHandle,
        ParticleEmitterProxy,
        create_particle_emitter,
        destroy_particle_emitter,
        get_particle_emitter,
        get_particle_emitter_mut,
        for_each_particle_emitter,
        count_particle_emitter
    );

    proxy_table!(
        sprites,
        SpriteHandle,
        SpriteProxy,
        create_sprite,
        destroy_sprite,
        get_sprite,
        get_sprite_mut,
        for_each_sprite,
        count_sprite
    );

    proxy_table!(
        force_fields,
        ForceFieldHandle,
        ForceFieldProxy,
        create_force_field,
        destroy_force_field,
        get_force_field,
        get_force_field_mut,
        for_each_force_field,
        count_force_field
    );

    /// The main camera is the lowest-index enabled camera with `is_main =
    /// true`; if none, the highest-priority enabled camera, ties broken by
    /// index (`spec.md` §4.3, "Extra responsibility").
    #[must_use]
    pub fn main_camera(&self) -> Option<CameraHandle> {
        let mut explicit_main: Option<CameraHandle> = None;
        let mut best_priority: Option<(i32, CameraHandle)> = None;

        self.cameras.for_each(|handle, camera| {
            if !camera.enabled {
                return;
            }
            if camera.is_main && explicit_main.is_none() {
                explicit_main = Some(handle);
            }
            match best_priority {
                Some((priority, _)) if priority >= camera.priority => {}
                _ => best_priority = Some((camera.priority, handle)),
            }
        });

        explicit_main.or(best_priority.map(|(_, handle)| handle))
    }
}
