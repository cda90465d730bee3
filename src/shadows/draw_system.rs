//! Frame-level shadow orchestration: cascade arrays, atlas, and uniform
//! upload (`spec.md` §4.7, "Shadow Draw System").

use glam::{Mat4, Vec3};

use crate::hal::Queue;
use crate::shadows::atlas::ShadowAtlas;
use crate::shadows::cascades::CascadedShadowMaps;
use crate::transient::{TransientAllocation, TransientBufferPool};
use crate::world::{LightKind, LightProxy, RenderWorld};

/// Per-cascade GPU uniform block: one view-projection plus the split
/// distance it ends at.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CascadeUniform {
    pub view_projection: [[f32; 4]; 4],
    pub split_far: f32,
    pub _padding: [f32; 3],
}

/// Per-local-light shadow uniform block: view-projection plus atlas UV
/// transform.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LocalShadowUniform {
    pub view_projection: [[f32; 4]; 4],
    pub atlas_uv_scale: [f32; 2],
    pub atlas_uv_offset: [f32; 2],
}

/// Manages the directional-light cascade array and the local-light shadow
/// atlas, and uploads their per-frame uniform blocks. Grounded on
/// `myth::renderer::graph::shadow_utils`'s high-level view builders,
/// restructured around this crate's `LightProxy`/`RenderWorld` rather than
/// the teacher's `RenderCamera`/`SpotLight` scene types.
pub struct ShadowDrawSystem {
    pub atlas: ShadowAtlas,
    cascade_count: u32,
    cascade_split_lambda: f32,
    cascade_map_size: u32,
    local_map_size: u32,
    cascades: Option<CascadedShadowMaps>,
    active_shadow_maps: u32,
}

impl ShadowDrawSystem {
    #[must_use]
    pub fn new(atlas_size: u32, cascade_count: u32, cascade_split_lambda: f32, cascade_map_size: u32, local_map_size: u32) -> Self {
        Self {
            atlas: ShadowAtlas::new(atlas_size),
            cascade_count,
            cascade_split_lambda,
            cascade_map_size,
            local_map_size,
            cascades: None,
            active_shadow_maps: 0,
        }
    }

    pub fn begin_frame(&mut self) {
        self.atlas.begin_frame();
        self.cascades = None;
        self.active_shadow_maps = 0;
    }

    #[must_use]
    pub fn cascades(&self) -> Option<&CascadedShadowMaps> {
        self.cascades.as_ref()
    }

    #[must_use]
    pub fn active_shadow_maps(&self) -> u32 {
        self.active_shadow_maps
    }

    /// Builds this frame's directional cascades and allocates atlas
    /// regions for every shadow-casting local light in `world`, then
    /// uploads both uniform sets via the transient ring.
    #[allow(clippy::too_many_arguments)]
    pub fn build_frame(
        &mut self,
        world: &RenderWorld,
        camera_view_matrix: Mat4,
        fov_y_radians: f32,
        aspect: f32,
        camera_near: f32,
        shadow_far: f32,
        transient: &mut TransientBufferPool,
        queue: &dyn Queue,
    ) -> (TransientAllocation, TransientAllocation) {
        let mut cascade_uniforms = Vec::new();
        let mut local_uniforms = Vec::new();

        world.for_each_light(|handle, light| {
            if !light.casts_shadows {
                return;
            }
            match light.kind {
                LightKind::Directional => {
                    let csm = CascadedShadowMaps::build(
                        self.cascade_count,
                        self.cascade_split_lambda,
                        camera_view_matrix,
                        fov_y_radians,
                        aspect,
                        camera_near,
                        shadow_far,
                        light.direction,
                        self.cascade_map_size,
                        5.0,
                    );
                    for cascade in &csm.cascades {
                        cascade_uniforms.push(CascadeUniform {
                            view_projection: cascade.view_projection.to_cols_array_2d(),
                            split_far: cascade.slice_far,
                            _padding: [0.0; 3],
                        });
                    }
                    self.active_shadow_maps += csm.cascades.len() as u32;
                    self.cascades = Some(csm);
                }
                LightKind::Spot => {
                    let vp = spot_view_projection(light);
                    let light_index = handle.index();
                    if self.atlas.allocate(light_index, self.local_map_size, vp, 0.1, light.range).is_some() {
                        if let Some((sx, sy, ox, oy)) = self.atlas.uv_transform(light_index) {
                            local_uniforms.push(LocalShadowUniform {
                                view_projection: vp.to_cols_array_2d(),
                                atlas_uv_scale: [sx, sy],
                                atlas_uv_offset: [ox, oy],
                            });
                        }
                        self.active_shadow_maps += 1;
                    }
                }
                LightKind::Point => {
                    let far = light.range.max(1.0);
                    let face_vps = point_light_face_view_projections(light);
                    let light_index = handle.index();
                    if let Some(faces) = self.atlas.allocate_point_light_faces(light_index, self.local_map_size, &face_vps, 0.1, far) {
                        for face in 0..6u32 {
                            let key = light_index * 6 + face;
                            if let Some((sx, sy, ox, oy)) = self.atlas.uv_transform(key) {
                                local_uniforms.push(LocalShadowUniform {
                                    view_projection: faces[face as usize].view_projection.to_cols_array_2d(),
                                    atlas_uv_scale: [sx, sy],
                                    atlas_uv_offset: [ox, oy],
                                });
                            }
                        }
                        self.active_shadow_maps += 6;
                    }
                }
                LightKind::Area => {}
            }
        });

        let cascade_allocation = if cascade_uniforms.is_empty() {
            TransientAllocation::INVALID
        } else {
            transient.allocate_uniform_array(queue, &cascade_uniforms)
        };
        let local_allocation = if local_uniforms.is_empty() {
            TransientAllocation::INVALID
        } else {
            transient.allocate_uniform_array(queue, &local_uniforms)
        };

        (cascade_allocation, local_allocation)
    }
}

fn look_at_perspective(position: Vec3, direction: Vec3, up: Vec3, fov_y_radians: f32, near: f32, far: f32) -> Mat4 {
    let view = Mat4::look_at_rh(position, position + direction, up);
    Mat4::perspective_rh(fov_y_radians, 1.0, near, far) * view
}

fn spot_view_projection(light: &LightProxy) -> Mat4 {
    let safe_dir = if light.direction.length_squared() > 1e-6 { light.direction.normalize() } else { -Vec3::Z };
    let up = if safe_dir.y.abs() > 0.99 { Vec3::X } else { Vec3::Y };
    let fov = (light.outer_cone_angle * 2.0).clamp(0.1, std::f32::consts::PI - 0.01);
    let far = light.range.max(1.0);
    look_at_perspective(light.position, safe_dir, up, fov, 0.1, far)
}

/// `(direction, up)` for each of a point light's six cube faces, in
/// `+X, -X, +Y, -Y, +Z, -Z` order (`spec.md` §4.7, "Point Lights").
const POINT_LIGHT_FACE_DIRECTIONS: [(Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Y),
    (Vec3::NEG_X, Vec3::NEG_Y),
    (Vec3::Y, Vec3::Z),
    (Vec3::NEG_Y, Vec3::NEG_Z),
    (Vec3::Z, Vec3::NEG_Y),
    (Vec3::NEG_Z, Vec3::NEG_Y),
];

fn point_light_face_view_projections(light: &LightProxy) -> [Mat4; 6] {
    let far = light.range.max(1.0);
    let mut out = [Mat4::IDENTITY; 6];
    for (face, (direction, up)) in POINT_LIGHT_FACE_DIRECTIONS.iter().enumerate() {
        out[face] = look_at_perspective(light.position, *direction, *up, std::f32::consts::FRAC_PI_2, 0.1, far);
    }
    out
}
