//! Render-world proxy records (`spec.md` §3, "Render World Entity").

use bitflags::bitflags;
use glam::{Mat4, Vec3};

use crate::handle::Handle;
use crate::mesh::{Aabb, MeshHandle};
use crate::pool::BufferHandle;

bitflags! {
    /// Per-instance rendering flags (`spec.md` §3, "StaticMeshProxy").
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MeshFlags: u32 {
        const VISIBLE        = 1 << 0;
        const CAST_SHADOW    = 1 << 1;
        const RECEIVE_SHADOW = 1 << 2;
        const DYNAMIC        = 1 << 3;
    }
}

impl Default for MeshFlags {
    fn default() -> Self {
        MeshFlags::VISIBLE | MeshFlags::CAST_SHADOW | MeshFlags::RECEIVE_SHADOW
    }
}

/// Opaque placeholder for a material identity until a material system is
/// layered on top of this core (`spec.md` §1, "non-goal: PBR/shader math").
pub type MaterialHandle = u32;

/// A static (non-skinned) mesh instance in the render world.
#[derive(Debug, Clone, Copy)]
pub struct StaticMeshProxy {
    pub world_transform: Mat4,
    pub flags: MeshFlags,
    pub world_bounds: Aabb,
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
    pub render_layer: u32,
}

pub type StaticMeshHandle = Handle<StaticMeshProxy>;

/// A skinned mesh instance, carrying its bone-matrix buffer alongside the
/// fields shared with [`StaticMeshProxy`].
#[derive(Debug, Clone, Copy)]
pub struct SkinnedMeshProxy {
    pub world_transform: Mat4,
    pub flags: MeshFlags,
    pub world_bounds: Aabb,
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
    pub render_layer: u32,
    pub bone_buffer: BufferHandle,
    pub bone_count: u32,
}

pub type SkinnedMeshHandle = Handle<SkinnedMeshProxy>;

/// A light's classification (`spec.md` §3, "LightProxy").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Directional,
    Point,
    Spot,
    Area,
}

#[derive(Debug, Clone, Copy)]
pub struct LightProxy {
    pub kind: LightKind,
    pub position: Vec3,
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub range: f32,
    pub inner_cone_angle: f32,
    pub outer_cone_angle: f32,
    pub casts_shadows: bool,
    pub shadow_bias: f32,
    pub normal_bias: f32,
    /// Index into the shadow system's region array; `-1` means none
    /// (`spec.md` §9, "Cyclic references").
    pub shadow_index: i32,
}

impl LightProxy {
    #[must_use]
    pub fn inner_cone_cos(&self) -> f32 {
        self.inner_cone_angle.cos()
    }

    #[must_use]
    pub fn outer_cone_cos(&self) -> f32 {
        self.outer_cone_angle.cos()
    }
}

pub type LightHandle = Handle<LightProxy>;

/// A camera's projection kind (`spec.md` §3, "CameraProxy").
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionKind {
    Perspective { fov_y_radians: f32 },
    Orthographic { half_extent: f32 },
}

#[derive(Debug, Clone, Copy)]
pub struct CameraProxy {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub projection: ProjectionKind,
    pub near: f32,
    pub far: f32,
    pub viewport: (u32, u32),
    pub is_main: bool,
    pub priority: i32,
    pub enabled: bool,

    cached_view: Mat4,
    cached_projection: Mat4,
    dirty: bool,
}

pub type CameraHandle = Handle<CameraProxy>;

impl CameraProxy {
    #[must_use]
    pub fn new_perspective(position: Vec3, forward: Vec3, fov_y_radians: f32, near: f32, far: f32, viewport: (u32, u32)) -> Self {
        Self {
            position,
            forward: forward.normalize_or_zero(),
            up: Vec3::Y,
            projection: ProjectionKind::Perspective { fov_y_radians },
            near,
            far,
            viewport,
            is_main: false,
            priority: 0,
            enabled: true,
            cached_view: Mat4::IDENTITY,
            cached_projection: Mat4::IDENTITY,
            dirty: true,
        }
    }

    /// Right vector, re-derived orthonormal from forward/up each time it is
    /// requested rather than stored (`spec.md` §3, "right is derived").
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.forward.cross(self.up).normalize_or_zero()
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn recompute_if_dirty(&mut self) {
        if !self.dirty {
            return;
        }
        self.cached_view = Mat4::look_to_rh(self.position, self.forward, self.up);
        let aspect = self.viewport.0 as f32 / self.viewport.1.max(1) as f32;
        self.cached_projection = match self.projection {
            ProjectionKind::Perspective { fov_y_radians } => {
                Mat4::perspective_rh(fov_y_radians, aspect, self.near, self.far)
            }
            ProjectionKind::Orthographic { half_extent } => {
                let half_height = half_extent;
                let half_width = half_extent * aspect;
                Mat4::orthographic_rh(-half_width, half_width, -half_height, half_height, self.near, self.far)
            }
        };
        self.dirty = false;
    }

    /// Recomputes (if dirty) and returns the cached view matrix.
    pub fn view_matrix(&mut self) -> Mat4 {
        self.recompute_if_dirty();
        self.cached_view
    }

    /// Recomputes (if dirty) and returns the cached projection matrix.
    pub fn projection_matrix(&mut self) -> Mat4 {
        self.recompute_if_dirty();
        self.cached_projection
    }

    /// Recomputes (if dirty) and returns the cached view-projection matrix.
    pub fn view_projection_matrix(&mut self) -> Mat4 {
        self.recompute_if_dirty();
        self.cached_projection * self.cached_view
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    Opaque,
    AlphaBlend,
    Additive,
}

#[derive(Debug, Clone, Copy)]
pub struct ParticleEmitterProxy {
    pub position: Vec3,
    pub emission_rate: f32,
    pub max_particles: u32,
    pub lifetime_range: (f32, f32),
    pub size: f32,
    pub color: Vec3,
    pub blend_mode: BlendMode,
    pub enabled: bool,
}

pub type ParticleEmitterHandle = Handle<ParticleEmitterProxy>;

#[derive(Debug, Clone, Copy)]
pub struct SpriteProxy {
    pub position: Vec3,
    pub size: (f32, f32),
    pub color: Vec3,
    pub blend_mode: BlendMode,
    pub material: MaterialHandle,
}

pub type SpriteHandle = Handle<SpriteProxy>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceFieldKind {
    Directional,
    Radial,
    Vortex,
}

#[derive(Debug, Clone, Copy)]
pub struct ForceFieldProxy {
    pub kind: ForceFieldKind,
    pub position: Vec3,
    pub direction: Vec3,
    pub strength: f32,
    pub range: f32,
}

pub type ForceFieldHandle = Handle<ForceFieldProxy>;
