//! Cascaded shadow maps for directional lights (`spec.md` §4.7).
//!
//! Adapted from `myth::renderer::graph::shadow_utils`'s practical-split
//! cascade math (`compute_cascade_splits`, `compute_frustum_corners_world`,
//! `build_cascade_vp`), generalized from the teacher's `RenderCamera`
//! dependency to a plain `(view_matrix, fov_y, aspect)` input so this
//! module has no dependency on the render-world proxy types.

use glam::{Mat4, Vec3};

/// Maximum cascade count per directional light.
pub const MAX_CASCADES: u32 = 4;

/// Computes cascade far-split distances using the practical split scheme,
/// blending uniform (`lambda = 0`) and logarithmic (`lambda = 1`)
/// distribution (`spec.md` §4.7).
#[must_use]
pub fn compute_cascade_splits(cascade_count: u32, near: f32, far: f32, lambda: f32) -> [f32; MAX_CASCADES as usize] {
    let mut splits = [0.0f32; MAX_CASCADES as usize];
    let n = cascade_count.min(MAX_CASCADES) as usize;

    for (i, split) in splits.iter_mut().enumerate().take(n) {
        let p = (i + 1) as f32 / n as f32;
        let log_split = near * (far / near).powf(p);
        let uniform_split = near + (far - near) * p;
        *split = lambda * log_split + (1.0 - lambda) * uniform_split;
    }
    if n > 0 {
        splits[n - 1] = far;
    }
    splits
}

/// Computes the 8 frustum corners of a view-space slice `[slice_near,
/// slice_far]` in world space, given the camera's view matrix and
/// perspective parameters.
#[must_use]
pub fn frustum_corners_world(view_matrix: Mat4, fov_y_radians: f32, aspect: f32, slice_near: f32, slice_far: f32) -> [Vec3; 8] {
    let tan_half_fov = (fov_y_radians * 0.5).tan();

    let h_near = tan_half_fov * slice_near;
    let w_near = h_near * aspect;
    let h_far = tan_half_fov * slice_far;
    let w_far = h_far * aspect;

    let corners_view = [
        Vec3::new(-w_near, -h_near, -slice_near),
        Vec3::new(w_near, -h_near, -slice_near),
        Vec3::new(w_near, h_near, -slice_near),
        Vec3::new(-w_near, h_near, -slice_near),
        Vec3::new(-w_far, -h_far, -slice_far),
        Vec3::new(w_far, -h_far, -slice_far),
        Vec3::new(w_far, h_far, -slice_far),
        Vec3::new(-w_far, h_far, -slice_far),
    ];

    let inv_view = view_matrix.inverse();
    let mut corners_world = [Vec3::ZERO; 8];
    for (i, c) in corners_view.iter().enumerate() {
        corners_world[i] = inv_view.transform_point3(*c);
    }
    corners_world
}

/// Builds an orthographic view-projection matrix enclosing `frustum_corners`
/// as seen from a light shining along `light_direction`, with texel-grid
/// snapping to reduce shimmer as the camera moves (`spec.md` §4.7).
#[must_use]
pub fn build_cascade_vp(light_direction: Vec3, frustum_corners: &[Vec3; 8], shadow_map_size: u32, caster_extension: f32) -> Mat4 {
    let safe_dir = if light_direction.length_squared() > 1e-6 { light_direction.normalize() } else { -Vec3::Z };

    let mut center = Vec3::ZERO;
    for c in frustum_corners {
        center += *c;
    }
    center /= 8.0;

    let up = if safe_dir.y.abs() > 0.99 { Vec3::X } else { Vec3::Y };
    let light_view = Mat4::look_at_rh(center - safe_dir, center, up);

    let mut ls_min = Vec3::splat(f32::MAX);
    let mut ls_max = Vec3::splat(f32::MIN);
    for c in frustum_corners {
        let ls = light_view.transform_point3(*c);
        ls_min = ls_min.min(ls);
        ls_max = ls_max.max(ls);
    }

    let base_z_range = (ls_max.z - ls_min.z).max(1.0);
    let near_extension = caster_extension.max(base_z_range);
    let far_extension = base_z_range.max(50.0);
    ls_max.z += near_extension;
    ls_min.z -= far_extension;

    let texel_x = (ls_max.x - ls_min.x) / shadow_map_size as f32;
    let texel_y = (ls_max.y - ls_min.y) / shadow_map_size as f32;
    if texel_x > 0.0 {
        ls_min.x = (ls_min.x / texel_x).floor() * texel_x;
        ls_max.x = (ls_max.x / texel_x).ceil() * texel_x;
    }
    if texel_y > 0.0 {
        ls_min.y = (ls_min.y / texel_y).floor() * texel_y;
        ls_max.y = (ls_max.y / texel_y).ceil() * texel_y;
    }

    let proj = Mat4::orthographic_rh(ls_min.x, ls_max.x, ls_min.y, ls_max.y, -ls_max.z, -ls_min.z);
    proj * light_view
}

/// One cascade's computed view-projection and the view-space depth range
/// it covers.
#[derive(Debug, Clone, Copy)]
pub struct Cascade {
    pub view_projection: Mat4,
    pub slice_near: f32,
    pub slice_far: f32,
}

/// Builds every cascade for one directional light this frame.
#[derive(Debug, Clone)]
pub struct CascadedShadowMaps {
    pub cascades: Vec<Cascade>,
    pub splits: [f32; MAX_CASCADES as usize],
}

impl CascadedShadowMaps {
    #[must_use]
    pub fn build(
        cascade_count: u32,
        lambda: f32,
        view_matrix: Mat4,
        fov_y_radians: f32,
        aspect: f32,
        camera_near: f32,
        shadow_far: f32,
        light_direction: Vec3,
        shadow_map_size: u32,
        caster_extension: f32,
    ) -> Self {
        let cascade_count = cascade_count.clamp(1, MAX_CASCADES);
        let cam_near = camera_near.max(0.1);
        let splits = compute_cascade_splits(cascade_count, cam_near, shadow_far, lambda);

        let mut cascades = Vec::with_capacity(cascade_count as usize);
        let mut prev_split = cam_near;
        for &slice_far in splits.iter().take(cascade_count as usize) {
            let slice_near = prev_split;
            prev_split = slice_far;

            let corners = frustum_corners_world(view_matrix, fov_y_radians, aspect, slice_near, slice_far);
            let view_projection = build_cascade_vp(light_direction, &corners, shadow_map_size, caster_extension);
            cascades.push(Cascade { view_projection, slice_near, slice_far });
        }

        Self { cascades, splits }
    }

    /// Which cascade index a view-space depth `z` belongs to: the first
    /// cascade whose `slice_far` is `>= z`, or the last cascade if `z`
    /// exceeds every split (`spec.md` §8, "Shadow cascade visibility").
    #[must_use]
    pub fn cascade_for_depth(&self, z: f32) -> usize {
        self.cascades.iter().position(|c| z <= c.slice_far).unwrap_or(self.cascades.len().saturating_sub(1))
    }
}
