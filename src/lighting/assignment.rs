//! Per-cluster light assignment (`spec.md` §4.6, "Light Assignment").

use glam::Vec3;

use crate::lighting::cluster_grid::ClusterGrid;
use crate::world::LightKind;

/// Default cap on lights per cluster (`spec.md` §4.6, "Caps").
pub const MAX_LIGHTS_PER_CLUSTER: usize = 256;

/// A light reduced to what cluster assignment needs: its GPU light-array
/// index, kind, and a view-space sphere bound. Point/spot/area lights are
/// all represented by a single sphere per `spec.md`'s conservative
/// approximation (`spec.md` §9, "Open questions").
#[derive(Debug, Clone, Copy)]
pub struct LightBound {
    pub light_index: u32,
    pub kind: LightKind,
    pub view_space_center: Vec3,
    pub radius: f32,
}

impl LightBound {
    /// Builds the bounding sphere for a point or area light: centered on
    /// the light, radius equal to its range.
    #[must_use]
    pub fn point_or_area(light_index: u32, kind: LightKind, view_space_position: Vec3, range: f32) -> Self {
        Self { light_index, kind, view_space_center: view_space_position, radius: range }
    }

    /// Builds the bounding sphere for a spot light: centered at half-range
    /// along the spot axis, radius `half_range / cos(outer_angle)`
    /// (`spec.md` §4.6, "Spot lights").
    #[must_use]
    pub fn spot(light_index: u32, view_space_position: Vec3, view_space_axis: Vec3, range: f32, outer_cone_cos: f32) -> Self {
        let half_range = range * 0.5;
        let cos = outer_cone_cos.max(1e-3);
        Self {
            light_index,
            kind: LightKind::Spot,
            view_space_center: view_space_position + view_space_axis.normalize_or_zero() * half_range,
            radius: half_range / cos,
        }
    }
}

/// Closest point on an axis-aligned box to `center`, squared distance to
/// `center` (`spec.md` §4.6, "sphere-AABB test").
fn sphere_intersects_aabb(center: Vec3, radius: f32, aabb_min: Vec3, aabb_max: Vec3) -> bool {
    let closest = center.clamp(aabb_min, aabb_max);
    (closest - center).length_squared() <= radius * radius
}

/// Flat `(offset, count)` table plus packed index array produced by
/// [`assign_lights`]. Indexed by the cluster's linear index
/// (`ClusterGrid::cluster_index`).
#[derive(Debug, Clone, Default)]
pub struct ClusterLightAssignment {
    pub cluster_offsets: Vec<(u32, u32)>,
    pub light_indices: Vec<u32>,
}

impl ClusterLightAssignment {
    #[must_use]
    pub fn lights_in_cluster(&self, cluster_index: usize) -> &[u32] {
        let Some(&(offset, count)) = self.cluster_offsets.get(cluster_index) else {
            return &[];
        };
        &self.light_indices[offset as usize..offset as usize + count as usize]
    }
}

/// Assigns lights to clusters: directional lights affect every cluster
/// implicitly (the renderer applies them outside the per-cluster list, so
/// they are not packed here); point/spot/area lights are tested against
/// each cluster's view-space AABB. Per-cluster counts are capped at
/// `max_per_cluster`, dropping excess lights in ascending light-index
/// order (`spec.md` §4.6, "Caps").
#[must_use]
pub fn assign_lights(
    grid: &ClusterGrid,
    cluster_aabbs: &[(Vec3, Vec3)],
    lights: &[LightBound],
    max_per_cluster: usize,
) -> ClusterLightAssignment {
    debug_assert_eq!(cluster_aabbs.len(), grid.desc.cluster_count());

    let mut sorted_lights: Vec<&LightBound> = lights.iter().filter(|l| l.kind != LightKind::Directional).collect();
    sorted_lights.sort_by_key(|l| l.light_index);

    let mut assignment = ClusterLightAssignment::default();
    assignment.cluster_offsets.reserve(cluster_aabbs.len());

    for &(aabb_min, aabb_max) in cluster_aabbs {
        let offset = assignment.light_indices.len() as u32;
        let mut count = 0u32;
        for light in &sorted_lights {
            if count as usize >= max_per_cluster {
                break;
            }
            if sphere_intersects_aabb(light.view_space_center, light.radius, aabb_min, aabb_max) {
                assignment.light_indices.push(light.light_index);
                count += 1;
            }
        }
        assignment.cluster_offsets.push((offset, count));
    }

    assignment
}
