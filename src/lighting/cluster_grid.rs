//! Cluster (froxel) grid geometry (`spec.md` §4.6, "Cluster Grid").
//!
//! No teacher module does clustered lighting; this is grounded on the
//! compute-based light-culling pipelines in `other_examples` (clustered
//! froxel assignment via a linear `x + y*GX + z*GX*GY` index and a
//! logarithmic Z-slice distribution), adapted to the crate's handle/pool
//! conventions.

use glam::Vec3;

/// Configurable cluster-grid resolution. Default matches `spec.md`'s
/// "typical" `16 x 9 x 24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterGridDesc {
    pub gx: u32,
    pub gy: u32,
    pub gz: u32,
}

impl Default for ClusterGridDesc {
    fn default() -> Self {
        Self { gx: 16, gy: 9, gz: 24 }
    }
}

impl ClusterGridDesc {
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        (self.gx * self.gy * self.gz) as usize
    }
}

/// The view frustum's Z-subdivision into logarithmically spaced slices,
/// tiled in X/Y across the screen (`spec.md` §4.6).
#[derive(Debug, Clone, Copy)]
pub struct ClusterGrid {
    pub desc: ClusterGridDesc,
    pub near: f32,
    pub far: f32,
}

impl ClusterGrid {
    #[must_use]
    pub fn new(desc: ClusterGridDesc, near: f32, far: f32) -> Self {
        Self { desc, near, far }
    }

    /// Linear cluster index for `(x, y, z)` tile coordinates:
    /// `x + y*GX + z*GX*GY`.
    #[must_use]
    pub fn cluster_index(&self, x: u32, y: u32, z: u32) -> usize {
        (x + y * self.desc.gx + z * self.desc.gx * self.desc.gy) as usize
    }

    /// View-space depth at the start of Z-slice `k`:
    /// `near * (far/near)^(k/GZ)`.
    #[must_use]
    pub fn slice_depth(&self, k: u32) -> f32 {
        let t = k as f32 / self.desc.gz as f32;
        self.near * (self.far / self.near).powf(t)
    }

    /// Inverse lookup: which Z-slice does view-space depth `z` fall into.
    /// `floor(GZ * log(z/near) / log(far/near))`, clamped to `[0, GZ-1]`.
    #[must_use]
    pub fn slice(&self, z: f32) -> u32 {
        if z <= self.near {
            return 0;
        }
        let gz = self.desc.gz as f32;
        let raw = gz * (z / self.near).ln() / (self.far / self.near).ln();
        (raw.floor() as i64).clamp(0, self.desc.gz as i64 - 1) as u32
    }

    /// Builds the AABB of cluster `(x, y, z)` by unprojecting its four
    /// screen-space tile corners at the near and far slice depths into view
    /// space (`spec.md` §4.6, "AABB build"). `inv_proj` is the inverse
    /// projection matrix; `screen_size` is the viewport in pixels.
    #[must_use]
    pub fn cluster_view_aabb(&self, x: u32, y: u32, z: u32, inv_proj: glam::Mat4, screen_size: (u32, u32)) -> (Vec3, Vec3) {
        let tile_w = screen_size.0 as f32 / self.desc.gx as f32;
        let tile_h = screen_size.1 as f32 / self.desc.gy as f32;

        let ndc = |px: f32, py: f32| -> (f32, f32) {
            let nx = (px / screen_size.0 as f32) * 2.0 - 1.0;
            let ny = 1.0 - (py / screen_size.1 as f32) * 2.0;
            (nx, ny)
        };

        let corners_px = [
            (x as f32 * tile_w, y as f32 * tile_h),
            ((x + 1) as f32 * tile_w, y as f32 * tile_h),
            ((x + 1) as f32 * tile_w, (y + 1) as f32 * tile_h),
            (x as f32 * tile_w, (y + 1) as f32 * tile_h),
        ];

        let near_depth = self.slice_depth(z);
        let far_depth = self.slice_depth(z + 1);

        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for (px, py) in corners_px {
            let (nx, ny) = ndc(px, py);
            for view_z in [near_depth, far_depth] {
                let point = unproject_to_view(inv_proj, nx, ny, view_z);
                min = min.min(point);
                max = max.max(point);
            }
        }
        (min, max)
    }
}

/// Unprojects an NDC `(x, y)` point at view-space depth `view_z` back into
/// view space, by scaling the NDC point at the near plane by the ratio of
/// depths (a standard perspective-unproject shortcut valid for any
/// symmetric perspective projection).
fn unproject_to_view(inv_proj: glam::Mat4, ndc_x: f32, ndc_y: f32, view_z: f32) -> Vec3 {
    let clip = glam::Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
    let view_at_near = inv_proj * clip;
    let view_at_near = view_at_near.truncate() / view_at_near.w;
    let scale = view_z / view_at_near.z.abs().max(1e-6);
    view_at_near * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_grid() -> ClusterGrid {
        ClusterGrid::new(ClusterGridDesc { gx: 16, gy: 9, gz: 24 }, 0.1, 1000.0)
    }

    #[test]
    fn slice_boundaries_match_spec() {
        let grid = spec_grid();
        assert_eq!(grid.slice(0.1), 0);
        assert_eq!(grid.slice(1000.0), 23);
    }

    #[test]
    fn slice_is_non_decreasing_in_depth() {
        let grid = spec_grid();
        let mut prev = grid.slice(0.1);
        let mut z = 0.1f32;
        while z < 1000.0 {
            let s = grid.slice(z);
            assert!(s >= prev);
            prev = s;
            z *= 1.3;
        }
    }

    #[test]
    fn cluster_index_is_linear() {
        let grid = spec_grid();
        assert_eq!(grid.cluster_index(0, 0, 0), 0);
        assert_eq!(grid.cluster_index(1, 0, 0), 1);
        assert_eq!(grid.cluster_index(0, 1, 0), 16);
        assert_eq!(grid.cluster_index(0, 0, 1), 16 * 9);
    }
}
