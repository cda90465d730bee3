//! Per-frame lighting uniform block (`spec.md` §4.6, "Lighting Uniforms").

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::lighting::cluster_grid::ClusterGrid;

/// Scene-wide ambient and sun terms plus the cluster-index transform
/// constants shaders use to map a fragment's screen position and view-space
/// depth into a cluster index with one MAD and one `log`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightingUniforms {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub sun_direction: [f32; 3],
    pub sun_intensity: f32,
    pub sun_color: [f32; 3],
    pub light_count: u32,
    pub cluster_scale: [f32; 2],
    pub cluster_bias: [f32; 2],
}

impl LightingUniforms {
    /// `ClusterScale = (GX/screen_w, GY/screen_h)`; `ClusterBias` encodes
    /// the logarithmic depth-to-slice transform
    /// `(log(far/near)/GZ, -log(near)*GZ/log(far/near))`.
    #[must_use]
    pub fn new(
        ambient_color: Vec3,
        ambient_intensity: f32,
        sun_direction: Vec3,
        sun_color: Vec3,
        sun_intensity: f32,
        light_count: u32,
        grid: &ClusterGrid,
        screen_size: (u32, u32),
    ) -> Self {
        let gx = grid.desc.gx as f32;
        let gy = grid.desc.gy as f32;
        let gz = grid.desc.gz as f32;
        let log_ratio = (grid.far / grid.near).ln();

        Self {
            ambient_color: ambient_color.into(),
            ambient_intensity,
            sun_direction: sun_direction.normalize_or_zero().into(),
            sun_intensity,
            sun_color: sun_color.into(),
            light_count,
            cluster_scale: [gx / screen_size.0.max(1) as f32, gy / screen_size.1.max(1) as f32],
            cluster_bias: [log_ratio / gz, -grid.near.ln() * gz / log_ratio],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::cluster_grid::ClusterGridDesc;

    #[test]
    fn cluster_bias_matches_spec_formula() {
        let grid = ClusterGrid::new(ClusterGridDesc { gx: 16, gy: 9, gz: 24 }, 0.1, 1000.0);
        let uniforms = LightingUniforms::new(Vec3::ZERO, 0.0, Vec3::NEG_Y, Vec3::ONE, 1.0, 0, &grid, (1920, 1080));

        let log_ratio = (1000.0f32 / 0.1).ln();
        let expected_0 = log_ratio / 24.0;
        let expected_1 = -(0.1f32).ln() * 24.0 / log_ratio;
        assert!((uniforms.cluster_bias[0] - expected_0).abs() < 1e-5);
        assert!((uniforms.cluster_bias[1] - expected_1).abs() < 1e-5);
    }

    #[test]
    fn cluster_scale_matches_screen_size() {
        let grid = ClusterGrid::new(ClusterGridDesc { gx: 16, gy: 9, gz: 24 }, 0.1, 1000.0);
        let uniforms = LightingUniforms::new(Vec3::ZERO, 0.0, Vec3::NEG_Y, Vec3::ONE, 1.0, 0, &grid, (1920, 1080));
        assert!((uniforms.cluster_scale[0] - 16.0 / 1920.0).abs() < 1e-6);
        assert!((uniforms.cluster_scale[1] - 9.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn layout_is_64_bytes() {
        assert_eq!(std::mem::size_of::<LightingUniforms>(), 64);
    }
}
