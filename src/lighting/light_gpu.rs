//! GPU-visible light record (`spec.md` §4.6, §3 "LightProxy" GPU mirror).
//!
//! Laid out the way [`crate::mesh::GpuInstance`] is: a plain-old-data
//! struct matching a fixed byte size so it can be `bytemuck`-cast straight
//! into a transient uniform/storage allocation.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::world::{LightKind, LightProxy};

/// Light kind tag as uploaded to the GPU.
pub const LIGHT_KIND_DIRECTIONAL: u32 = 0;
pub const LIGHT_KIND_POINT: u32 = 1;
pub const LIGHT_KIND_SPOT: u32 = 2;
pub const LIGHT_KIND_AREA: u32 = 3;

fn kind_tag(kind: LightKind) -> u32 {
    match kind {
        LightKind::Directional => LIGHT_KIND_DIRECTIONAL,
        LightKind::Point => LIGHT_KIND_POINT,
        LightKind::Spot => LIGHT_KIND_SPOT,
        LightKind::Area => LIGHT_KIND_AREA,
    }
}

/// A single light's GPU-resident, std140-compatible record. 64 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuLight {
    pub position: [f32; 3],
    pub range: f32,
    pub direction: [f32; 3],
    pub spot_angle_cos: f32,
    pub color: [f32; 3],
    pub intensity: f32,
    pub kind: u32,
    pub shadow_index: i32,
    pub _padding: [f32; 2],
}

impl From<&LightProxy> for GpuLight {
    fn from(light: &LightProxy) -> Self {
        Self {
            position: light.position.into(),
            range: light.range,
            direction: light.direction.into(),
            spot_angle_cos: light.outer_cone_cos(),
            color: light.color.into(),
            intensity: light.intensity,
            kind: kind_tag(light.kind),
            shadow_index: light.shadow_index,
            _padding: [0.0; 2],
        }
    }
}

impl GpuLight {
    #[must_use]
    pub fn position_v(&self) -> Vec3 {
        Vec3::from(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpu_light_is_64_bytes() {
        assert_eq!(std::mem::size_of::<GpuLight>(), 64);
    }
}
