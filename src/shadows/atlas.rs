//! Shadow atlas allocation for local (point/spot) lights (`spec.md` §4.7,
//! "Shadow Atlas").

use glam::Mat4;
use rustc_hash::FxHashMap;

/// Minimum atlas tile size in texels.
pub const MIN_REGION_SIZE: u32 = 256;
/// Maximum atlas tile size in texels.
pub const MAX_REGION_SIZE: u32 = 1024;

/// A single allocated atlas region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowRegion {
    pub x: u32,
    pub y: u32,
    pub size: u32,
    pub view_projection: Mat4,
    pub near: f32,
    pub far: f32,
}

impl ShadowRegion {
    fn overlaps(&self, other: &ShadowRegion) -> bool {
        self.x < other.x + other.size && other.x < self.x + self.size && self.y < other.y + other.size && other.y < self.y + self.size
    }
}

/// Rounds `requested` up to the next power of two, clamped to
/// `[MIN_REGION_SIZE, MAX_REGION_SIZE]` (`spec.md` §4.7).
#[must_use]
pub fn region_size_for(requested: u32) -> u32 {
    requested.max(1).next_power_of_two().clamp(MIN_REGION_SIZE, MAX_REGION_SIZE)
}

/// A single `S x S` depth texture subdivided into `region_size_for`-sized
/// tiles, allocated in scan order (`spec.md` §4.7). Grounded on the
/// generic quad-tree/bin region allocation called out in the spec; no
/// teacher module implements a shadow atlas (the teacher uses one depth
/// array per light instead), so the allocator here is written directly
/// against the testable property in `spec.md` §8.
pub struct ShadowAtlas {
    atlas_size: u32,
    regions: FxHashMap<u32, ShadowRegion>,
}

impl ShadowAtlas {
    #[must_use]
    pub fn new(atlas_size: u32) -> Self {
        Self { atlas_size, regions: FxHashMap::default() }
    }

    /// Frees every region from the previous frame; must run before this
    /// frame's allocations (`spec.md` §4.7, "Freed on begin_frame").
    pub fn begin_frame(&mut self) {
        self.regions.clear();
    }

    /// Allocates a region of (at least) `requested_size` texels for
    /// `light_index`, returning `None` if the atlas has no tile of that
    /// size left. Scans tiles of `region_size_for(requested_size)` in
    /// row-major order and returns the first unoccupied one.
    pub fn allocate(&mut self, light_index: u32, requested_size: u32, view_projection: Mat4, near: f32, far: f32) -> Option<ShadowRegion> {
        let size = region_size_for(requested_size);
        let tiles_per_row = self.atlas_size / size;
        if tiles_per_row == 0 {
            return None;
        }

        for row in 0..tiles_per_row {
            for col in 0..tiles_per_row {
                let candidate = ShadowRegion { x: col * size, y: row * size, size, view_projection, near, far };
                if !self.regions.values().any(|r| r.overlaps(&candidate)) {
                    self.regions.insert(light_index, candidate);
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// Allocates six contiguous same-size regions for a point light's cube
    /// faces (`spec.md` §4.7, "Point Lights"). `light_index` is combined
    /// with the face index (`light_index * 6 + face`) as the map key.
    pub fn allocate_point_light_faces(&mut self, light_index: u32, requested_size: u32, face_view_projections: &[Mat4; 6], near: f32, far: f32) -> Option<[ShadowRegion; 6]> {
        let mut faces = [ShadowRegion { x: 0, y: 0, size: 0, view_projection: Mat4::IDENTITY, near, far }; 6];
        for (face, vp) in face_view_projections.iter().enumerate() {
            let key = light_index * 6 + face as u32;
            faces[face] = self.allocate(key, requested_size, *vp, near, far)?;
        }
        Some(faces)
    }

    #[must_use]
    pub fn region_for(&self, light_index: u32) -> Option<&ShadowRegion> {
        self.regions.get(&light_index)
    }

    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn total_occupied_area(&self) -> u64 {
        self.regions.values().map(|r| u64::from(r.size) * u64::from(r.size)).sum()
    }

    /// UV-space transform `(scale_x, scale_y, offset_x, offset_y)` mapping
    /// a `[0,1]` shadow-map UV into this region's slice of the atlas.
    #[must_use]
    pub fn uv_transform(&self, light_index: u32) -> Option<(f32, f32, f32, f32)> {
        let region = self.regions.get(&light_index)?;
        let s = self.atlas_size as f32;
        Some((region.size as f32 / s, region.size as f32 / s, region.x as f32 / s, region.y as f32 / s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_size_rounds_up_and_clamps() {
        assert_eq!(region_size_for(100), MIN_REGION_SIZE);
        assert_eq!(region_size_for(300), 512);
        assert_eq!(region_size_for(2048), MAX_REGION_SIZE);
    }

    #[test]
    fn spec_allocation_scenario_matches_literal_area() {
        let mut atlas = ShadowAtlas::new(4096);
        let requests = [512u32, 256, 1024, 512, 256];
        let mut regions = Vec::new();
        for (i, &size) in requests.iter().enumerate() {
            let region = atlas.allocate(i as u32, size, Mat4::IDENTITY, 0.1, 100.0).expect("atlas has room");
            regions.push(region);
        }

        for i in 0..regions.len() {
            for j in (i + 1)..regions.len() {
                assert!(!regions[i].overlaps(&regions[j]), "regions {i} and {j} overlap");
            }
        }

        // 512^2 + 256^2 + 1024^2 + 512^2 + 256^2 = 1,703,936.
        assert_eq!(atlas.total_occupied_area(), 512 * 512 + 256 * 256 + 1024 * 1024 + 512 * 512 + 256 * 256);
        assert_eq!(atlas.total_occupied_area(), 1_703_936);
    }

    #[test]
    fn begin_frame_clears_all_regions() {
        let mut atlas = ShadowAtlas::new(2048);
        atlas.allocate(0, 512, Mat4::IDENTITY, 0.1, 100.0);
        assert_eq!(atlas.region_count(), 1);
        atlas.begin_frame();
        assert_eq!(atlas.region_count(), 0);
    }
}
