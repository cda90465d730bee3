//! Axis-aligned bounding box, shared by mesh bounds and proxy world-space
//! extents (`spec.md` §3, §4.4).

use glam::{Affine3A, Vec3};

/// Grounded on `myth::resources::geometry::BoundingBox`: `min`/`max` corners,
/// `union`, and an 8-corner transform rather than tracking an oriented box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn bounding_sphere_radius(&self) -> f32 {
        self.extents().length()
    }

    #[must_use]
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn encapsulate(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Transforms the box's 8 corners and re-derives a tight world-space
    /// AABB from their min/max.
    #[must_use]
    pub fn transform(&self, transform: &Affine3A) -> Aabb {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];
        let mut result = Aabb::EMPTY;
        for corner in corners {
            result.encapsulate(transform.transform_point3(corner));
        }
        result
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
