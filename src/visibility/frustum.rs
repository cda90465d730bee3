//! Frustum plane extraction and point/sphere/AABB tests (`spec.md` §4.5,
//! "FrustumCuller").
//!
//! Grounded on `myth::scene::camera::Frustum::from_matrix` (Gribb-Hartmann
//! extraction, p/n-vertex AABB trick), generalized to a standard
//! (non reverse-Z) zero-to-one clip-space convention so the far plane is a
//! real, always-normalized culling plane rather than the teacher's
//! degenerate "infinite far" case.

use glam::{Mat4, Vec3, Vec4};

use crate::mesh::bounds::Aabb;

/// Classification of an AABB against a frustum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AabbTest {
    Inside,
    Intersect,
    Outside,
}

/// Classification of a point or sphere against a frustum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointTest {
    Inside,
    Outside,
}

/// Six unit-length frustum planes `(nx, ny, nz, d)`, with the convention
/// that a point `p` is inside iff `dot(n, p) + d >= 0` for all six.
#[derive(Debug, Clone, Copy)]
pub struct FrustumCuller {
    planes: [Vec4; 6],
}

impl FrustumCuller {
    /// Extracts the six frustum planes from a `view_projection` matrix
    /// using a zero-to-one clip-space Z convention (`glam::Mat4::perspective_rh`
    /// / `glam::Mat4::orthographic_rh`).
    #[must_use]
    pub fn from_view_projection(view_projection: Mat4) -> Self {
        let rows = [
            view_projection.row(0),
            view_projection.row(1),
            view_projection.row(2),
            view_projection.row(3),
        ];

        let mut planes = [
            rows[3] + rows[0], // left
            rows[3] - rows[0], // right
            rows[3] + rows[1], // bottom
            rows[3] - rows[1], // top
            rows[2],           // near (z_clip >= 0)
            rows[3] - rows[2], // far  (z_clip <= w)
        ];

        for plane in &mut planes {
            let length = Vec3::new(plane.x, plane.y, plane.z).length();
            if length > 1e-6 {
                *plane /= length;
            }
        }

        Self { planes }
    }

    #[must_use]
    pub fn planes(&self) -> &[Vec4; 6] {
        &self.planes
    }

    #[must_use]
    pub fn test_point(&self, p: Vec3) -> PointTest {
        for plane in &self.planes {
            if plane_distance(plane, p) < 0.0 {
                return PointTest::Outside;
            }
        }
        PointTest::Inside
    }

    #[must_use]
    pub fn test_sphere(&self, center: Vec3, radius: f32) -> PointTest {
        for plane in &self.planes {
            if plane_distance(plane, center) < -radius {
                return PointTest::Outside;
            }
        }
        PointTest::Inside
    }

    /// p/n-vertex test: for each plane, the p-vertex (the AABB corner
    /// farthest along the plane normal) must not be outside, or the whole
    /// box is outside; if any plane's n-vertex (nearest corner) is outside,
    /// the box straddles that plane and the result is `Intersect`.
    #[must_use]
    pub fn test_aabb(&self, aabb: &Aabb) -> AabbTest {
        let mut intersecting = false;
        for plane in &self.planes {
            let p_vertex = Vec3::new(
                if plane.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if plane.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if plane.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );
            if plane_distance(plane, p_vertex) < 0.0 {
                return AabbTest::Outside;
            }

            let n_vertex = Vec3::new(
                if plane.x >= 0.0 { aabb.min.x } else { aabb.max.x },
                if plane.y >= 0.0 { aabb.min.y } else { aabb.max.y },
                if plane.z >= 0.0 { aabb.min.z } else { aabb.max.z },
            );
            if plane_distance(plane, n_vertex) < 0.0 {
                intersecting = true;
            }
        }
        if intersecting {
            AabbTest::Intersect
        } else {
            AabbTest::Inside
        }
    }
}

fn plane_distance(plane: &Vec4, p: Vec3) -> f32 {
    plane.x * p.x + plane.y * p.y + plane.z * p.z + plane.w
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    fn test_culler() -> FrustumCuller {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0);
        FrustumCuller::from_view_projection(proj * view)
    }

    #[test]
    fn plane_normals_are_unit_length() {
        let culler = test_culler();
        for plane in culler.planes() {
            let len = Vec3::new(plane.x, plane.y, plane.z).length();
            assert!((0.99..=1.01).contains(&len), "plane normal length {len} out of range");
        }
    }

    #[test]
    fn origin_box_is_not_outside() {
        let culler = test_culler();
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert_ne!(culler.test_aabb(&aabb), AabbTest::Outside);
    }

    #[test]
    fn box_behind_far_plane_is_outside() {
        let culler = test_culler();
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -100.0), Vec3::new(1.0, 1.0, -95.0));
        assert_eq!(culler.test_aabb(&aabb), AabbTest::Outside);
    }

    #[test]
    fn box_far_to_the_side_is_outside() {
        let culler = test_culler();
        let aabb = Aabb::new(Vec3::new(100.0, -1.0, -1.0), Vec3::new(102.0, 1.0, 1.0));
        assert_eq!(culler.test_aabb(&aabb), AabbTest::Outside);
    }

    #[test]
    fn sphere_at_origin_is_visible_sphere_further_is_not() {
        let culler = test_culler();
        assert_eq!(culler.test_sphere(Vec3::ZERO, 1.0), PointTest::Inside);
        assert_eq!(culler.test_sphere(Vec3::new(0.0, 0.0, 20.0), 1.0), PointTest::Outside);
    }
}
