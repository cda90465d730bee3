//! Standard-layout primitive builders (`spec.md` §4.4, "Primitives").
//!
//! Grounded on `myth::resources::primitives::{box_shape, plane, sphere}`,
//! generalized to emit the crate's `CpuMesh`/`VertexLayout::Standard`
//! contract instead of the teacher's `Attribute`-based geometry.

use glam::Vec3;

use crate::mesh::bounds::Aabb;
use crate::mesh::cpu_mesh::{CpuMesh, IndexFormat, SubMesh, VertexLayout};

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct StandardVertex {
    position: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
    color: [f32; 4],
    tangent: [f32; 4],
}

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

fn vertex(position: Vec3, normal: Vec3, uv: [f32; 2], tangent: [f32; 4]) -> StandardVertex {
    StandardVertex {
        position: position.to_array(),
        normal: normal.to_array(),
        uv,
        color: WHITE,
        tangent,
    }
}

fn build(vertices: Vec<StandardVertex>, indices: Vec<u16>) -> CpuMesh {
    let mut bounds = Aabb::EMPTY;
    for v in &vertices {
        bounds.encapsulate(Vec3::from_array(v.position));
    }
    CpuMesh {
        layout: VertexLayout::Standard,
        vertex_bytes: bytemuck::cast_slice(&vertices).to_vec(),
        index_bytes: bytemuck::cast_slice(&indices).to_vec(),
        index_format: IndexFormat::U16,
        submeshes: vec![SubMesh {
            first_index: 0,
            index_count: indices.len() as u32,
            material_slot: 0,
        }],
        bounds,
    }
}

/// A unit cube centered on the origin: 24 vertices (4 per face, so each
/// face has its own normal/UV/tangent), 36 indices.
#[must_use]
pub fn cube(half_extent: f32) -> CpuMesh {
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, tangent_dir, bitangent_dir) in faces {
        let base = vertices.len() as u16;
        let center = normal * half_extent;
        let corners = [
            center - tangent_dir * half_extent - bitangent_dir * half_extent,
            center + tangent_dir * half_extent - bitangent_dir * half_extent,
            center + tangent_dir * half_extent + bitangent_dir * half_extent,
            center - tangent_dir * half_extent + bitangent_dir * half_extent,
        ];
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let tangent = [tangent_dir.x, tangent_dir.y, tangent_dir.z, 1.0];
        for (corner, uv) in corners.into_iter().zip(uvs) {
            vertices.push(vertex(corner, normal, uv, tangent));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    build(vertices, indices)
}

/// A flat quad on the XZ plane, facing +Y: 4 vertices, 6 indices.
#[must_use]
pub fn plane(width: f32, depth: f32) -> CpuMesh {
    let hw = width * 0.5;
    let hd = depth * 0.5;
    let normal = Vec3::Y;
    let tangent = [1.0, 0.0, 0.0, 1.0];
    let vertices = vec![
        vertex(Vec3::new(-hw, 0.0, -hd), normal, [0.0, 0.0], tangent),
        vertex(Vec3::new(hw, 0.0, -hd), normal, [1.0, 0.0], tangent),
        vertex(Vec3::new(hw, 0.0, hd), normal, [1.0, 1.0], tangent),
        vertex(Vec3::new(-hw, 0.0, hd), normal, [0.0, 1.0], tangent),
    ];
    build(vertices, vec![0, 1, 2, 0, 2, 3])
}

/// A UV sphere with `lat_segments` latitude rings and `long_segments`
/// longitude divisions.
#[must_use]
pub fn sphere(radius: f32, lat_segments: u32, long_segments: u32) -> CpuMesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for lat in 0..=lat_segments {
        let theta = std::f32::consts::PI * lat as f32 / lat_segments as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        for lon in 0..=long_segments {
            let phi = 2.0 * std::f32::consts::PI * lon as f32 / long_segments as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            let normal = Vec3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi);
            let position = normal * radius;
            let uv = [lon as f32 / long_segments as f32, lat as f32 / lat_segments as f32];
            let tangent = [-sin_phi, 0.0, cos_phi, 1.0];
            vertices.push(vertex(position, normal, uv, tangent));
        }
    }

    let stride = long_segments + 1;
    for lat in 0..lat_segments {
        for lon in 0..long_segments {
            let a = (lat * stride + lon) as u16;
            let b = (lat * stride + lon + 1) as u16;
            let c = ((lat + 1) * stride + lon) as u16;
            let d = ((lat + 1) * stride + lon + 1) as u16;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }

    build(vertices, indices)
}

/// A capped cylinder along the Y axis.
#[must_use]
pub fn cylinder(radius: f32, height: f32, radial_segments: u32) -> CpuMesh {
    let half_height = height * 0.5;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=1u32 {
        let y = if ring == 0 { -half_height } else { half_height };
        for seg in 0..=radial_segments {
            let angle = 2.0 * std::f32::consts::PI * seg as f32 / radial_segments as f32;
            let (sin_a, cos_a) = angle.sin_cos();
            let normal = Vec3::new(cos_a, 0.0, sin_a);
            let position = Vec3::new(cos_a * radius, y, sin_a * radius);
            let uv = [seg as f32 / radial_segments as f32, ring as f32];
            let tangent = [-sin_a, 0.0, cos_a, 1.0];
            vertices.push(vertex(position, normal, uv, tangent));
        }
    }

    let stride = radial_segments + 1;
    for seg in 0..radial_segments {
        let a = seg as u16;
        let b = (seg + 1) as u16;
        let c = (stride + seg) as u16;
        let d = (stride + seg + 1) as u16;
        indices.extend_from_slice(&[a, c, b, b, c, d]);
    }

    build(vertices, indices)
}

/// A torus around the Y axis.
#[must_use]
pub fn torus(major_radius: f32, minor_radius: f32, major_segments: u32, minor_segments: u32) -> CpuMesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for major in 0..=major_segments {
        let major_angle = 2.0 * std::f32::consts::PI * major as f32 / major_segments as f32;
        let (sin_major, cos_major) = major_angle.sin_cos();
        let ring_center = Vec3::new(cos_major * major_radius, 0.0, sin_major * major_radius);
        for minor in 0..=minor_segments {
            let minor_angle = 2.0 * std::f32::consts::PI * minor as f32 / minor_segments as f32;
            let (sin_minor, cos_minor) = minor_angle.sin_cos();
            let normal = Vec3::new(cos_minor * cos_major, sin_minor, cos_minor * sin_major);
            let position = Vec3::new(
                ring_center.x + cos_minor * minor_radius * cos_major,
                sin_minor * minor_radius,
                ring_center.z + cos_minor * minor_radius * sin_major,
            );
            let uv = [
                major as f32 / major_segments as f32,
                minor as f32 / minor_segments as f32,
            ];
            let tangent = [-sin_major, 0.0, cos_major, 1.0];
            vertices.push(vertex(position, normal, uv, tangent));
        }
    }

    let stride = minor_segments + 1;
    for major in 0..major_segments {
        for minor in 0..minor_segments {
            let a = (major * stride + minor) as u16;
            let b = (major * stride + minor + 1) as u16;
            let c = ((major + 1) * stride + minor) as u16;
            let d = ((major + 1) * stride + minor + 1) as u16;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }

    build(vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_24_vertices_and_36_indices() {
        let mesh = cube(0.5);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
    }

    #[test]
    fn plane_has_4_vertices_and_6_indices() {
        let mesh = plane(1.0, 1.0);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.index_count(), 6);
    }

    #[test]
    fn sphere_index_count_matches_quad_grid() {
        let mesh = sphere(1.0, 8, 16);
        assert_eq!(mesh.index_count(), 8 * 16 * 6);
    }
}
