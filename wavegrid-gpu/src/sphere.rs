//! UV sphere geometry shared by every grid instance

use bytemuck::{Pod, Zeroable};
use std::f32::consts::PI;
use wavegrid_core::MAX_SPHERE_SEGMENTS;

/// Vertex data for the sphere mesh
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SphereVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl SphereVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Vertex buffer layout descriptor
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SphereVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Indexed triangle mesh of a sphere centred on the origin
#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u32>,
    pub radius: f32,
}

impl SphereMesh {
    /// Build a UV sphere.
    ///
    /// Rings run from the north pole (`+y`) to the south pole, each with
    /// `width_segments + 1` vertices so the seam has its own column. Triangles
    /// that would collapse at the poles are skipped. Front faces wind
    /// counter-clockwise seen from outside. Segment counts are clamped to
    /// `3..=MAX_SPHERE_SEGMENTS` and `2..=MAX_SPHERE_SEGMENTS`.
    pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.clamp(3, MAX_SPHERE_SEGMENTS);
        let height_segments = height_segments.clamp(2, MAX_SPHERE_SEGMENTS);

        let mut vertices = Vec::with_capacity((width_segments as usize + 1) * (height_segments as usize + 1));
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let (sin_theta, cos_theta) = (v * PI).sin_cos();
                let (sin_phi, cos_phi) = (u * 2.0 * PI).sin_cos();
                let normal = [-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta];
                vertices.push(SphereVertex {
                    position: [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                    normal,
                });
            }
        }

        let stride = width_segments + 1;
        let mut indices = Vec::new();
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * stride + ix + 1;
                let b = iy * stride + ix;
                let c = (iy + 1) * stride + ix;
                let d = (iy + 1) * stride + ix + 1;

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self {
            vertices,
            indices,
            radius,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    #[test]
    fn test_vertex_and_triangle_counts() {
        let mesh = SphereMesh::uv_sphere(0.07, 50, 50);
        assert_eq!(mesh.vertices.len(), 51 * 51);
        // Two triangles per quad, minus one per quad on each polar ring
        assert_eq!(mesh.triangle_count(), 2 * 50 * 50 - 2 * 50);
    }

    #[test]
    fn test_vertices_lie_on_sphere() {
        let mesh = SphereMesh::uv_sphere(0.07, 16, 12);
        for v in &mesh.vertices {
            let r = dot(v.position, v.position).sqrt();
            assert_relative_eq!(r, 0.07, epsilon = 1e-6);
            assert_relative_eq!(dot(v.normal, v.normal).sqrt(), 1.0, epsilon = 1e-6);
        }
        assert_relative_eq!(mesh.vertices[0].position[1], 0.07, epsilon = 1e-6);
        assert_relative_eq!(mesh.vertices.last().unwrap().position[1], -0.07, epsilon = 1e-6);
    }

    #[test]
    fn test_indices_in_bounds() {
        let mesh = SphereMesh::uv_sphere(1.0, 8, 6);
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    #[test]
    fn test_triangles_face_outward() {
        let mesh = SphereMesh::uv_sphere(1.0, 12, 8);
        for tri in mesh.indices.chunks(3) {
            let [p0, p1, p2] = [
                mesh.vertices[tri[0] as usize].position,
                mesh.vertices[tri[1] as usize].position,
                mesh.vertices[tri[2] as usize].position,
            ];
            let n = cross(sub(p1, p0), sub(p2, p0));
            let centroid = [
                (p0[0] + p1[0] + p2[0]) / 3.0,
                (p0[1] + p1[1] + p2[1]) / 3.0,
                (p0[2] + p1[2] + p2[2]) / 3.0,
            ];
            assert!(dot(n, centroid) > 0.0);
        }
    }

    #[test]
    fn test_segment_maximums() {
        let mesh = SphereMesh::uv_sphere(1.0, 70000, 3);
        let stride = MAX_SPHERE_SEGMENTS as usize + 1;
        assert_eq!(mesh.vertices.len(), stride * 4);
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
        assert_eq!(mesh.triangle_count(), 2 * 1024 * 3 - 2 * 1024);
    }

    #[test]
    fn test_segment_minimums() {
        let mesh = SphereMesh::uv_sphere(1.0, 1, 1);
        assert_eq!(mesh.vertices.len(), 4 * 3);
        assert!(mesh.triangle_count() > 0);
    }
}
