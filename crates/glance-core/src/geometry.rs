//! CPU-side geometry primitives.
//!
//! Geometry is immutable after construction and shared between the visible
//! mesh and its ID-scene twin through a [`GeometryHandle`], so the twin
//! renders exactly the visible footprint. Each geometry carries a unique id
//! used by the renderer as its GPU buffer cache key.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use glam::Vec3;

static NEXT_GEOMETRY_ID: AtomicU64 = AtomicU64::new(1);

/// A single vertex: position, normal, and texture coordinate.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Indexed triangle geometry.
#[derive(Debug, Clone)]
pub struct Geometry {
    id: u64,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Shared handle to immutable geometry.
pub type GeometryHandle = Arc<Geometry>;

impl Geometry {
    /// Wraps raw vertex/index data, assigning a fresh cache id.
    #[must_use]
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            id: NEXT_GEOMETRY_ID.fetch_add(1, Ordering::Relaxed),
            vertices,
            indices,
        }
    }

    /// Returns the unique cache id of this geometry.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// An axis-aligned box centered at the origin.
    #[must_use]
    pub fn cuboid(width: f32, height: f32, depth: f32) -> GeometryHandle {
        let (hw, hh, hd) = (width * 0.5, height * 0.5, depth * 0.5);

        // 6 faces, 4 vertices each, with per-face normals.
        // (normal, tangent, bitangent) triples span each face.
        let faces: [(Vec3, Vec3, Vec3); 6] = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        let half = Vec3::new(hw, hh, hd);

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, tangent, bitangent) in faces {
            let base = vertices.len() as u32;
            let center = normal * half;
            let ext_t = half.dot(tangent.abs());
            let ext_b = half.dot(bitangent.abs());
            for (u, v) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = center + tangent * (u * ext_t) + bitangent * (v * ext_b);
                vertices.push(Vertex {
                    position: p.to_array(),
                    normal: normal.to_array(),
                    uv: [(u + 1.0) * 0.5, (v + 1.0) * 0.5],
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Arc::new(Self::new(vertices, indices))
    }

    /// A flat rectangle in the XY plane, facing +Z.
    #[must_use]
    pub fn plane(width: f32, height: f32) -> GeometryHandle {
        let (hw, hh) = (width * 0.5, height * 0.5);
        let vertices = vec![
            Vertex { position: [-hw, -hh, 0.0], normal: [0.0, 0.0, 1.0], uv: [0.0, 1.0] },
            Vertex { position: [hw, -hh, 0.0], normal: [0.0, 0.0, 1.0], uv: [1.0, 1.0] },
            Vertex { position: [hw, hh, 0.0], normal: [0.0, 0.0, 1.0], uv: [1.0, 0.0] },
            Vertex { position: [-hw, hh, 0.0], normal: [0.0, 0.0, 1.0], uv: [0.0, 0.0] },
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];
        Arc::new(Self::new(vertices, indices))
    }

    /// A UV sphere centered at the origin.
    #[must_use]
    pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> GeometryHandle {
        let segments = segments.max(3);
        let rings = rings.max(2);

        let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
        for ring in 0..=rings {
            let v = ring as f32 / rings as f32;
            let phi = v * std::f32::consts::PI;
            for seg in 0..=segments {
                let u = seg as f32 / segments as f32;
                let theta = u * std::f32::consts::TAU;
                let dir = Vec3::new(
                    phi.sin() * theta.cos(),
                    phi.cos(),
                    phi.sin() * theta.sin(),
                );
                vertices.push(Vertex {
                    position: (dir * radius).to_array(),
                    normal: dir.to_array(),
                    uv: [u, v],
                });
            }
        }

        let mut indices = Vec::with_capacity((segments * rings * 6) as usize);
        let stride = segments + 1;
        for ring in 0..rings {
            for seg in 0..segments {
                let a = ring * stride + seg;
                let b = a + stride;
                indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
            }
        }

        Arc::new(Self::new(vertices, indices))
    }
}
