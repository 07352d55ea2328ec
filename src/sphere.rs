//! Procedural UV-sphere generation.
//!
//! [`SphereMesh::generate`] tessellates a sphere into latitude bands (pole to
//! pole) and longitude bands (around the equator). The output is kept as flat
//! attribute arrays, one entry per vertex, with 16-bit triangle indices:
//!
//! | Attribute    | Components | Notes                                   |
//! |--------------|------------|-----------------------------------------|
//! | `positions`  | 3 × f32    | `radius * normal + center`              |
//! | `normals`    | 3 × f32    | unit length                             |
//! | `tex_coords` | 2 × f32    | `u` flipped so the texture reads east   |
//! | `indices`    | u16        | clockwise seen from outside             |
//!
//! Both poles and the `lon = 0` seam are stored as full rows of duplicated
//! vertices, which keeps the equirectangular UV mapping trivial.
//!
//! # Example
//!
//! ```
//! use globeview::{SphereMesh, Vec3};
//!
//! let mesh = SphereMesh::generate(0.5, 2, 2, Vec3::ZERO).unwrap();
//! assert_eq!(mesh.vertex_count(), 9);
//! assert_eq!(mesh.triangle_count(), 8);
//! ```

use std::f32::consts::PI;

use glam::Vec3;

use crate::mesh::Vertex3d;

/// Largest vertex count addressable with `u16` indices.
pub const MAX_VERTICES: usize = u16::MAX as usize + 1;

/// Reasons a sphere cannot be generated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("sphere needs at least one latitude and one longitude band (got {latitude}x{longitude})")]
    ZeroBands { latitude: u32, longitude: u32 },

    #[error("sphere radius must be finite and non-negative (got {0})")]
    InvalidRadius(f32),

    #[error("sphere center must be finite (got {0})")]
    InvalidOffset(Vec3),

    #[error("{count} vertices do not fit in 16-bit indices (max {max})", max = MAX_VERTICES)]
    TooManyVertices { count: usize },
}

/// CPU-side sphere geometry, ready for upload.
#[derive(Clone, Debug, PartialEq)]
pub struct SphereMesh {
    /// Flat xyz triples, one per vertex.
    pub positions: Vec<f32>,
    /// Flat unit-length xyz triples parallel to `positions`.
    pub normals: Vec<f32>,
    /// Flat uv pairs parallel to `positions`.
    pub tex_coords: Vec<f32>,
    /// Triangle list, three indices per triangle.
    pub indices: Vec<u16>,
}

impl SphereMesh {
    /// Generates a UV sphere of `radius` centred on `center`.
    ///
    /// Produces `(latitude_bands + 1) * (longitude_bands + 1)` vertices and
    /// `2 * latitude_bands * longitude_bands` triangles.
    ///
    /// # Errors
    ///
    /// Fails without producing any geometry when a band count is zero, the
    /// radius is negative or not finite, the center is not finite, or the
    /// vertex count would overflow 16-bit indices.
    pub fn generate(
        radius: f32,
        latitude_bands: u32,
        longitude_bands: u32,
        center: Vec3,
    ) -> Result<Self, MeshError> {
        if latitude_bands == 0 || longitude_bands == 0 {
            return Err(MeshError::ZeroBands {
                latitude: latitude_bands,
                longitude: longitude_bands,
            });
        }
        if !radius.is_finite() || radius < 0.0 {
            return Err(MeshError::InvalidRadius(radius));
        }
        if !center.is_finite() {
            return Err(MeshError::InvalidOffset(center));
        }

        let count = Self::expected_vertex_count(latitude_bands, longitude_bands);
        if count > MAX_VERTICES {
            return Err(MeshError::TooManyVertices { count });
        }

        let mut positions = Vec::with_capacity(count * 3);
        let mut normals = Vec::with_capacity(count * 3);
        let mut tex_coords = Vec::with_capacity(count * 2);

        for lat in 0..=latitude_bands {
            let theta = lat as f32 * PI / latitude_bands as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();

            for lon in 0..=longitude_bands {
                let phi = lon as f32 * 2.0 * PI / longitude_bands as f32;
                let (sin_phi, cos_phi) = phi.sin_cos();

                let normal = Vec3::new(cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
                let position = normal * radius + center;

                let u = lon as f32 / longitude_bands as f32;
                let v = lat as f32 / latitude_bands as f32;

                positions.extend_from_slice(&position.to_array());
                normals.extend_from_slice(&normal.to_array());
                tex_coords.extend_from_slice(&[1.0 - u, v]);
            }
        }

        let stride = longitude_bands + 1;
        let mut indices =
            Vec::with_capacity((latitude_bands * longitude_bands * 6) as usize);

        // Checked above: every index is below MAX_VERTICES.
        for lat in 0..latitude_bands {
            for lon in 0..longitude_bands {
                let first = (lat * stride + lon) as u16;
                let second = first + stride as u16;

                indices.extend_from_slice(&[first, second, first + 1]);
                indices.extend_from_slice(&[second, second + 1, first + 1]);
            }
        }

        Ok(Self {
            positions,
            normals,
            tex_coords,
            indices,
        })
    }

    /// Number of vertices a sphere with the given tessellation would have.
    pub fn expected_vertex_count(latitude_bands: u32, longitude_bands: u32) -> usize {
        (latitude_bands as usize + 1) * (longitude_bands as usize + 1)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Position of vertex `i`.
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[i * 3..i * 3 + 3])
    }

    /// Normal of vertex `i`.
    pub fn normal(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.normals[i * 3..i * 3 + 3])
    }

    /// Texture coordinate of vertex `i`.
    pub fn tex_coord(&self, i: usize) -> [f32; 2] {
        [self.tex_coords[i * 2], self.tex_coords[i * 2 + 1]]
    }

    /// Interleaves the attribute arrays into the GPU vertex format.
    pub fn to_vertices(&self) -> Vec<Vertex3d> {
        (0..self.vertex_count())
            .map(|i| {
                Vertex3d::new(
                    self.position(i).to_array(),
                    self.normal(i).to_array(),
                    self.tex_coord(i),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn counts_follow_band_formula() {
        for (lat, lon) in [(1, 1), (2, 3), (8, 16), (30, 30)] {
            let mesh = SphereMesh::generate(1.0, lat, lon, Vec3::ZERO).unwrap();
            let vertices = ((lat + 1) * (lon + 1)) as usize;

            assert_eq!(mesh.vertex_count(), vertices);
            assert_eq!(mesh.normals.len(), vertices * 3);
            assert_eq!(mesh.tex_coords.len(), vertices * 2);
            assert_eq!(mesh.triangle_count(), (2 * lat * lon) as usize);
            assert_eq!(mesh.indices.len() % 3, 0);
            assert!(mesh.indices.iter().all(|&i| (i as usize) < vertices));
        }
    }

    #[test]
    fn normals_are_unit_and_match_positions() {
        let center = Vec3::new(1.5, -2.0, 0.25);
        let radius = 0.75;
        let mesh = SphereMesh::generate(radius, 12, 24, center).unwrap();

        for i in 0..mesh.vertex_count() {
            let n = mesh.normal(i);
            assert!((n.length() - 1.0).abs() < EPS, "vertex {i}: |n| = {}", n.length());

            let p = mesh.position(i) - center;
            assert!((p - n * radius).length() < EPS, "vertex {i}: {p} vs {n}");
        }
    }

    #[test]
    fn pole_rows_collapse_to_poles() {
        let bands = 6;
        let mesh = SphereMesh::generate(1.0, bands, bands, Vec3::ZERO).unwrap();
        let stride = (bands + 1) as usize;

        for lon in 0..stride {
            let north = mesh.position(lon);
            let south = mesh.position(bands as usize * stride + lon);
            assert!((north - Vec3::Y).length() < EPS, "north {lon}: {north}");
            assert!((south - Vec3::NEG_Y).length() < EPS, "south {lon}: {south}");
        }
    }

    #[test]
    fn small_sphere_scenario() {
        let mesh = SphereMesh::generate(0.5, 2, 2, Vec3::ZERO).unwrap();

        assert_eq!(mesh.vertex_count(), 9);
        assert_eq!(mesh.triangle_count(), 8);
        assert_eq!(mesh.indices.len(), 24);
        assert_eq!(&mesh.positions[..3], &[0.0, 0.5, 0.0]);
        assert_eq!(&mesh.indices[..6], &[0, 3, 1, 3, 4, 1]);
    }

    #[test]
    fn tex_coords_flip_u() {
        let mesh = SphereMesh::generate(1.0, 4, 4, Vec3::ZERO).unwrap();

        assert_eq!(mesh.tex_coord(0), [1.0, 0.0]);
        assert_eq!(mesh.tex_coord(4), [0.0, 0.0]);
        assert_eq!(mesh.tex_coord(mesh.vertex_count() - 1), [0.0, 1.0]);
    }

    #[test]
    fn generation_is_deterministic() {
        let a = SphereMesh::generate(2.0, 17, 9, Vec3::new(0.3, 0.0, 0.0)).unwrap();
        let b = SphereMesh::generate(2.0, 17, 9, Vec3::new(0.3, 0.0, 0.0)).unwrap();

        let bits = |v: &[f32]| v.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a.positions), bits(&b.positions));
        assert_eq!(bits(&a.normals), bits(&b.normals));
        assert_eq!(bits(&a.tex_coords), bits(&b.tex_coords));
        assert_eq!(a.indices, b.indices);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert_eq!(
            SphereMesh::generate(1.0, 0, 4, Vec3::ZERO),
            Err(MeshError::ZeroBands { latitude: 0, longitude: 4 })
        );
        assert!(matches!(
            SphereMesh::generate(1.0, 4, 0, Vec3::ZERO),
            Err(MeshError::ZeroBands { .. })
        ));
        assert!(matches!(
            SphereMesh::generate(f32::NAN, 4, 4, Vec3::ZERO),
            Err(MeshError::InvalidRadius(_))
        ));
        assert!(matches!(
            SphereMesh::generate(f32::INFINITY, 4, 4, Vec3::ZERO),
            Err(MeshError::InvalidRadius(_))
        ));
        assert!(matches!(
            SphereMesh::generate(-1.0, 4, 4, Vec3::ZERO),
            Err(MeshError::InvalidRadius(_))
        ));
        assert!(matches!(
            SphereMesh::generate(1.0, 4, 4, Vec3::new(f32::NAN, 0.0, 0.0)),
            Err(MeshError::InvalidOffset(_))
        ));
    }

    #[test]
    fn vertex_limit_is_enforced_at_the_boundary() {
        // 256 * 256 = 65536 vertices: the largest sphere u16 can index.
        let mesh = SphereMesh::generate(1.0, 255, 255, Vec3::ZERO).unwrap();
        assert_eq!(mesh.vertex_count(), MAX_VERTICES);
        assert_eq!(*mesh.indices.iter().max().unwrap() as usize, MAX_VERTICES - 1);

        assert_eq!(
            SphereMesh::generate(1.0, 256, 255, Vec3::ZERO),
            Err(MeshError::TooManyVertices { count: 257 * 256 })
        );
    }

    #[test]
    fn triangles_wind_clockwise_from_outside() {
        let mesh = SphereMesh::generate(1.0, 8, 12, Vec3::ZERO).unwrap();

        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| mesh.position(tri[k] as usize));
            let face = (b - a).cross(c - a);
            // Pole rows produce zero-area triangles.
            if face.length_squared() < 1e-10 {
                continue;
            }
            let centroid = (a + b + c) / 3.0;
            assert!(face.dot(centroid) < 0.0, "triangle {tri:?} faces outward");
        }
    }

    #[test]
    fn interleaved_vertices_mirror_attributes() {
        let mesh = SphereMesh::generate(0.5, 3, 5, Vec3::X).unwrap();
        let vertices = mesh.to_vertices();

        assert_eq!(vertices.len(), mesh.vertex_count());
        for (i, v) in vertices.iter().enumerate() {
            assert_eq!(v.position, mesh.position(i).to_array());
            assert_eq!(v.normal, mesh.normal(i).to_array());
            assert_eq!(v.uv, mesh.tex_coord(i));
        }
    }
}
