//! GPU vertex format and uploaded mesh buffers.
//!
//! # Vertex Layout
//!
//! [`Vertex3d`] is 32 bytes:
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |
//! | normal    | Float32x3 | 12     | 1               |
//! | uv        | Float32x2 | 24     | 2               |

use crate::gpu::GpuContext;
use crate::sphere::SphereMesh;

/// One interleaved vertex as the sphere pipeline reads it.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    pub position: [f32; 3],
    /// Unit-length surface normal.
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex3d {
    /// Vertex buffer layout matching the attribute table above.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Geometry living in GPU vertex and index buffers.
///
/// Indices are 16-bit, so a mesh addresses at most 65 536 vertices.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Mesh {
    /// Uploads raw vertex and index data.
    pub fn new(gpu: &GpuContext, vertices: &[Vertex3d], indices: &[u16]) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        // wgpu requires buffer sizes to be multiples of 4 bytes; an odd number
        // of u16 indices gets one padding element that is never drawn.
        let mut padded;
        let index_data = if indices.len() % 2 == 1 {
            padded = indices.to_vec();
            padded.push(0);
            &padded[..]
        } else {
            indices
        };

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(index_data),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// Uploads a generated sphere.
    pub fn from_sphere(gpu: &GpuContext, sphere: &SphereMesh) -> Self {
        Self::new(gpu, &sphere.to_vertices(), &sphere.indices)
    }

    pub(crate) fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_matches_struct() {
        assert_eq!(std::mem::size_of::<Vertex3d>(), 32);
        assert_eq!(Vertex3d::LAYOUT.array_stride, 32);
        assert_eq!(std::mem::offset_of!(Vertex3d, normal), 12);
        assert_eq!(std::mem::offset_of!(Vertex3d, uv), 24);
    }

    #[test]
    fn vertices_cast_to_flat_floats() {
        let vertices = [
            Vertex3d::new([0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0]),
            Vertex3d::new([1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 0.5]),
        ];
        let floats: &[f32] = bytemuck::cast_slice(&vertices);

        assert_eq!(floats.len(), 16);
        assert_eq!(&floats[8..11], &[1.0, 0.0, 0.0]);
        assert_eq!(&floats[14..], &[0.5, 0.5]);
    }
}
