//! Interleaved vertex format of the globe meshes

use bytemuck::{Pod, Zeroable};

use globe_core::SphereGeometry;

/// Vertex for sphere rendering with position, normal, UV and barycentric
/// coordinates (zero unless the wireframe is on).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GlobeVertex {
    /// Vertex position in local space.
    pub position: [f32; 3],
    /// Vertex normal vector.
    pub normal: [f32; 3],
    /// Texture coordinate.
    pub uv: [f32; 2],
    /// Barycentric corner for the triangle wireframe.
    pub barycentric: [f32; 3],
}

impl GlobeVertex {
    /// Vertex attribute descriptors for the shader.
    pub const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &[
        wgpu::VertexAttribute {
            offset: std::mem::offset_of!(GlobeVertex, position) as u64,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: std::mem::offset_of!(GlobeVertex, normal) as u64,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: std::mem::offset_of!(GlobeVertex, uv) as u64,
            shader_location: 2,
            format: wgpu::VertexFormat::Float32x2,
        },
        wgpu::VertexAttribute {
            offset: std::mem::offset_of!(GlobeVertex, barycentric) as u64,
            shader_location: 3,
            format: wgpu::VertexFormat::Float32x3,
        },
    ];

    /// Returns the vertex buffer layout for this vertex type.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: Self::ATTRIBUTES,
        }
    }

    /// Interleave a geometry's buffers
    pub fn from_geometry(geometry: &SphereGeometry) -> Vec<Self> {
        let barycentric = geometry.barycentric();
        geometry
            .positions()
            .iter()
            .zip(geometry.normals())
            .zip(geometry.uvs())
            .enumerate()
            .map(|(i, ((&position, &normal), &uv))| GlobeVertex {
                position,
                normal,
                uv,
                barycentric: barycentric
                    .and_then(|b| b.get(i).copied())
                    .unwrap_or([0.0; 3]),
            })
            .collect()
    }
}
