//! GPU upload of sphere geometry

use wgpu::util::DeviceExt;

use globe_core::SphereGeometry;

use crate::vertex::GlobeVertex;

/// Vertex and index buffers mirroring a [`SphereGeometry`]
pub struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_count: u32,
    index_count: u32,
}

impl GpuGeometry {
    /// Upload `geometry` and clear its dirty flag
    pub fn new(device: &wgpu::Device, geometry: &mut SphereGeometry) -> Self {
        geometry.take_dirty();
        let vertices = GlobeVertex::from_geometry(geometry);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globe Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globe Index Buffer"),
            contents: bytemuck::cast_slice(geometry.indices()),
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            vertex_buffer,
            index_buffer,
            vertex_count: vertices.len() as u32,
            index_count: geometry.indices().len() as u32,
        }
    }

    /// Re-upload if the geometry is dirty. Buffers are recreated when the
    /// vertex or index count changed (rebuild, wireframe de-indexing) and
    /// written in place otherwise. Returns whether anything was uploaded.
    pub fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        geometry: &mut SphereGeometry,
    ) -> bool {
        if !geometry.is_dirty() {
            return false;
        }
        let same_shape = geometry.vertex_count() as u32 == self.vertex_count
            && geometry.indices().len() as u32 == self.index_count;

        if !same_shape {
            *self = Self::new(device, geometry);
            tracing::debug!(
                "Recreated globe buffers ({} vertices, {} indices)",
                self.vertex_count,
                self.index_count
            );
            return true;
        }

        geometry.take_dirty();
        let vertices = GlobeVertex::from_geometry(geometry);
        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        queue.write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(geometry.indices()));
        true
    }

    /// Vertex buffer
    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }

    /// Index buffer (`u32` indices)
    pub fn index_buffer(&self) -> &wgpu::Buffer {
        &self.index_buffer
    }

    /// Number of vertices uploaded
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Number of indices to draw
    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

/// Request a device from any available adapter, without a surface.
///
/// Returns `None` on machines without a usable GPU backend.
pub async fn request_headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await?;
    adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Globe Device"),
                ..Default::default()
            },
            None,
        )
        .await
        .map_err(|e| tracing::warn!("Failed to create device: {}", e))
        .ok()
}
