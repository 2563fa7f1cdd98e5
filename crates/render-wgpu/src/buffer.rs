use voxel_render::CubeVertex;
use wgpu::util::DeviceExt;

const CUBE_ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x2,
    2 => Float32x2,
];

/// Static vertex buffer holding interleaved [`CubeVertex`] data.
///
/// The buffer is destroyed when the wrapper is dropped.
pub struct VertexBuffer {
    buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl VertexBuffer {
    pub fn new(device: &wgpu::Device, label: &str, vertices: &[CubeVertex]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        tracing::debug!("created vertex buffer {label} ({} vertices)", vertices.len());
        Self {
            buffer,
            vertex_count: vertices.len() as u32,
        }
    }

    /// Layout matching `@location(0..3)` of the vertex stage.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CubeVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &CUBE_ATTRIBUTES,
        }
    }

    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>, slot: u32) {
        pass.set_vertex_buffer(slot, self.buffer.slice(..));
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        self.buffer.destroy();
        tracing::trace!("released vertex buffer");
    }
}
