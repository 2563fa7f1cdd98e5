use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

/// Per-frame uniform values, laid out to match `Uniforms` in both stages.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// Tile size, atlas width, atlas height, padding.
    pub atlas: [f32; 4],
}

impl Uniforms {
    pub fn new(
        model: Mat4,
        view: Mat4,
        projection: Mat4,
        tile_size: u32,
        atlas_size: (u32, u32),
    ) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            atlas: [tile_size as f32, atlas_size.0 as f32, atlas_size.1 as f32, 0.0],
        }
    }
}

impl Default for Uniforms {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY, 1, (1, 1))
    }
}

/// Uniform buffer plus the bind group exposing it at `@group(0) @binding(0)`.
pub struct UniformBlock {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl UniformBlock {
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }

    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    pub fn write(&self, queue: &wgpu::Queue, uniforms: &Uniforms) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniforms));
    }

    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>, index: u32) {
        pass.set_bind_group(index, &self.bind_group, &[]);
    }
}

impl Drop for UniformBlock {
    fn drop(&mut self) {
        self.buffer.destroy();
        tracing::trace!("released uniform buffer");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_sixteen_byte_aligned() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 3 * 64 + 16);
        assert_eq!(std::mem::size_of::<Uniforms>() % 16, 0);
    }

    #[test]
    fn atlas_parameters_are_packed_as_floats() {
        let u = Uniforms::new(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY, 16, (48, 16));
        assert_eq!(u.atlas, [16.0, 48.0, 16.0, 0.0]);
    }
}
