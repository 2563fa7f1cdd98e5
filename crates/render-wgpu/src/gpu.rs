use glam::Mat4;
use voxel_atlas::TextureAtlas;
use voxel_common::ViewerConfig;
use voxel_render::{FrameView, cube_vertices};

use crate::buffer::VertexBuffer;
use crate::shader::{ShaderProgram, ShaderStage};
use crate::texture::AtlasTexture;
use crate::uniforms::{UniformBlock, Uniforms};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// wgpu renderer for the atlas-textured cube.
///
/// Owns every GPU resource it draws with; all of them are created in
/// [`CubeRenderer::new`] and released when the renderer is dropped.
pub struct CubeRenderer {
    pipeline: wgpu::RenderPipeline,
    // Kept alive for the pipeline's lifetime.
    _program: ShaderProgram,
    uniforms: UniformBlock,
    atlas_texture: AtlasTexture,
    cube: VertexBuffer,
    depth_texture: wgpu::TextureView,
    tile_size: u32,
    clear_color: wgpu::Color,
}

impl CubeRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        config: &ViewerConfig,
        atlas: &TextureAtlas,
    ) -> Self {
        let uniform_layout = UniformBlock::bind_group_layout(device);
        let atlas_layout = AtlasTexture::bind_group_layout(device);
        let uniforms = UniformBlock::new(device, &uniform_layout);
        let atlas_texture = AtlasTexture::load(device, queue, &atlas_layout, &config.atlas.path);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &atlas_layout],
            push_constant_ranges: &[],
        });

        let program =
            ShaderProgram::from_files(device, &config.shaders.vertex, &config.shaders.fragment);
        let linked = Self::try_pipeline(device, &pipeline_layout, &program, surface_format);
        let (pipeline, program) = match linked {
            Some(pipeline) => (pipeline, program),
            None => {
                tracing::warn!("falling back to built-in shaders");
                let builtin = ShaderProgram::builtin(device);
                let pipeline =
                    Self::create_pipeline(device, &pipeline_layout, &builtin, surface_format);
                (pipeline, builtin)
            }
        };

        let vertices = cube_vertices(atlas);
        let cube = VertexBuffer::new(device, "cube_vertex_buffer", &vertices);
        let depth_texture = Self::create_depth_texture(device, width, height);

        let [r, g, b, a] = config.window.clear_color;
        Self {
            pipeline,
            _program: program,
            uniforms,
            atlas_texture,
            cube,
            depth_texture,
            tile_size: atlas.tile_size(),
            clear_color: wgpu::Color { r, g, b, a },
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Render one frame of the cube with the given model transform.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        frame: &FrameView,
        model: Mat4,
    ) {
        self.uniforms.write(
            queue,
            &Uniforms::new(
                model,
                frame.view,
                frame.projection,
                self.tile_size,
                self.atlas_texture.size(),
            ),
        );

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            self.uniforms.bind(&mut pass, 0);
            self.atlas_texture.bind(&mut pass, 1);
            self.cube.bind(&mut pass, 0);
            pass.draw(0..self.cube.vertex_count(), 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    /// Build the pipeline inside a validation scope so a user shader whose
    /// bindings don't match the layout is reported instead of aborting.
    fn try_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        program: &ShaderProgram,
        surface_format: wgpu::TextureFormat,
    ) -> Option<wgpu::RenderPipeline> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = Self::create_pipeline(device, layout, program, surface_format);
        match pollster::block_on(device.pop_error_scope()) {
            None => Some(pipeline),
            Some(e) => {
                tracing::error!("failed to link shader program: {e}");
                None
            }
        }
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        program: &ShaderProgram,
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cube_pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: program.vertex_module(),
                entry_point: Some(ShaderStage::Vertex.entry_point()),
                compilation_options: Default::default(),
                buffers: &[VertexBuffer::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: program.fragment_module(),
                entry_point: Some(ShaderStage::Fragment.entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}
