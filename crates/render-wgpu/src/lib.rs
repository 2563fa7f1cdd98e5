//! wgpu render backend for the voxel viewer.
//!
//! Draws the atlas-textured cube. Every GPU resource is held by exactly one
//! owning wrapper and released when that wrapper is dropped.
//!
//! # Invariants
//! - Renderer never mutates camera state.
//! - Each shader stage is read and validated independently.
//! - Shader and texture load failures are logged and degrade to built-ins.

mod buffer;
mod gpu;
mod shader;
mod shaders;
mod texture;
mod uniforms;

pub use buffer::VertexBuffer;
pub use gpu::CubeRenderer;
pub use shader::{ShaderError, ShaderProgram, ShaderStage};
pub use texture::{AtlasTexture, TextureError};
pub use uniforms::{UniformBlock, Uniforms};

pub fn crate_info() -> &'static str {
    "voxel-render-wgpu v0.1.0"
}
