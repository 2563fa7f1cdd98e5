//! Renderer-agnostic core of the voxel viewer.
//!
//! # Invariants
//! - Camera pitch stays within ±89 degrees and fov within [1, 45] degrees.
//! - The camera's look direction is unit length after every update.
//! - Nothing here depends on a graphics API; renderers consume [`FrameView`].

mod camera;
pub mod mesh;
mod renderer;

pub use camera::{FlyCamera, MAX_FOV, MIN_FOV, PITCH_LIMIT};
pub use mesh::{CubeVertex, cube_vertices, model_matrix};
pub use renderer::{DebugTextRenderer, FrameView, Renderer};

pub fn crate_info() -> &'static str {
    "voxel-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
