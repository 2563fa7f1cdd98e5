//! Shared configuration for the voxel viewer crates.
//!
//! # Layout
//! A [`ViewerConfig`] is assembled from defaults, an optional YAML file and
//! command-line overrides, in that order.

mod config;

pub use config::{
    AtlasConfig, CameraConfig, ConfigError, ShaderConfig, ViewerConfig, WindowConfig,
};

pub fn crate_info() -> &'static str {
    "voxel-common v0.1.0"
}
