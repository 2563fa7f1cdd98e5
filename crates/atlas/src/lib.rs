//! Texture atlas layout.
//!
//! Resolves a material identifier to the pixel offset of its tile inside a
//! single packed image laid out as a horizontal strip of square tiles.
//!
//! # Invariants
//! - The material set is closed; every lookup is total.
//! - A missing or unknown entry resolves to the origin and is logged, never a panic.

mod atlas;

pub use atlas::{TexelOffset, TextureAtlas, TextureType};

pub fn crate_info() -> &'static str {
    "voxel-atlas v0.1.0"
}
