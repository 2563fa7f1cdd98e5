use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Material identifiers packed into the atlas, in strip order.
///
/// The discriminant is the tile index along the horizontal strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TextureType {
    Dirt = 0,
    GrassSide = 1,
    GrassTop = 2,
}

impl TextureType {
    /// Number of material identifiers.
    pub const COUNT: usize = 3;

    /// Every identifier, in declaration (and strip) order.
    pub const ALL: [TextureType; Self::COUNT] =
        [TextureType::Dirt, TextureType::GrassSide, TextureType::GrassTop];

    /// Tile index of this material within the strip.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Resolve a raw material id, as it would arrive from mesh or level data.
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(TextureType::Dirt),
            1 => Some(TextureType::GrassSide),
            2 => Some(TextureType::GrassTop),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TextureType::Dirt => "dirt",
            TextureType::GrassSide => "grass_side",
            TextureType::GrassTop => "grass_top",
        }
    }
}

impl std::fmt::Display for TextureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Pixel offset of a tile's origin within the atlas image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TexelOffset {
    pub x: u32,
    pub y: u32,
}

impl TexelOffset {
    pub const ORIGIN: TexelOffset = TexelOffset { x: 0, y: 0 };

    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// The offset as floats, the form the vertex stream carries it in.
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

/// Fixed mapping from [`TextureType`] to its tile offset.
///
/// The atlas is a single horizontal strip of square tiles, so every tile
/// sits on row zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureAtlas {
    tile_size: u32,
    offsets: [Option<TexelOffset>; TextureType::COUNT],
}

impl TextureAtlas {
    /// An atlas layout with no tiles assigned yet.
    pub fn new(tile_size: u32) -> Self {
        Self {
            tile_size,
            offsets: [None; TextureType::COUNT],
        }
    }

    /// Assign `(tile_size * index, 0)` to every material in declaration order.
    pub fn build_default(tile_size: u32) -> Self {
        let mut atlas = Self::new(tile_size);
        for texture in TextureType::ALL {
            atlas.set(texture, TexelOffset::new(tile_size * texture.index() as u32, 0));
        }
        atlas
    }

    /// Override the offset of a single material.
    pub fn set(&mut self, texture: TextureType, offset: TexelOffset) {
        self.offsets[texture.index()] = Some(offset);
    }

    /// Offset of `texture`, or the origin if it was never assigned.
    pub fn lookup(&self, texture: TextureType) -> TexelOffset {
        match self.offsets[texture.index()] {
            Some(offset) => offset,
            None => {
                tracing::warn!("no atlas tile assigned to {texture}, using origin offset");
                TexelOffset::ORIGIN
            }
        }
    }

    /// Offset for a raw material id. Unknown ids resolve to the origin.
    pub fn lookup_raw(&self, id: u32) -> TexelOffset {
        match TextureType::from_index(id) {
            Some(texture) => self.lookup(texture),
            None => {
                tracing::warn!("unknown texture id {id}, using origin offset");
                TexelOffset::ORIGIN
            }
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Minimum image width needed to hold every assigned tile.
    pub fn strip_width(&self) -> u32 {
        self.offsets
            .iter()
            .flatten()
            .map(|o| o.x + self.tile_size)
            .max()
            .unwrap_or(0)
    }

    /// Assigned materials and their offsets, in strip order.
    pub fn iter(&self) -> impl Iterator<Item = (TextureType, TexelOffset)> + '_ {
        TextureType::ALL
            .into_iter()
            .filter_map(move |t| self.offsets[t.index()].map(|o| (t, o)))
    }
}
