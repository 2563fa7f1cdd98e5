use std::path::{Path, PathBuf};

/// Errors from decoding an atlas image.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to load texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("texture {0} has zero size")]
    Empty(PathBuf),
    #[error("texture {path} is {width}x{height}, larger than the device limit of {max}")]
    TooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max: u32,
    },
}

/// Decode an image and flip it so row zero is the bottom of the picture.
///
/// Tile texture coordinates put v = 0 at the bottom edge.
pub fn decode_atlas(path: &Path) -> Result<image::RgbaImage, TextureError> {
    let img = image::open(path).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(TextureError::Empty(path.to_path_buf()));
    }
    Ok(image::imageops::flip_vertical(&rgba))
}

/// Decode an atlas and check it fits in a 2D texture no larger than
/// `max_dimension` on either side.
pub fn decode_atlas_within(
    path: &Path,
    max_dimension: u32,
) -> Result<image::RgbaImage, TextureError> {
    let image = decode_atlas(path)?;
    let (width, height) = image.dimensions();
    if width > max_dimension || height > max_dimension {
        return Err(TextureError::TooLarge {
            path: path.to_path_buf(),
            width,
            height,
            max: max_dimension,
        });
    }
    Ok(image)
}

/// 1x1 magenta image uploaded when the atlas can't be loaded.
pub fn placeholder() -> image::RgbaImage {
    image::RgbaImage::from_pixel(1, 1, image::Rgba([255, 0, 255, 255]))
}

/// Atlas texture, its sampler and the bind group exposing both at
/// `@group(1)`. The texture is destroyed when the wrapper is dropped.
pub struct AtlasTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

impl AtlasTexture {
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("atlas_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    /// Load the atlas from `path`. A missing, undecodable or oversized file
    /// is logged and replaced by [`placeholder`].
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        path: &Path,
    ) -> Self {
        let max_dimension = device.limits().max_texture_dimension_2d;
        let image = match decode_atlas_within(path, max_dimension) {
            Ok(image) => {
                tracing::info!(
                    "loaded atlas {} ({}x{})",
                    path.display(),
                    image.width(),
                    image.height()
                );
                image
            }
            Err(e) => {
                tracing::error!("{e}; using placeholder texture");
                placeholder()
            }
        };
        Self::from_image(device, queue, layout, &image)
    }

    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        image: &image::RgbaImage,
    ) -> Self {
        let (width, height) = image.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("atlas_texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // Repeat lets the 1x1 placeholder cover any texel coordinate.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("atlas_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("atlas_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self {
            texture,
            bind_group,
            width,
            height,
        }
    }

    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>, index: u32) {
        pass.set_bind_group(index, &self.bind_group, &[]);
    }

    /// Image size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for AtlasTexture {
    fn drop(&mut self) {
        self.texture.destroy();
        tracing::trace!("released atlas texture");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_decode_error() {
        let err = decode_atlas(Path::new("/nonexistent/atlas.png")).unwrap_err();
        assert!(matches!(err, TextureError::Decode { .. }));
    }

    #[test]
    fn decoded_image_is_flipped() {
        let tmp = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        let mut img = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255]));
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.save(tmp.path()).unwrap();

        let decoded = decode_atlas(tmp.path()).unwrap();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(decoded.get_pixel(0, 1), &image::Rgba([255, 0, 0, 255]));
        assert_eq!(decoded.get_pixel(0, 0), &image::Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn oversized_atlas_is_rejected() {
        let tmp = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        image::RgbaImage::from_pixel(9, 2, image::Rgba([0, 0, 0, 255]))
            .save(tmp.path())
            .unwrap();

        let err = decode_atlas_within(tmp.path(), 8).unwrap_err();
        assert!(matches!(
            err,
            TextureError::TooLarge { width: 9, height: 2, max: 8, .. }
        ));
        assert_eq!(decode_atlas_within(tmp.path(), 9).unwrap().dimensions(), (9, 2));
    }

    #[test]
    fn tall_atlas_is_rejected() {
        let tmp = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        image::RgbaImage::from_pixel(1, 5, image::Rgba([0, 0, 0, 255]))
            .save(tmp.path())
            .unwrap();
        assert!(matches!(
            decode_atlas_within(tmp.path(), 4),
            Err(TextureError::TooLarge { .. })
        ));
    }

    #[test]
    fn shipped_atlas_fits_default_limits() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/textures/texture_atlas.png");
        let max = wgpu::Limits::default().max_texture_dimension_2d;
        assert!(decode_atlas_within(&path, max).is_ok());
    }

    #[test]
    fn shipped_atlas_holds_three_tiles() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/textures/texture_atlas.png");
        let atlas = decode_atlas(&path).unwrap();
        assert_eq!(atlas.dimensions(), (48, 16));
    }

    #[test]
    fn placeholder_is_single_magenta_pixel() {
        let img = placeholder();
        assert_eq!(img.dimensions(), (1, 1));
        assert_eq!(img.get_pixel(0, 0), &image::Rgba([255, 0, 255, 255]));
    }
}
