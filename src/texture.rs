use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tracing::warn;

use crate::gpu::{GpuContext, RendererError};

/// A GPU texture that can be bound to shaders.
#[derive(Debug)]
pub struct Texture {
    #[allow(dead_code)]
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Create a texture from raw RGBA data.
    ///
    /// Sampling wraps horizontally so the longitude seam is continuous and
    /// clamps vertically at the poles.
    pub fn from_rgba(gpu: &GpuContext, data: &[u8], width: u32, height: u32, label: &str) -> Self {
        use wgpu::util::DeviceExt;

        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            width,
            height,
        }
    }

    /// Upload a decoded image, downscaling it if it exceeds the device's
    /// maximum 2D texture size.
    pub fn from_image(gpu: &GpuContext, img: &RgbaImage, label: &str) -> Self {
        let max = gpu.device.limits().max_texture_dimension_2d;
        match fit_within(img, max) {
            Some(scaled) => {
                warn!(
                    "{label} is {}x{}, above the {max}px texture limit; downscaled to {}x{}",
                    img.width(),
                    img.height(),
                    scaled.width(),
                    scaled.height()
                );
                let (width, height) = scaled.dimensions();
                Self::from_rgba(gpu, &scaled, width, height, label)
            }
            None => {
                let (width, height) = img.dimensions();
                Self::from_rgba(gpu, img, width, height, label)
            }
        }
    }

    /// Load a texture from an image file.
    pub fn from_file(gpu: &GpuContext, path: &Path) -> Result<Self, RendererError> {
        let img = image::open(path)?.to_rgba8();
        Ok(Self::from_image(gpu, &img, &path.display().to_string()))
    }

    /// A black and white checkerboard with `squares` cells along each axis.
    pub fn checkerboard(gpu: &GpuContext, size: u32, squares: u32) -> Self {
        Self::from_image(gpu, &checkerboard_image(size, squares), "Checkerboard")
    }
}

/// Shrinks `img` so neither side exceeds `max`, keeping its aspect ratio.
///
/// Returns `None` when the image already fits.
pub fn fit_within(img: &RgbaImage, max: u32) -> Option<RgbaImage> {
    let (width, height) = img.dimensions();
    let longest = width.max(height);
    if longest <= max {
        return None;
    }

    let scale = max as f64 / longest as f64;
    let scaled = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max);
    Some(imageops::resize(img, scaled(width), scaled(height), FilterType::Triangle))
}

/// Square checkerboard image whose top-left cell is white.
pub fn checkerboard_image(size: u32, squares: u32) -> RgbaImage {
    let size = size.max(1);
    let squares = squares.clamp(1, size);
    RgbaImage::from_fn(size, size, |x, y| {
        let cell = x * squares / size + y * squares / size;
        if cell % 2 == 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_alternates_cells() {
        let img = checkerboard_image(100, 10);
        assert_eq!(img.dimensions(), (100, 100));

        let white = Rgba([255, 255, 255, 255]);
        let black = Rgba([0, 0, 0, 255]);
        assert_eq!(*img.get_pixel(0, 0), white);
        assert_eq!(*img.get_pixel(9, 9), white);
        assert_eq!(*img.get_pixel(10, 0), black);
        assert_eq!(*img.get_pixel(0, 10), black);
        assert_eq!(*img.get_pixel(10, 10), white);
        assert_eq!(*img.get_pixel(99, 0), black);
    }

    #[test]
    fn checkerboard_has_requested_cell_count() {
        let img = checkerboard_image(64, 4);
        let row: Vec<_> = (0..64).map(|x| img.get_pixel(x, 0)[0]).collect();
        let transitions = row.windows(2).filter(|w| w[0] != w[1]).count();
        assert_eq!(transitions, 3);
    }

    #[test]
    fn oversized_images_are_scaled_to_the_limit() {
        // Equirectangular 2:1, like a world map.
        let img = RgbaImage::from_pixel(300, 150, Rgba([10, 20, 30, 255]));

        let scaled = fit_within(&img, 120).unwrap();
        assert_eq!(scaled.dimensions(), (120, 60));
        let pixel = scaled.get_pixel(60, 30);
        for (got, want) in pixel.0.iter().zip([10u8, 20, 30, 255]) {
            assert!(got.abs_diff(want) <= 1, "{pixel:?}");
        }

        let tall = RgbaImage::new(10, 9000);
        assert_eq!(fit_within(&tall, 8192).unwrap().dimensions(), (9, 8192));
    }

    #[test]
    fn images_within_the_limit_are_kept() {
        assert!(fit_within(&RgbaImage::new(128, 64), 128).is_none());
        assert!(fit_within(&RgbaImage::new(1, 1), 1).is_none());
    }

    #[test]
    fn degenerate_sizes_are_clamped() {
        assert_eq!(checkerboard_image(0, 10).dimensions(), (1, 1));
        let img = checkerboard_image(2, 10);
        assert_ne!(img.get_pixel(0, 0), img.get_pixel(1, 0));
    }
}
