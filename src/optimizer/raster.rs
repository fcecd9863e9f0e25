//! PNG and JPEG re-encoding

use anyhow::{bail, Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

/// Longest edge kept before an image is scaled down
pub const MAX_DIMENSION: u32 = 2000;

/// JPEG re-encode quality
pub const JPEG_QUALITY: u8 = 85;

/// Encoded output of one raster image
#[derive(Debug, Clone)]
pub struct RasterOutput {
    /// Image in its original format
    pub encoded: Vec<u8>,
    /// WebP copy of the same pixels
    pub webp: Vec<u8>,
    /// New dimensions when the image was scaled down
    pub resized: Option<(u32, u32)>,
}

#[derive(Debug, Clone)]
pub struct RasterEncoder {
    max_dimension: u32,
    jpeg_quality: u8,
}

impl Default for RasterEncoder {
    fn default() -> Self {
        Self { max_dimension: MAX_DIMENSION, jpeg_quality: JPEG_QUALITY }
    }
}

impl RasterEncoder {
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension.max(1);
        self
    }

    /// Decode `bytes`, scale down oversized images and encode them again
    ///
    /// `format` is the format the output keeps; only PNG and JPEG are
    /// accepted.
    pub fn encode(&self, bytes: &[u8], format: ImageFormat) -> Result<RasterOutput> {
        if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
            bail!("unsupported raster format {:?}", format);
        }

        let mut image = image::load_from_memory(bytes).context("decoding image")?;

        let resized = if image.width() > self.max_dimension || image.height() > self.max_dimension {
            image = image.resize(self.max_dimension, self.max_dimension, FilterType::Lanczos3);
            Some((image.width(), image.height()))
        } else {
            None
        };

        let encoded = match format {
            ImageFormat::Png => self.encode_png(&image)?,
            _ => self.encode_jpeg(&image)?,
        };
        let webp = encode_webp(&image)?;

        Ok(RasterOutput { encoded, webp, resized })
    }

    fn encode_png(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let encoder = PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, PngFilter::Adaptive);
        image.write_with_encoder(encoder).context("encoding PNG")?;
        Ok(buffer)
    }

    fn encode_jpeg(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        // JPEG has no alpha channel
        let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, self.jpeg_quality);
        rgb.write_with_encoder(encoder).context("encoding JPEG")?;
        Ok(buffer)
    }
}

fn encode_webp(image: &DynamicImage) -> Result<Vec<u8>> {
    let pixels = if image.color().has_alpha() {
        DynamicImage::ImageRgba8(image.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    };
    let mut buffer = Vec::new();
    pixels.write_with_encoder(WebPEncoder::new_lossless(&mut buffer)).context("encoding WebP")?;
    Ok(buffer)
}

/// Output format for a file extension, if it is a raster format we re-encode
pub fn format_for_extension(extension: &str) -> Option<ImageFormat> {
    match extension.to_ascii_lowercase().as_str() {
        "png" => Some(ImageFormat::Png),
        "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
        _ => None,
    }
}
