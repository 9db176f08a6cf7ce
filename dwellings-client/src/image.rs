//! Image Preparation Pipeline
//!
//! Turns a user-selected image into a bounded JPEG `data:` URL before it is
//! sent anywhere. The steps are split so each can be tested on its own:
//!
//! - [`decode`]: raw bytes, file or `data:` URL into a bitmap
//! - [`resize`] / [`square_thumbnail`]: bitmap to bitmap, downscale only
//! - [`encode_jpeg`]: bitmap to JPEG bytes
//! - [`to_data_url`]: JPEG bytes to the wire string
//!
//! [`compress`] and [`compress_square`] chain them on a blocking thread.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use std::io::Cursor;
use std::path::PathBuf;
use thiserror::Error;

/// Listing photos: longest side
pub const LISTING_MAX_DIMENSION: u32 = 1920;

/// Listing photos: JPEG quality
pub const LISTING_QUALITY: f32 = 0.8;

/// Product thumbnails: square canvas side
pub const THUMBNAIL_SIZE: u32 = 800;

/// Product thumbnails: JPEG quality
pub const THUMBNAIL_QUALITY: f32 = 0.85;

/// Letterbox fill for square thumbnails
const THUMBNAIL_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Failed to read image file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Image task failed: {0}")]
    Task(String),
}

/// Where an image comes from
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Encoded file contents (PNG, JPEG, WebP, ...)
    Bytes(Vec<u8>),
    /// `data:<mime>;base64,<payload>`
    DataUrl(String),
    /// Path to an image file
    File(PathBuf),
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

/// Decode any source into a bitmap.
pub fn decode(source: &ImageSource) -> Result<DynamicImage, ImageError> {
    let bytes = match source {
        ImageSource::Bytes(bytes) => return load(bytes),
        ImageSource::DataUrl(url) => decode_data_url(url)?,
        ImageSource::File(path) => std::fs::read(path)?,
    };
    load(&bytes)
}

fn load(bytes: &[u8]) -> Result<DynamicImage, ImageError> {
    image::load_from_memory(bytes).map_err(ImageError::Decode)
}

/// Target size that fits `max_dimension` on both sides, keeping the aspect
/// ratio. Never larger than the source; a zero bound is treated as 1px.
pub fn fit_within(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let max_dimension = max_dimension.max(1);
    if width <= max_dimension && height <= max_dimension {
        return (width, height);
    }
    if width >= height {
        let scaled = (height as f64 * max_dimension as f64 / width as f64).round() as u32;
        (max_dimension, scaled.max(1))
    } else {
        let scaled = (width as f64 * max_dimension as f64 / height as f64).round() as u32;
        (scaled.max(1), max_dimension)
    }
}

/// Downscale so that neither side exceeds `max_dimension`.
pub fn resize(img: &DynamicImage, max_dimension: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    let (target_w, target_h) = fit_within(width, height, max_dimension);
    if (target_w, target_h) == (width, height) {
        return img.clone();
    }
    img.resize_exact(target_w, target_h, FilterType::Triangle)
}

/// Center-crop to a square, downscale to at most `size`, and letterbox onto
/// a `size` x `size` white canvas.
pub fn square_thumbnail(img: &DynamicImage, size: u32) -> DynamicImage {
    let size = size.max(1);
    let (width, height) = img.dimensions();
    let side = width.min(height);
    let cropped = img.crop_imm((width - side) / 2, (height - side) / 2, side, side);
    let scaled = resize(&cropped, size).to_rgb8();

    let mut canvas = RgbImage::from_pixel(size, size, THUMBNAIL_BACKGROUND);
    let x = i64::from((size - scaled.width()) / 2);
    let y = i64::from((size - scaled.height()) / 2);
    imageops::overlay(&mut canvas, &scaled, x, y);
    DynamicImage::ImageRgb8(canvas)
}

/// Map a `0.0..=1.0` quality onto the encoder's `1..=100` scale.
fn jpeg_quality(quality: f32) -> u8 {
    (quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode as baseline JPEG. Alpha is dropped.
pub fn encode_jpeg(img: &DynamicImage, quality: f32) -> Result<Vec<u8>, ImageError> {
    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = JpegEncoder::new_with_quality(&mut cursor, jpeg_quality(quality));
        rgb_img
            .write_with_encoder(encoder)
            .map_err(ImageError::Encode)?;
    }
    Ok(buffer)
}

pub fn to_data_url(jpeg: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg))
}

/// Split a `data:` URL into its MIME type and decoded payload.
pub fn parse_data_url(url: &str) -> Result<(String, Vec<u8>), ImageError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| ImageError::InvalidDataUrl("missing 'data:' prefix".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageError::InvalidDataUrl("missing ','".into()))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| ImageError::InvalidDataUrl("payload is not base64".into()))?;
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| ImageError::InvalidDataUrl(e.to_string()))?;
    Ok((mime.to_string(), bytes))
}

fn decode_data_url(url: &str) -> Result<Vec<u8>, ImageError> {
    parse_data_url(url).map(|(_, bytes)| bytes)
}

/// Resize and re-encode one image as a JPEG data URL.
pub fn compress_blocking(
    source: &ImageSource,
    max_dimension: u32,
    quality: f32,
) -> Result<String, ImageError> {
    let img = decode(source)?;
    let resized = resize(&img, max_dimension);
    let jpeg = encode_jpeg(&resized, quality)?;
    tracing::debug!(
        from = ?img.dimensions(),
        to = ?resized.dimensions(),
        bytes = jpeg.len(),
        "Compressed image"
    );
    Ok(to_data_url(&jpeg))
}

/// [`compress_blocking`] on the blocking pool.
pub async fn compress(
    source: ImageSource,
    max_dimension: u32,
    quality: f32,
) -> Result<String, ImageError> {
    tokio::task::spawn_blocking(move || compress_blocking(&source, max_dimension, quality))
        .await
        .map_err(|e| ImageError::Task(e.to_string()))?
}

/// Listing photo preset (1920px, 0.8)
pub async fn compress_listing_photo(source: ImageSource) -> Result<String, ImageError> {
    compress(source, LISTING_MAX_DIMENSION, LISTING_QUALITY).await
}

/// Square thumbnail as a JPEG data URL.
pub fn compress_square_blocking(
    source: &ImageSource,
    size: u32,
    quality: f32,
) -> Result<String, ImageError> {
    let img = decode(source)?;
    let jpeg = encode_jpeg(&square_thumbnail(&img, size), quality)?;
    Ok(to_data_url(&jpeg))
}

/// Square product thumbnail (800x800, 0.85)
pub async fn compress_square(source: ImageSource) -> Result<String, ImageError> {
    tokio::task::spawn_blocking(move || {
        compress_square_blocking(&source, THUMBNAIL_SIZE, THUMBNAIL_QUALITY)
    })
    .await
    .map_err(|e| ImageError::Task(e.to_string()))?
}
