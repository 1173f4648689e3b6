//! Bitmap conversion between image files and activation vectors.
//!
//! Images are decoded (BMP/PNG/JPEG/GIF), converted to grayscale, optionally
//! resized, and their pels normalized to [0, 1]. Output vectors go the other
//! way: clamped to [0, 1] and written as an 8-bit grayscale image.

use std::path::Path;

use image::{imageops::FilterType, DynamicImage, GrayImage};

use crate::error::{Error, Result};

/// Reads an image file into a flat grayscale activation vector, row by row.
///
/// With `resize` set the image is first scaled to exactly `(width, height)`.
pub fn load_grayscale(path: impl AsRef<Path>, resize: Option<(u32, u32)>) -> Result<Vec<f64>> {
    let img = image::open(path.as_ref())?;
    Ok(grayscale_pels(img, resize))
}

/// Decodes image bytes into a flat grayscale activation vector.
pub fn grayscale_from_bytes(bytes: &[u8], resize: Option<(u32, u32)>) -> Result<Vec<f64>> {
    let img = image::load_from_memory(bytes)?;
    Ok(grayscale_pels(img, resize))
}

fn grayscale_pels(img: DynamicImage, resize: Option<(u32, u32)>) -> Vec<f64> {
    let img = match resize {
        Some((width, height)) => img.resize_exact(width, height, FilterType::Lanczos3),
        None => img,
    };
    img.to_luma8().pixels().map(|p| p.0[0] as f64 / 255.0).collect()
}

/// Writes `values` as a `width × height` grayscale image. The format follows
/// the file extension of `path`.
pub fn save_grayscale(values: &[f64], width: u32, height: u32, path: impl AsRef<Path>) -> Result<()> {
    let img = to_gray_image(values, width, height)?;
    img.save(path.as_ref())?;
    Ok(())
}

/// Encodes `values` into an 8-bit grayscale buffer.
pub fn to_gray_image(values: &[f64], width: u32, height: u32) -> Result<GrayImage> {
    let pels = (width as usize) * (height as usize);
    if values.len() != pels {
        return Err(Error::mismatch("bitmap pels", pels, values.len()));
    }
    let raw: Vec<u8> = values.iter()
        .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();
    GrayImage::from_raw(width, height, raw)
        .ok_or_else(|| Error::Config(format!("cannot build a {width}x{height} bitmap")))
}
