//! I/O helpers used by the demo binary.
//!
//! - `load_grayscale_image`: read a PNG/JPEG/etc. into a `MaskedImage<f32>`.
//! - `save_plane_png`: write a pixel plane to a grayscale PNG with linear stretch.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageView, MaskedImage, Plane};
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk as 8-bit gray and scale samples to `[0, 1]`.
///
/// The mask is cleared and the variance plane is set to `variance`.
pub fn load_grayscale_image(path: &Path, variance: f32) -> Result<MaskedImage<f32>, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img.into_raw().into_iter().map(|v| v as f32 / 255.0).collect();
    let plane = Plane::from_vec(width, height, data)
        .ok_or_else(|| format!("Unexpected buffer size for {}", path.display()))?;
    MaskedImage::from_image(0, 0, plane, variance)
        .map_err(|e| format!("Invalid image {}: {e}", path.display()))
}

/// Save a float plane to a grayscale PNG, mapping `[0, vmax]` onto `[0, 255]`.
pub fn save_plane_png(plane: &Plane<f32>, vmax: f32, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let scale = if vmax > 0.0 { 255.0 / vmax } else { 0.0 };
    let mut out = GrayImage::new(plane.w as u32, plane.h as u32);
    for (y, row) in plane.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            let v = (px * scale).clamp(0.0, 255.0);
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
