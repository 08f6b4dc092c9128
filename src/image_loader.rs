//! 解析用の画像読み込み
//!
//! 長辺が `max_size` を超える画像はJPEGに再エンコードして縮小する。

use crate::error::{CulinaError, Result};
use culina_common::ImageData;
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

pub fn load_image(path: &Path, max_size: u32) -> Result<ImageData> {
    if !path.is_file() {
        return Err(CulinaError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    if !is_image_extension(&ext) {
        return Err(CulinaError::UnsupportedImage(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    prepare_image(bytes, max_size)
}

/// 画像バイト列を検証し、必要なら縮小する
pub fn prepare_image(bytes: Vec<u8>, max_size: u32) -> Result<ImageData> {
    let format = image::guess_format(&bytes)
        .map_err(|e| CulinaError::ImageLoad(format!("形式を判別できません: {}", e)))?;
    let decoded = image::load_from_memory_with_format(&bytes, format)
        .map_err(|e| CulinaError::ImageLoad(e.to_string()))?;

    if decoded.width().max(decoded.height()) <= max_size {
        return Ok(ImageData::new(format.to_mime_type(), bytes));
    }

    tracing::debug!(
        width = decoded.width(),
        height = decoded.height(),
        max_size,
        "downscaling image before upload"
    );
    let resized = decoded.resize(max_size, max_size, FilterType::Triangle);
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut buffer = Cursor::new(Vec::new());
    rgb.write_to(&mut buffer, ImageFormat::Jpeg)
        .map_err(|e| CulinaError::ImageLoad(e.to_string()))?;

    Ok(ImageData::new(ImageFormat::Jpeg.to_mime_type(), buffer.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use tempfile::tempdir;

    #[test]
    fn test_is_image_extension() {
        assert!(is_image_extension("jpg"));
        assert!(is_image_extension("JPG"));
        assert!(is_image_extension("jpeg"));
        assert!(is_image_extension("png"));
        assert!(is_image_extension("webp"));
        assert!(!is_image_extension("txt"));
        assert!(!is_image_extension("gif"));
    }

    #[test]
    fn test_load_image_not_found() {
        let result = load_image(Path::new("/nonexistent/fridge.jpg"), 1568);
        assert!(matches!(result, Err(CulinaError::FileNotFound(_))));
    }

    #[test]
    fn test_load_image_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "milk, eggs").unwrap();
        assert!(matches!(load_image(&path, 1568), Err(CulinaError::UnsupportedImage(_))));
    }

    #[test]
    fn test_load_image_keeps_small_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fridge.png");
        RgbImage::new(40, 20).save(&path).unwrap();

        let original = std::fs::read(&path).unwrap();
        let image = load_image(&path, 1568).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.bytes, original);
    }

    #[test]
    fn test_load_image_downscales_large_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fridge.png");
        RgbImage::new(400, 100).save(&path).unwrap();

        let image = load_image(&path, 200).unwrap();
        assert_eq!(image.mime_type, "image/jpeg");

        let decoded = image::load_from_memory(&image.bytes).unwrap();
        assert_eq!(decoded.width(), 200);
        assert_eq!(decoded.height(), 50);
    }

    #[test]
    fn test_prepare_image_rejects_garbage() {
        let result = prepare_image(b"definitely not an image".to_vec(), 1568);
        assert!(matches!(result, Err(CulinaError::ImageLoad(_))));
    }
}
