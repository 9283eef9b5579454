//! 식사 사진 읽기
//!
//! 확장자 확인 → 디코드 → 긴 변 기준 축소 → JPEG 재인코딩

use crate::error::{MealScanError, Result};
use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// 업로드용으로 준비된 이미지
#[derive(Debug, Clone)]
pub struct MealImage {
    pub path: PathBuf,
    pub file_name: String,
    /// 원본 파일 바이트 (캐시 키 계산용)
    pub original: Vec<u8>,
    /// 업로드할 JPEG 바이트
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl MealImage {
    pub fn mime_type(&self) -> &'static str {
        "image/jpeg"
    }
}

pub fn is_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// 사진 파일을 읽어 업로드용 JPEG로 변환
///
/// # Arguments
/// * `path` - 사진 파일 경로
/// * `max_size` - 긴 변의 최대 픽셀 (0이면 축소하지 않음)
pub fn load_meal_image(path: &Path, max_size: u32) -> Result<MealImage> {
    if !path.is_file() {
        return Err(MealScanError::FileNotFound(path.display().to_string()));
    }
    if !is_image_extension(path) {
        return Err(MealScanError::UnsupportedImage(path.display().to_string()));
    }

    let original = std::fs::read(path)?;
    let decoded = image::load_from_memory(&original)
        .map_err(|e| MealScanError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    let resized = fit_within(decoded, max_size);
    let (width, height) = resized.dimensions();
    let jpeg = encode_jpeg(&resized)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(MealImage {
        path: path.to_path_buf(),
        file_name,
        original,
        jpeg,
        width,
        height,
    })
}

fn fit_within(image: DynamicImage, max_size: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    if max_size == 0 || (width <= max_size && height <= max_size) {
        return image;
    }
    image.resize(max_size, max_size, FilterType::Triangle)
}

fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>> {
    // JPEG은 알파 채널을 지원하지 않음
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut buffer = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
        .map_err(|e| MealScanError::ImageLoad(format!("JPEG 인코딩 오류: {}", e)))?;
    Ok(buffer)
}
