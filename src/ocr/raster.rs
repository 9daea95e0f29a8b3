//! OCRに渡すラスタ画像

use crate::error::{OcrError, Result, SelaError};
use image::{ImageFormat, RgbImage};
use std::path::Path;

/// RGB8のピクセルバッファ
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    buffer: RgbImage,
}

impl RasterImage {
    /// 画像ファイルを読み込み（形式は内容から判定）
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SelaError::FileNotFound(path.display().to_string()));
        }
        let image = image::open(path)
            .map_err(|e| SelaError::ImageLoad(format!("{}: {}", path.display(), e)))?;
        Ok(Self {
            buffer: image.to_rgb8(),
        })
    }

    /// エンコード済みバイト列（クリップボード等）から読み込み
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let image =
            image::load_from_memory(bytes).map_err(|e| SelaError::ImageLoad(e.to_string()))?;
        Ok(Self {
            buffer: image.to_rgb8(),
        })
    }

    /// 白一色の画像
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            buffer: RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255])),
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn pixels(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    /// PNGとして書き出し（外部OCRコマンドへの受け渡し用）
    pub fn save_png(&self, path: &Path) -> std::result::Result<(), OcrError> {
        self.buffer
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| OcrError::Recognition(format!("一時画像の書き出しに失敗: {}", e)))
    }
}
