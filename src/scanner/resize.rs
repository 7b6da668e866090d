//! 送信前の画像縮小
//!
//! 長辺が上限を超える画像だけ JPEG で再エンコードする。
//! デコードできない形式（HEIC等）は元のバイト列のまま送る。

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

pub fn downscale(bytes: Vec<u8>, mime_type: &str, max_size: u32) -> (Vec<u8>, String) {
    if max_size == 0 {
        return (bytes, mime_type.to_string());
    }

    let img = match image::load_from_memory(&bytes) {
        Ok(img) => img,
        Err(e) => {
            tracing::debug!("デコード不可のため縮小をスキップ ({}): {}", mime_type, e);
            return (bytes, mime_type.to_string());
        }
    };

    if img.width() <= max_size && img.height() <= max_size {
        return (bytes, mime_type.to_string());
    }

    let resized = img.resize(max_size, max_size, FilterType::Lanczos3);
    let mut out = Vec::new();
    match DynamicImage::ImageRgb8(resized.to_rgb8()).write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg) {
        Ok(()) => {
            tracing::debug!(
                "縮小: {}x{} → {}x{}",
                img.width(),
                img.height(),
                resized.width(),
                resized.height()
            );
            (out, "image/jpeg".to_string())
        }
        Err(e) => {
            tracing::warn!("JPEG再エンコード失敗、元画像を送信: {}", e);
            (bytes, mime_type.to_string())
        }
    }
}
