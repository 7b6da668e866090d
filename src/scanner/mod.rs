mod resize;

pub use resize::downscale;

use crate::error::{ResllError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rayon::prelude::*;
use resll_common::ImageInput;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Video,
}

/// 入力された写真・動画1件
#[derive(Debug, Clone)]
pub struct MediaAsset {
    pub path: PathBuf,
    pub file_name: String,
    pub kind: AssetKind,
    pub mime_type: String,
}

/// MIMEタイプから種別を判定（画像・動画以外は None）
pub fn classify_mime(mime_type: &str) -> Option<AssetKind> {
    if mime_type.starts_with("image/") {
        Some(AssetKind::Image)
    } else if mime_type.starts_with("video/") {
        Some(AssetKind::Video)
    } else {
        None
    }
}

fn to_asset(path: &Path) -> Option<MediaAsset> {
    let mime_type = mime_guess::from_path(path).first()?.essence_str().to_string();
    let kind = classify_mime(&mime_type)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Some(MediaAsset {
        path: path.to_path_buf(),
        file_name,
        kind,
        mime_type,
    })
}

/// 指定パス（ファイルまたはフォルダ）から写真・動画を集める
///
/// - ファイルは指定順のまま
/// - フォルダは直下のみ、ファイル名順
/// - 画像・動画以外は無視
pub fn collect_media(inputs: &[PathBuf]) -> Result<Vec<MediaAsset>> {
    let mut assets = Vec::new();

    for input in inputs {
        if !input.exists() {
            return Err(ResllError::FileNotFound(input.display().to_string()));
        }

        if input.is_dir() {
            let mut found: Vec<MediaAsset> = WalkDir::new(input)
                .max_depth(1)  // 直下のみ（再帰しない）
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file())
                .filter_map(|e| to_asset(e.path()))
                .collect();
            found.sort_by(|a, b| a.file_name.cmp(&b.file_name));
            assets.extend(found);
        } else {
            match to_asset(input) {
                Some(asset) => assets.push(asset),
                None => tracing::warn!("画像・動画ではないためスキップ: {}", input.display()),
            }
        }
    }

    Ok(assets)
}

/// 画像だけを読み込み、縮小してBase64化する（動画は送らない）
pub fn prepare_images(assets: &[MediaAsset], max_image_size: u32) -> Result<Vec<ImageInput>> {
    assets
        .par_iter()
        .filter(|a| a.kind == AssetKind::Image)
        .map(|asset| {
            let bytes = std::fs::read(&asset.path).map_err(|e| {
                ResllError::ImageLoad(format!("{}: {}", asset.path.display(), e))
            })?;
            let (bytes, mime_type) = downscale(bytes, &asset.mime_type, max_image_size);

            Ok(ImageInput {
                base64: STANDARD.encode(&bytes),
                mime_type,
            })
        })
        .collect()
}

/// サムネイル用に先頭の画像を読む
pub fn primary_image(assets: &[MediaAsset]) -> Result<Option<Vec<u8>>> {
    match assets.iter().find(|a| a.kind == AssetKind::Image) {
        Some(asset) => Ok(Some(std::fs::read(&asset.path)?)),
        None => Ok(None),
    }
}
