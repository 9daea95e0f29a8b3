//! OCRアダプタ
//!
//! OCRエンジン自体はブラックボックス（画像 → 認識テキスト片の列）として扱い、
//! その結果から候補ユーザー名を取り出す。
//!
//! - `OcrService`: OCRエンジンの境界
//! - `TesseractOcr`: 外部コマンド（tesseract互換）による実装
//! - `OcrWorker`: 1件ずつ処理するバックグラウンドワーカー

mod raster;
mod tesseract;
mod worker;

pub use raster::RasterImage;
pub use tesseract::{parse_tsv, TesseractOcr};
pub use worker::{OcrJob, OcrWorker, WorkerState};

use crate::error::OcrError;
use sela_common::OcrSpan;

/// OCRエンジンの境界（呼び出しはブロッキング・数秒かかる想定）
pub trait OcrService: Send + Sync {
    fn recognize(&self, image: &RasterImage) -> Result<Vec<OcrSpan>, OcrError>;
}

/// 画像から候補ユーザー名を抽出
pub fn extract_candidates<S>(service: &S, image: &RasterImage) -> Result<Vec<String>, OcrError>
where
    S: OcrService + ?Sized,
{
    let spans = service.recognize(image)?;
    tracing::debug!(spans = spans.len(), "ocr spans received");
    Ok(sela_common::extract_candidates(&spans))
}
