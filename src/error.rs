use sela_common::ValidationErrors;
use std::time::Duration;
use thiserror::Error;

/// OCRサービスの失敗（新しい画像で再試行可能）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OcrError {
    #[error("OCRエンジンの初期化に失敗: {0}")]
    Init(String),

    #[error("OCR実行エラー: {0}")]
    Recognition(String),

    #[error("OCR出力を解釈できません: {0}")]
    Output(String),

    #[error("OCRがタイムアウトしました ({0:?})")]
    Timeout(Duration),

    #[error("OCRワーカーが停止しています")]
    WorkerGone,
}

#[derive(Error, Debug)]
pub enum SelaError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error("OCRエンジンを初期化中です。しばらく待ってから再実行してください")]
    OcrNotReady,

    #[error("OCRは別の画像を処理中です")]
    OcrBusy,

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] sela_common::Error),
}

pub type Result<T> = std::result::Result<T, SelaError>;
