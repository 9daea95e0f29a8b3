//! tesseract互換コマンドによるOCR
//!
//! 画像を一時PNGに書き出し、`<command> <image> stdout tsv` を実行して
//! 単語単位の認識結果（テキスト・信頼度・領域）を得る。

use super::{OcrService, RasterImage};
use crate::error::OcrError;
use sela_common::{OcrSpan, Region};
use std::process::Command;

/// TSV出力で単語を表す level
const WORD_LEVEL: &str = "5";

pub struct TesseractOcr {
    command: String,
}

impl TesseractOcr {
    /// コマンドが起動できることを確認して初期化
    pub fn initialize(command: &str) -> Result<Self, OcrError> {
        let output = Command::new(command)
            .arg("--version")
            .output()
            .map_err(|e| OcrError::Init(format!("{} を起動できません: {}", command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Init(format!(
                "{} --version failed (code {:?}): {}",
                command,
                output.status.code(),
                stderr.trim()
            )));
        }

        let version = String::from_utf8_lossy(&output.stdout);
        tracing::info!(
            command,
            version = version.lines().next().unwrap_or("").trim(),
            "ocr engine ready"
        );

        Ok(Self {
            command: command.to_string(),
        })
    }
}

impl OcrService for TesseractOcr {
    fn recognize(&self, image: &RasterImage) -> Result<Vec<OcrSpan>, OcrError> {
        let temp = tempfile::Builder::new()
            .prefix("sela-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::Recognition(format!("一時ファイルを作成できません: {}", e)))?;
        image.save_png(temp.path())?;

        let output = Command::new(&self.command)
            .arg(temp.path())
            .args(["stdout", "tsv"])
            .output()
            .map_err(|e| OcrError::Recognition(format!("{} 実行エラー: {}", self.command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Recognition(format!(
                "{} failed (code {:?}): {}",
                self.command,
                output.status.code(),
                stderr.trim()
            )));
        }

        parse_tsv(&String::from_utf8_lossy(&output.stdout))
    }
}

/// TSV出力を認識結果に変換（単語行のみ、空テキストは除外）
pub fn parse_tsv(output: &str) -> Result<Vec<OcrSpan>, OcrError> {
    let mut lines = output.lines().filter(|line| !line.trim().is_empty());

    let header = match lines.next() {
        Some(header) => header,
        None => return Ok(Vec::new()),
    };
    let columns: Vec<&str> = header.split('\t').map(str::trim).collect();
    let column = |name: &str| {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| OcrError::Output(format!("TSVに列 '{}' がありません", name)))
    };

    let level = column("level")?;
    let left = column("left")?;
    let top = column("top")?;
    let width = column("width")?;
    let height = column("height")?;
    let conf = column("conf")?;
    let text = column("text")?;

    let mut spans = Vec::new();
    for line in lines {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.get(level).map(|v| v.trim()) != Some(WORD_LEVEL) {
            continue;
        }

        let word = fields.get(text).map(|t| t.trim()).unwrap_or("");
        if word.is_empty() {
            continue;
        }

        let number = |idx: usize| {
            fields
                .get(idx)
                .and_then(|v| v.trim().parse::<u32>().ok())
                .unwrap_or(0)
        };

        spans.push(OcrSpan {
            text: word.to_string(),
            confidence: fields
                .get(conf)
                .and_then(|v| v.trim().parse::<f32>().ok())
                .unwrap_or(-1.0),
            region: Region {
                left: number(left),
                top: number(top),
                width: number(width),
                height: number(height),
            },
        });
    }

    Ok(spans)
}
