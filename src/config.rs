use crate::error::{Result, SelaError};
use serde::{Deserialize, Serialize};
use sela_common::DEFAULT_THRESHOLD;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OCRコマンド（tesseract互換）
    pub ocr_command: String,
    /// OCR 1件あたりの待ち時間上限
    pub timeout_seconds: u64,
    /// 補正案を出す類似度の閾値
    pub similarity_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ocr_command: "tesseract".into(),
            timeout_seconds: 120,
            similarity_threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SelaError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("sela").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.ocr_command.trim().is_empty() {
            return Err(SelaError::Config("OCRコマンドが空です".into()));
        }
        if self.timeout_seconds == 0 {
            return Err(SelaError::Config("タイムアウトは1秒以上にしてください".into()));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(SelaError::Config(format!(
                "類似度の閾値は0.0-1.0の範囲で指定してください: {}",
                self.similarity_threshold
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn set_ocr_command(&mut self, command: String) -> Result<()> {
        self.ocr_command = command;
        self.save()
    }

    pub fn set_timeout(&mut self, seconds: u64) -> Result<()> {
        self.timeout_seconds = seconds;
        self.save()
    }

    pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
        self.similarity_threshold = threshold;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ocr_command, "tesseract");
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert!((config.similarity_threshold - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"timeout_seconds": 30}"#).unwrap();
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.ocr_command, "tesseract");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            similarity_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SelaError::Config(_))));

        let config = Config {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            ocr_command: "  ".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
