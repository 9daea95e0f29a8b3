//! Sela: VC参加者スクリーンショット → 活動ログ
//!
//! 画像 → OCR → 候補一覧 → コーパスとの曖昧一致補正（操作者が確認）
//! → 検証 → ログテキスト

pub mod cli;
pub mod config;
pub mod confirm;
pub mod corpus;
pub mod error;
pub mod ocr;
pub mod workflow;
