use clap::{Parser, Subcommand};
use sela_common::{Day, EventType, Squad};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sela")]
#[command(about = "VC参加者スクリーンショットから活動ログを生成するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// スクリーンショットから参加者名を抽出
    Extract {
        /// 画像ファイル（PNG/JPEG等）
        #[arg(required = true)]
        image: PathBuf,

        /// 抽出結果の出力先（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 活動ログを生成
    Log {
        /// ホストのユーザー名
        #[arg(long)]
        host: String,

        /// イベント種別 (例: "Crate Run", Rally, Raid)
        #[arg(short, long)]
        event: EventType,

        /// 分隊 (1P-3C, HQ)
        #[arg(short, long)]
        squad: Squad,

        /// 曜日（省略時は今日）
        #[arg(short, long)]
        day: Option<Day>,

        /// 説明（任意）
        #[arg(long)]
        description: Option<String>,

        /// 参加者ファイル（1行1名、`-` で標準入力）
        #[arg(short, long, conflicts_with = "image")]
        attendees: Option<PathBuf>,

        /// 参加者をスクリーンショットから抽出
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// 補正案とホスト不在の警告をすべて承認
        #[arg(short, long)]
        yes: bool,

        /// 出力形式 (text/json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// ユーザー名コーパスの状態を表示
    Corpus {
        /// エントリを一覧表示
        #[arg(long)]
        list: bool,
    },

    /// 設定を表示/編集
    Config {
        /// OCRコマンドを設定
        #[arg(long)]
        set_ocr_command: Option<String>,

        /// OCRのタイムアウト（秒）を設定
        #[arg(long)]
        set_timeout: Option<u64>,

        /// 補正案の類似度閾値（0.0-1.0）を設定
        #[arg(long)]
        set_threshold: Option<f64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use text or json", s)),
        }
    }
}
