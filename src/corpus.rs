//! ユーザー名コーパスの読み込み
//!
//! 解決順序:
//! 1. カレントディレクトリの `usernames.txt`（空でもこれを採用）
//! 2. 実行ファイルと同じ場所に同梱された `usernames.txt`
//! 3. 空のコーパス（補正機能は無効）
//!
//! 「見つからない」以外の読み込み失敗も次の候補へ退避し、状態に記録する。

use sela_common::Corpus;
use std::path::{Path, PathBuf};

pub const CORPUS_FILE_NAME: &str = "usernames.txt";

/// 採用したコーパスの出所
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusSource {
    External(PathBuf),
    Bundled(PathBuf),
    Missing,
}

/// 読み込み結果の状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusStatus {
    pub source: CorpusSource,
    pub entries: usize,
    /// 読めなかった候補とその理由
    pub degraded: Vec<String>,
}

impl CorpusStatus {
    pub fn message(&self) -> String {
        match &self.source {
            CorpusSource::External(_) => {
                format!("Loaded {} usernames from external file.", self.entries)
            }
            CorpusSource::Bundled(_) => {
                "Using default username list. Create a usernames.txt to override.".to_string()
            }
            CorpusSource::Missing => {
                "No username list found. Suggestion feature disabled.".to_string()
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

/// 起動時に一度だけ読み込む読み取り専用のコーパス
#[derive(Debug, Clone)]
pub struct CorpusStore {
    corpus: Corpus,
    status: CorpusStatus,
}

enum ReadOutcome {
    Loaded(Corpus),
    NotFound,
    Failed(String),
}

fn read_corpus(path: &Path) -> ReadOutcome {
    match std::fs::read_to_string(path) {
        Ok(content) => ReadOutcome::Loaded(Corpus::from_lines(&content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => ReadOutcome::NotFound,
        Err(e) => ReadOutcome::Failed(format!("{}: {}", path.display(), e)),
    }
}

/// 同梱コーパスの場所（実行ファイルのディレクトリ）
pub fn bundled_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(|dir| dir.join(CORPUS_FILE_NAME))
}

impl CorpusStore {
    /// 既定の場所から読み込み
    pub fn load() -> Self {
        let external = PathBuf::from(CORPUS_FILE_NAME);
        let bundled = bundled_path();
        Self::load_from(&external, bundled.as_deref())
    }

    /// 外部ファイル → 同梱ファイル → 空 の順で読み込み
    pub fn load_from(external: &Path, bundled: Option<&Path>) -> Self {
        let mut degraded = Vec::new();

        let tiers = std::iter::once((external, true)).chain(bundled.map(|p| (p, false)));
        for (path, is_external) in tiers {
            match read_corpus(path) {
                ReadOutcome::Loaded(corpus) => {
                    let source = if is_external {
                        CorpusSource::External(path.to_path_buf())
                    } else {
                        CorpusSource::Bundled(path.to_path_buf())
                    };
                    tracing::info!(path = %path.display(), entries = corpus.len(), "corpus loaded");
                    let status = CorpusStatus {
                        source,
                        entries: corpus.len(),
                        degraded,
                    };
                    return Self { corpus, status };
                }
                ReadOutcome::NotFound => {
                    tracing::debug!(path = %path.display(), "corpus file not found");
                }
                ReadOutcome::Failed(reason) => {
                    tracing::warn!(%reason, "corpus file unreadable, falling back");
                    degraded.push(reason);
                }
            }
        }

        Self {
            corpus: Corpus::new(),
            status: CorpusStatus {
                source: CorpusSource::Missing,
                entries: 0,
                degraded,
            },
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn status(&self) -> &CorpusStatus {
        &self.status
    }
}
