//! 曖昧一致による補正モジュール
//!
//! OCRで読み取った候補のうちコーパスにないものについて、
//! 最も近いコーパスのエントリを補正案として提示し、
//! 承認された補正だけを適用する。

use crate::corpus::Corpus;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// 補正案を出す類似度の既定閾値
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// 補正案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionProposal {
    /// OCRで読み取った値
    pub original: String,
    /// 提案するコーパスのエントリ
    pub suggestion: String,
    /// 類似度 (0.0-1.0)
    pub score: f64,
}

/// 類似度を計算（正規化編集距離ベース, 0.0-1.0）
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// 閾値以上で最も類似度の高いエントリを返す
///
/// 同点の場合は先に列挙された方（コーパスなら辞書順で小さい方）を採用する。
pub fn best_match<'a, I>(candidate: &str, entries: I, threshold: f64) -> Option<(&'a str, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, f64)> = None;

    for entry in entries {
        let score = similarity(candidate, entry);
        if score < threshold {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((entry, score)),
        }
    }

    best
}

/// 補正案を作成
///
/// - コーパスに完全一致する候補は対象外
/// - 同じ候補には最大1件（最初の出現順）
/// - 閾値を超える一致がなければ補正案なし
pub fn propose_corrections(
    candidates: &[String],
    corpus: &Corpus,
    threshold: f64,
) -> Vec<CorrectionProposal> {
    let mut seen = HashSet::new();
    let mut proposals = Vec::new();

    for candidate in candidates {
        if corpus.contains(candidate) || !seen.insert(candidate.as_str()) {
            continue;
        }

        if let Some((suggestion, score)) = best_match(candidate, corpus.iter(), threshold) {
            proposals.push(CorrectionProposal {
                original: candidate.clone(),
                suggestion: suggestion.to_string(),
                score,
            });
        }
    }

    proposals
}

/// 承認された置換（元の値 → 置換後）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementSet {
    replacements: BTreeMap<String, String>,
}

impl ReplacementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 補正案をすべて承認したものとして構築
    pub fn from_proposals<'a, I>(proposals: I) -> Self
    where
        I: IntoIterator<Item = &'a CorrectionProposal>,
    {
        proposals
            .into_iter()
            .map(|p| (p.original.clone(), p.suggestion.clone()))
            .collect()
    }

    pub fn insert(&mut self, original: impl Into<String>, replacement: impl Into<String>) {
        self.replacements.insert(original.into(), replacement.into());
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.replacements.get(original).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ReplacementSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            replacements: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// 置換を適用（順序・件数は維持、対象外はそのまま）
pub fn apply_replacements(candidates: &[String], replacements: &ReplacementSet) -> Vec<String> {
    candidates
        .iter()
        .map(|name| {
            replacements
                .get(name)
                .map(str::to_string)
                .unwrap_or_else(|| name.clone())
        })
        .collect()
}
