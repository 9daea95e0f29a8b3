//! 既知ユーザー名コーパス
//!
//! 曖昧一致の結果を毎回同じにするため、ソート済みのセットで保持する。

use std::collections::BTreeSet;

/// 信頼済みユーザー名の集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    entries: BTreeSet<String>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 改行区切りテキストから構築
    ///
    /// 各行の前後空白を除去し、空行は捨てる。文法チェックはしない。
    pub fn from_lines(content: &str) -> Self {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.entries.contains(username)
    }

    /// 辞書順で列挙
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Corpus {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lines_trims_and_dedupes() {
        let corpus = Corpus::from_lines("  alice \n\nbob\r\nalice\n   \n_bad_name_\n");
        assert_eq!(corpus.len(), 3);
        assert!(corpus.contains("alice"));
        assert!(corpus.contains("bob"));
        // 文法違反のエントリもそのまま保持
        assert!(corpus.contains("_bad_name_"));
    }

    #[test]
    fn test_iter_is_sorted() {
        let corpus: Corpus = ["carol", "alice", "bob"].into_iter().collect();
        let names: Vec<&str> = corpus.iter().collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_empty() {
        let corpus = Corpus::from_lines("\n \n");
        assert!(corpus.is_empty());
    }
}
