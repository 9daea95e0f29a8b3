//! テキストパーサー
//!
//! - OCR結果から候補ユーザー名を抽出
//! - 手入力・編集済みの参加者テキストを行単位で分解

use crate::types::OcrSpan;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `]` の直後（空白は任意）に続く英数字・アンダースコア列
    static ref SPEAKER_TOKEN: Regex = Regex::new(r"\]\s*([A-Za-z0-9_]+)").unwrap();
}

/// 認識テキストを元の順序のまま半角スペースで連結
pub fn join_span_text(spans: &[OcrSpan]) -> String {
    spans
        .iter()
        .map(|span| span.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// テキストから候補ユーザー名を抽出
///
/// `[12:34] username` 形式の表示を想定。出現順を保持し、重複も残す。
///
/// # Examples
/// ```
/// use sela_common::extract_candidates_from_text;
///
/// let names = extract_candidates_from_text("[12:01] alice_b some noise [12:02] bob99");
/// assert_eq!(names, vec!["alice_b", "bob99"]);
/// ```
pub fn extract_candidates_from_text(text: &str) -> Vec<String> {
    SPEAKER_TOKEN
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// OCR結果から候補ユーザー名を抽出
pub fn extract_candidates(spans: &[OcrSpan]) -> Vec<String> {
    extract_candidates_from_text(&join_span_text(spans))
}

/// 参加者テキストを分解（1行1名、前後空白除去、空行除外）
pub fn parse_attendee_text(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // extract_candidates テスト
    // =============================================

    #[test]
    fn test_extract_from_text() {
        let names = extract_candidates_from_text("[12:01] alice_b some noise [12:02] bob99");
        assert_eq!(names, vec!["alice_b", "bob99"]);
    }

    #[test]
    fn test_extract_keeps_duplicates_and_order() {
        let names = extract_candidates_from_text("[a]zed [b] amy [c]   zed");
        assert_eq!(names, vec!["zed", "amy", "zed"]);
    }

    #[test]
    fn test_extract_stops_at_non_word_char() {
        let names = extract_candidates_from_text("[VC] Speaker-One [VC]x.y");
        assert_eq!(names, vec!["Speaker", "x"]);
    }

    #[test]
    fn test_extract_empty_and_no_match() {
        assert!(extract_candidates_from_text("").is_empty());
        assert!(extract_candidates_from_text("no brackets here").is_empty());
        assert!(extract_candidates_from_text("dangling ] ").is_empty());
    }

    #[test]
    fn test_extract_from_spans() {
        // 単語単位で分割されたOCR結果を連結して抽出
        let spans = vec![
            OcrSpan::new("[12:01]", 91.0),
            OcrSpan::new("alice_b", 88.5),
            OcrSpan::new("[12:02]", 90.0),
            OcrSpan::new("bob99", 42.0),
        ];
        assert_eq!(join_span_text(&spans), "[12:01] alice_b [12:02] bob99");
        assert_eq!(extract_candidates(&spans), vec!["alice_b", "bob99"]);
    }

    #[test]
    fn test_extract_from_no_spans() {
        assert!(extract_candidates(&[]).is_empty());
    }

    // =============================================
    // parse_attendee_text テスト
    // =============================================

    #[test]
    fn test_parse_attendee_text() {
        let text = "  alice \n\n bob\r\n\t\ncarol\nalice";
        assert_eq!(parse_attendee_text(text), vec!["alice", "bob", "carol", "alice"]);
    }

    #[test]
    fn test_parse_attendee_text_empty() {
        assert!(parse_attendee_text("").is_empty());
        assert!(parse_attendee_text("\n  \n").is_empty());
    }
}
