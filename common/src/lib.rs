//! Sela Common Library
//!
//! VC参加者スクリーンショットから活動ログを組み立てるためのコア。
//! ファイルやプロセスに触れない純粋なロジックのみを置く。

pub mod types;
pub mod error;
pub mod username;
pub mod corpus;
pub mod parser;
pub mod fuzzy;
pub mod log;

pub use types::{Day, EventType, OcrSpan, Region, Squad};
pub use error::{Error, Result};
pub use username::{is_valid_username, username_violations, UsernameViolation};
pub use corpus::Corpus;
pub use parser::{extract_candidates, extract_candidates_from_text, join_span_text, parse_attendee_text};
pub use fuzzy::{
    apply_replacements, best_match, propose_corrections, similarity, CorrectionProposal,
    ReplacementSet, DEFAULT_THRESHOLD,
};
pub use log::{generate_log, LogDraft, LogRecord, LogRequest, ValidationErrors, ValidationIssue};
