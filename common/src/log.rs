//! 活動ログの組み立てと検証
//!
//! ## 検証ルール（すべて評価してからまとめて返す）
//! 1. ホストが空でなく、ユーザー名として有効
//! 2. 参加者全員がユーザー名として有効
//! 3. ホストを除いた参加者数がイベント種別の最低人数以上
//!
//! 検証を通過した後、ホストが参加者一覧にいない場合は警告として扱い、
//! 呼び出し側に続行するかを確認させる。

use crate::error::Result;
use crate::types::{Day, EventType, Squad};
use crate::username::is_valid_username;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ログ生成の入力
#[derive(Debug, Clone, PartialEq)]
pub struct LogRequest {
    pub host: String,
    pub attendees: Vec<String>,
    pub event_type: EventType,
    pub squad: Squad,
    pub day: Day,
    pub description: Option<String>,
}

/// 検証エラー1件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingHost,
    InvalidHost(String),
    InvalidAttendees(Vec<String>),
    InsufficientAttendees {
        event_type: EventType,
        required: usize,
        actual: usize,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingHost => write!(f, "Host name is missing."),
            ValidationIssue::InvalidHost(host) => {
                write!(f, "Host username '{}' is invalid.", host)
            }
            ValidationIssue::InvalidAttendees(names) => {
                write!(
                    f,
                    "The following attendee usernames are invalid:\n  - {}",
                    names.join("\n  - ")
                )
            }
            ValidationIssue::InsufficientAttendees {
                event_type,
                required,
                actual,
            } => {
                let plural = if *required == 1 { "" } else { "s" };
                write!(
                    f,
                    "A '{}' requires at least {} attendee{} (excluding host). You only have {}.",
                    event_type, required, plural, actual
                )
            }
        }
    }
}

/// 検証エラーの集約
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    issues: Vec<ValidationIssue>,
}

impl ValidationErrors {
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self.issues.iter().map(|i| format!("- {}", i)).collect();
        write!(
            f,
            "Please fix the following issues before generating the log:\n\n{}",
            items.join("\n\n")
        )
    }
}

impl std::error::Error for ValidationErrors {}

/// 確定した活動ログ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub event_type: EventType,
    pub squad: Squad,
    pub host: String,
    pub day: Day,
    pub description: Option<String>,
    /// ホストを除いた参加者
    pub attendees: Vec<String>,
}

impl LogRecord {
    /// 固定順のラベル付きテキストに変換
    pub fn render(&self) -> String {
        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or("N/A");
        let attendees = if self.attendees.is_empty() {
            "N/A".to_string()
        } else {
            self.attendees.join("\n")
        };

        let text = format!(
            "Event: {}\nSquad: {}\nHost: {}\nDay: {}\nDescription: {}\nAttendees:\n{}",
            self.event_type,
            self.squad,
            self.host,
            self.day.label().to_lowercase(),
            description,
            attendees
        );
        text.trim().to_string()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// 検証済みで確認待ちのログ
#[derive(Debug, Clone, PartialEq)]
pub struct LogDraft {
    record: LogRecord,
    host_absent: bool,
}

impl LogDraft {
    /// ホストが（除外前の）参加者一覧にいなかったか
    pub fn host_absent(&self) -> bool {
        self.host_absent
    }

    pub fn record(&self) -> &LogRecord {
        &self.record
    }

    pub fn into_record(self) -> LogRecord {
        self.record
    }
}

/// ログを検証して組み立てる
pub fn generate_log(request: &LogRequest) -> std::result::Result<LogDraft, ValidationErrors> {
    let mut issues = Vec::new();
    let host = request.host.trim();

    // 1. ホスト
    if host.is_empty() {
        issues.push(ValidationIssue::MissingHost);
    } else if !is_valid_username(host) {
        issues.push(ValidationIssue::InvalidHost(host.to_string()));
    }

    // 2. 参加者
    let invalid: Vec<String> = request
        .attendees
        .iter()
        .filter(|name| !is_valid_username(name))
        .cloned()
        .collect();
    if !invalid.is_empty() {
        issues.push(ValidationIssue::InvalidAttendees(invalid));
    }

    // 3. 人数（ホストは大文字小文字を無視して除外）
    let host_lower = host.to_lowercase();
    let final_attendees: Vec<String> = request
        .attendees
        .iter()
        .filter(|name| name.to_lowercase() != host_lower)
        .cloned()
        .collect();
    let required = request.event_type.min_attendees();
    if final_attendees.len() < required {
        issues.push(ValidationIssue::InsufficientAttendees {
            event_type: request.event_type,
            required,
            actual: final_attendees.len(),
        });
    }

    if !issues.is_empty() {
        return Err(ValidationErrors { issues });
    }

    let host_absent = !request.attendees.iter().any(|name| name == host);
    let description = request
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    Ok(LogDraft {
        record: LogRecord {
            event_type: request.event_type,
            squad: request.squad,
            host: host.to_string(),
            day: request.day,
            description,
            attendees: final_attendees,
        },
        host_absent,
    })
}
