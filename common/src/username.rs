//! ユーザー名の文法チェック
//!
//! プラットフォームのハンドル規則:
//! - 3〜20文字
//! - 英数字とアンダースコアのみ
//! - 先頭・末尾にアンダースコア不可
//! - アンダースコアは最大1個

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

pub const MIN_LENGTH: usize = 3;
pub const MAX_LENGTH: usize = 20;

lazy_static! {
    static ref USERNAME_CHARS: Regex = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();
}

/// 文法違反の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameViolation {
    TooShort,
    TooLong,
    InvalidCharacters,
    LeadingUnderscore,
    TrailingUnderscore,
    TooManyUnderscores,
}

impl fmt::Display for UsernameViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsernameViolation::TooShort => write!(f, "shorter than {} characters", MIN_LENGTH),
            UsernameViolation::TooLong => write!(f, "longer than {} characters", MAX_LENGTH),
            UsernameViolation::InvalidCharacters => {
                write!(f, "only letters, digits and underscore are allowed")
            }
            UsernameViolation::LeadingUnderscore => write!(f, "starts with an underscore"),
            UsernameViolation::TrailingUnderscore => write!(f, "ends with an underscore"),
            UsernameViolation::TooManyUnderscores => write!(f, "contains more than one underscore"),
        }
    }
}

/// 違反をすべて列挙する（途中で打ち切らない）
pub fn username_violations(username: &str) -> Vec<UsernameViolation> {
    let mut violations = Vec::new();
    let length = username.chars().count();

    if length < MIN_LENGTH {
        violations.push(UsernameViolation::TooShort);
    }
    if length > MAX_LENGTH {
        violations.push(UsernameViolation::TooLong);
    }
    if !username.is_empty() && !USERNAME_CHARS.is_match(username) {
        violations.push(UsernameViolation::InvalidCharacters);
    }
    if username.starts_with('_') {
        violations.push(UsernameViolation::LeadingUnderscore);
    }
    if username.ends_with('_') {
        violations.push(UsernameViolation::TrailingUnderscore);
    }
    if username.matches('_').count() > 1 {
        violations.push(UsernameViolation::TooManyUnderscores);
    }

    violations
}

/// ユーザー名として有効か
pub fn is_valid_username(username: &str) -> bool {
    username_violations(username).is_empty()
}
