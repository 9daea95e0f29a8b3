//! ログ入力の型定義
//!
//! - EventType: イベント種別
//! - Squad: 分隊
//! - Day: 曜日
//! - OcrSpan: OCRが返す認識テキスト片

use crate::error::{Error, Result};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// CLI入力の表記ゆれを吸収（大文字小文字・区切り文字）
fn normalize_label(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// イベント種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "Combat Training")]
    CombatTraining,
    #[serde(rename = "Crate Run")]
    CrateRun,
    Rally,
    Raid,
    Patrol,
    #[serde(rename = "Fort Event")]
    FortEvent,
    #[serde(rename = "Miscellaneous Event")]
    MiscellaneousEvent,
    #[serde(rename = "Mandatory Event")]
    MandatoryEvent,
    #[serde(rename = "PR")]
    Pr,
}

impl EventType {
    pub const ALL: [EventType; 9] = [
        EventType::CombatTraining,
        EventType::CrateRun,
        EventType::Rally,
        EventType::Raid,
        EventType::Patrol,
        EventType::FortEvent,
        EventType::MiscellaneousEvent,
        EventType::MandatoryEvent,
        EventType::Pr,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EventType::CombatTraining => "Combat Training",
            EventType::CrateRun => "Crate Run",
            EventType::Rally => "Rally",
            EventType::Raid => "Raid",
            EventType::Patrol => "Patrol",
            EventType::FortEvent => "Fort Event",
            EventType::MiscellaneousEvent => "Miscellaneous Event",
            EventType::MandatoryEvent => "Mandatory Event",
            EventType::Pr => "PR",
        }
    }

    /// ホストを除いた最低参加者数
    pub fn min_attendees(&self) -> usize {
        match self {
            EventType::CrateRun => 1,
            _ => 2,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EventType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = normalize_label(s);
        EventType::ALL
            .iter()
            .copied()
            .find(|e| normalize_label(e.label()) == key)
            .ok_or_else(|| Error::Parse(format!("Unknown event type: {}", s)))
    }
}

/// 分隊
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Squad {
    #[serde(rename = "1P")]
    OneP,
    #[serde(rename = "1A")]
    OneA,
    #[serde(rename = "1B")]
    OneB,
    #[serde(rename = "1C")]
    OneC,
    #[serde(rename = "2P")]
    TwoP,
    #[serde(rename = "2A")]
    TwoA,
    #[serde(rename = "2B")]
    TwoB,
    #[serde(rename = "2C")]
    TwoC,
    #[serde(rename = "3P")]
    ThreeP,
    #[serde(rename = "3A")]
    ThreeA,
    #[serde(rename = "3B")]
    ThreeB,
    #[serde(rename = "3C")]
    ThreeC,
    #[serde(rename = "HQ")]
    Hq,
}

impl Squad {
    pub const ALL: [Squad; 13] = [
        Squad::OneP,
        Squad::OneA,
        Squad::OneB,
        Squad::OneC,
        Squad::TwoP,
        Squad::TwoA,
        Squad::TwoB,
        Squad::TwoC,
        Squad::ThreeP,
        Squad::ThreeA,
        Squad::ThreeB,
        Squad::ThreeC,
        Squad::Hq,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Squad::OneP => "1P",
            Squad::OneA => "1A",
            Squad::OneB => "1B",
            Squad::OneC => "1C",
            Squad::TwoP => "2P",
            Squad::TwoA => "2A",
            Squad::TwoB => "2B",
            Squad::TwoC => "2C",
            Squad::ThreeP => "3P",
            Squad::ThreeA => "3A",
            Squad::ThreeB => "3B",
            Squad::ThreeC => "3C",
            Squad::Hq => "HQ",
        }
    }
}

impl fmt::Display for Squad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Squad {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = normalize_label(s);
        Squad::ALL
            .iter()
            .copied()
            .find(|sq| normalize_label(sq.label()) == key)
            .ok_or_else(|| Error::Parse(format!("Unknown squad: {}", s)))
    }
}

/// 曜日
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    pub fn from_weekday(weekday: chrono::Weekday) -> Self {
        Day::ALL[weekday.num_days_from_monday() as usize]
    }

    /// ローカル時刻での今日の曜日
    pub fn today() -> Self {
        Self::from_weekday(chrono::Local::now().weekday())
    }
}

impl Default for Day {
    fn default() -> Self {
        Self::today()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Day {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = normalize_label(s);
        Day::ALL
            .iter()
            .copied()
            .find(|d| {
                let label = normalize_label(d.label());
                label == key || (key.len() >= 3 && label.starts_with(&key))
            })
            .ok_or_else(|| Error::Parse(format!("Unknown day: {}", s)))
    }
}

/// 認識領域（ピクセル座標）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// OCRの認識結果1件
///
/// 信頼度と領域は現状フィルタに使わない。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrSpan {
    pub text: String,
    pub confidence: f32,
    #[serde(default)]
    pub region: Region,
}

impl OcrSpan {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
            region: Region::default(),
        }
    }
}
