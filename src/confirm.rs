//! 操作者への確認
//!
//! 補正案の承認とホスト不在の警告は、人の応答を待つ中断点。
//! 要求（補正案・ホスト名）を渡し、応答（置換セット or 中止 / 続行可否）を受け取る。

use crate::error::{Result, SelaError};
use dialoguer::{Confirm, MultiSelect};
use sela_common::{CorrectionProposal, ReplacementSet};
use std::collections::VecDeque;

/// 補正案に対する応答
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectionDecision {
    /// 承認した補正のみを含む置換セット
    Accept(ReplacementSet),
    /// ログ生成を中止
    Cancel,
}

pub trait Confirmer {
    /// 補正案のうち適用するものを選ばせる
    fn confirm_corrections(&mut self, proposals: &[CorrectionProposal])
        -> Result<CorrectionDecision>;

    /// ホストが参加者一覧にいないまま続行するか
    fn confirm_host_absent(&mut self, host: &str) -> Result<bool>;
}

/// 端末で対話的に確認
#[derive(Debug, Default)]
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm_corrections(
        &mut self,
        proposals: &[CorrectionProposal],
    ) -> Result<CorrectionDecision> {
        let items: Vec<String> = proposals
            .iter()
            .map(|p| format!("{}  →  {}  ({:.0}%)", p.original, p.suggestion, p.score * 100.0))
            .collect();
        let defaults = vec![true; items.len()];

        let selection = MultiSelect::new()
            .with_prompt("Correct wrong usernames? Uncheck any you wish to ignore (Esc: cancel)")
            .items(&items)
            .defaults(&defaults)
            .interact_opt()
            .map_err(|e| SelaError::Prompt(e.to_string()))?;

        Ok(match selection {
            Some(indices) => CorrectionDecision::Accept(
                indices
                    .into_iter()
                    .filter_map(|i| proposals.get(i))
                    .map(|p| (p.original.clone(), p.suggestion.clone()))
                    .collect(),
            ),
            None => CorrectionDecision::Cancel,
        })
    }

    fn confirm_host_absent(&mut self, host: &str) -> Result<bool> {
        Confirm::new()
            .with_prompt(format!(
                "The host '{}' is not in the VC screenshot. Is this the correct screenshot?",
                host
            ))
            .default(false)
            .interact()
            .map_err(|e| SelaError::Prompt(e.to_string()))
    }
}

/// 確認なしですべて承認（`--yes`）
#[derive(Debug, Default)]
pub struct AutoConfirmer;

impl Confirmer for AutoConfirmer {
    fn confirm_corrections(
        &mut self,
        proposals: &[CorrectionProposal],
    ) -> Result<CorrectionDecision> {
        Ok(CorrectionDecision::Accept(ReplacementSet::from_proposals(
            proposals,
        )))
    }

    fn confirm_host_absent(&mut self, _host: &str) -> Result<bool> {
        Ok(true)
    }
}

/// あらかじめ用意した応答を順に返す
///
/// 応答が尽きた場合、補正は中止・ホスト不在は続行しない。
#[derive(Debug, Default)]
pub struct ScriptedConfirmer {
    corrections: VecDeque<CorrectionDecision>,
    host_absent: VecDeque<bool>,
    /// 受け取った補正案（確認用）
    pub seen_proposals: Vec<Vec<CorrectionProposal>>,
    /// 受け取ったホスト名（確認用）
    pub seen_hosts: Vec<String>,
}

impl ScriptedConfirmer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_correction(mut self, decision: CorrectionDecision) -> Self {
        self.corrections.push_back(decision);
        self
    }

    pub fn with_host_absent(mut self, answer: bool) -> Self {
        self.host_absent.push_back(answer);
        self
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm_corrections(
        &mut self,
        proposals: &[CorrectionProposal],
    ) -> Result<CorrectionDecision> {
        self.seen_proposals.push(proposals.to_vec());
        Ok(self
            .corrections
            .pop_front()
            .unwrap_or(CorrectionDecision::Cancel))
    }

    fn confirm_host_absent(&mut self, host: &str) -> Result<bool> {
        self.seen_hosts.push(host.to_string());
        Ok(self.host_absent.pop_front().unwrap_or(false))
    }
}
