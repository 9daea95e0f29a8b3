//! ログ生成の1サイクル
//!
//! 1. コーパスとの曖昧一致で補正案を作成
//! 2. 補正案があれば操作者に確認（中止なら参加者一覧は変更しない）
//! 3. 承認された補正を適用
//! 4. 検証してログを組み立て
//! 5. ホストが一覧にいなければ続行を確認

use crate::confirm::{Confirmer, CorrectionDecision};
use crate::error::Result;
use sela_common::{
    apply_replacements, generate_log, propose_corrections, Corpus, LogRecord, LogRequest,
};

/// 中止の理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    CorrectionsDeclined,
    HostAbsentDeclined,
}

/// サイクルの結果
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome {
    Generated {
        record: LogRecord,
        /// 補正適用後の参加者一覧（ホスト除外前）
        attendees: Vec<String>,
    },
    Cancelled(CancelReason),
}

pub struct LogWorkflow<'a> {
    corpus: &'a Corpus,
    threshold: f64,
}

impl<'a> LogWorkflow<'a> {
    pub fn new(corpus: &'a Corpus, threshold: f64) -> Self {
        Self { corpus, threshold }
    }

    /// 検証エラーは `SelaError::Validation` としてまとめて返る
    pub fn run(
        &self,
        mut request: LogRequest,
        confirmer: &mut dyn Confirmer,
    ) -> Result<WorkflowOutcome> {
        if !self.corpus.is_empty() {
            let proposals = propose_corrections(&request.attendees, self.corpus, self.threshold);
            tracing::debug!(proposals = proposals.len(), "correction proposals");

            if !proposals.is_empty() {
                match confirmer.confirm_corrections(&proposals)? {
                    CorrectionDecision::Accept(replacements) => {
                        tracing::info!(accepted = replacements.len(), "applying corrections");
                        request.attendees = apply_replacements(&request.attendees, &replacements);
                    }
                    CorrectionDecision::Cancel => {
                        tracing::info!("log generation cancelled at correction step");
                        return Ok(WorkflowOutcome::Cancelled(CancelReason::CorrectionsDeclined));
                    }
                }
            }
        }

        let draft = generate_log(&request)?;

        if draft.host_absent() && !confirmer.confirm_host_absent(&draft.record().host)? {
            tracing::info!("log generation cancelled: host not in attendee list");
            return Ok(WorkflowOutcome::Cancelled(CancelReason::HostAbsentDeclined));
        }

        Ok(WorkflowOutcome::Generated {
            record: draft.into_record(),
            attendees: request.attendees,
        })
    }
}
