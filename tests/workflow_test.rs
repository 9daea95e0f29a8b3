//! ログ生成サイクルのテスト
//!
//! 補正案の確認・適用・検証・ホスト不在確認の流れを検証

use sela::confirm::{AutoConfirmer, CorrectionDecision, ScriptedConfirmer};
use sela::error::SelaError;
use sela::workflow::{CancelReason, LogWorkflow, WorkflowOutcome};
use sela_common::{
    Corpus, Day, EventType, LogRequest, ReplacementSet, Squad, ValidationIssue, DEFAULT_THRESHOLD,
};

fn corpus() -> Corpus {
    ["alice", "bob99", "carol", "dave_x"].into_iter().collect()
}

fn request(host: &str, attendees: &[&str], event_type: EventType) -> LogRequest {
    LogRequest {
        host: host.to_string(),
        attendees: attendees.iter().map(|s| s.to_string()).collect(),
        event_type,
        squad: Squad::TwoC,
        day: Day::Friday,
        description: Some("Night patrol".to_string()),
    }
}

/// 補正案をすべて承認して生成
#[test]
fn test_accept_all_corrections() {
    let corpus = corpus();
    let workflow = LogWorkflow::new(&corpus, DEFAULT_THRESHOLD);

    let outcome = workflow
        .run(
            request("alice", &["alice", "b0b99", "caro1"], EventType::Rally),
            &mut AutoConfirmer,
        )
        .unwrap();

    match outcome {
        WorkflowOutcome::Generated { record, attendees } => {
            assert_eq!(attendees, vec!["alice", "bob99", "carol"]);
            assert_eq!(record.attendees, vec!["bob99", "carol"]);
            let text = record.render();
            assert!(text.contains("Host: alice"));
            assert!(text.contains("Day: friday"));
            assert!(text.contains("Description: Night patrol"));
            assert!(text.contains("Attendees:\nbob99\ncarol"));
        }
        other => panic!("Expected Generated, got {:?}", other),
    }
}

/// 一部だけ承認した補正のみ適用
#[test]
fn test_partial_acceptance() {
    let corpus = corpus();
    let workflow = LogWorkflow::new(&corpus, DEFAULT_THRESHOLD);
    let accepted: ReplacementSet = [("b0b99", "bob99")].into_iter().collect();
    let mut confirmer =
        ScriptedConfirmer::new().with_correction(CorrectionDecision::Accept(accepted));

    let outcome = workflow
        .run(
            request("alice", &["alice", "b0b99", "caro1"], EventType::Rally),
            &mut confirmer,
        )
        .unwrap();

    // 提示された補正案は2件（完全一致の alice は対象外）
    assert_eq!(confirmer.seen_proposals.len(), 1);
    let proposals = &confirmer.seen_proposals[0];
    assert_eq!(proposals.len(), 2);
    assert_eq!(proposals[0].original, "b0b99");
    assert_eq!(proposals[1].original, "caro1");

    match outcome {
        WorkflowOutcome::Generated { record, .. } => {
            assert_eq!(record.attendees, vec!["bob99", "caro1"]);
        }
        other => panic!("Expected Generated, got {:?}", other),
    }
}

/// 補正の確認を中止したらログは作らない
#[test]
fn test_cancel_at_corrections() {
    let corpus = corpus();
    let workflow = LogWorkflow::new(&corpus, DEFAULT_THRESHOLD);
    let mut confirmer = ScriptedConfirmer::new().with_correction(CorrectionDecision::Cancel);

    let outcome = workflow
        .run(
            request("alice", &["alice", "b0b99", "carol"], EventType::Rally),
            &mut confirmer,
        )
        .unwrap();

    assert_eq!(
        outcome,
        WorkflowOutcome::Cancelled(CancelReason::CorrectionsDeclined)
    );
    assert!(confirmer.seen_hosts.is_empty());
}

/// 補正案がなければ確認しない
#[test]
fn test_no_prompt_without_proposals() {
    let corpus = corpus();
    let workflow = LogWorkflow::new(&corpus, DEFAULT_THRESHOLD);
    // 応答を用意しない（呼ばれたら中止になる）
    let mut confirmer = ScriptedConfirmer::new();

    let outcome = workflow
        .run(
            request("alice", &["alice", "bob99", "zzzzzzzz"], EventType::Rally),
            &mut confirmer,
        )
        .unwrap();

    assert!(confirmer.seen_proposals.is_empty());
    assert!(matches!(outcome, WorkflowOutcome::Generated { .. }));
}

/// コーパスが空なら補正はしない
#[test]
fn test_empty_corpus_skips_corrections() {
    let corpus = Corpus::new();
    let workflow = LogWorkflow::new(&corpus, DEFAULT_THRESHOLD);
    let mut confirmer = ScriptedConfirmer::new();

    let outcome = workflow
        .run(
            request("alice", &["alice", "b0b99", "caro1"], EventType::Rally),
            &mut confirmer,
        )
        .unwrap();

    assert!(confirmer.seen_proposals.is_empty());
    match outcome {
        WorkflowOutcome::Generated { record, .. } => {
            assert_eq!(record.attendees, vec!["b0b99", "caro1"]);
        }
        other => panic!("Expected Generated, got {:?}", other),
    }
}

/// ホストだけの Crate Run は人数不足
#[test]
fn test_crate_run_host_only_fails() {
    let corpus = corpus();
    let workflow = LogWorkflow::new(&corpus, DEFAULT_THRESHOLD);

    let err = workflow
        .run(request("alice", &["alice"], EventType::CrateRun), &mut AutoConfirmer)
        .unwrap_err();

    match err {
        SelaError::Validation(errors) => {
            assert_eq!(
                errors.issues(),
                &[ValidationIssue::InsufficientAttendees {
                    event_type: EventType::CrateRun,
                    required: 1,
                    actual: 0,
                }]
            );
        }
        other => panic!("Expected Validation error, got {:?}", other),
    }
}

/// 検証エラーはまとめて返る
#[test]
fn test_validation_errors_are_aggregated() {
    let corpus = Corpus::new();
    let workflow = LogWorkflow::new(&corpus, DEFAULT_THRESHOLD);

    let err = workflow
        .run(request("_host", &["bob99", "a__b", "carol"], EventType::Raid), &mut AutoConfirmer)
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("Host username '_host' is invalid."));
    assert!(message.contains("  - a__b"));
    match err {
        SelaError::Validation(errors) => assert_eq!(errors.len(), 2),
        other => panic!("Expected Validation error, got {:?}", other),
    }
}

/// ホスト不在の警告で中止
#[test]
fn test_host_absent_declined() {
    let corpus = corpus();
    let workflow = LogWorkflow::new(&corpus, DEFAULT_THRESHOLD);
    let mut confirmer = ScriptedConfirmer::new().with_host_absent(false);

    let outcome = workflow
        .run(request("alice", &["bob99", "carol"], EventType::Rally), &mut confirmer)
        .unwrap();

    assert_eq!(
        outcome,
        WorkflowOutcome::Cancelled(CancelReason::HostAbsentDeclined)
    );
    assert_eq!(confirmer.seen_hosts, vec!["alice"]);
}

/// ホスト不在でも続行を選べば生成
#[test]
fn test_host_absent_confirmed() {
    let corpus = corpus();
    let workflow = LogWorkflow::new(&corpus, DEFAULT_THRESHOLD);
    let mut confirmer = ScriptedConfirmer::new().with_host_absent(true);

    let outcome = workflow
        .run(request("alice", &["bob99", "carol"], EventType::Rally), &mut confirmer)
        .unwrap();

    match outcome {
        WorkflowOutcome::Generated { record, .. } => {
            assert_eq!(record.attendees, vec!["bob99", "carol"]);
        }
        other => panic!("Expected Generated, got {:?}", other),
    }
}
