//! End-to-end scenarios for PipelineExecutor against a recording fake host.

mod common;

use std::sync::Arc;

use common::{artifact_path, config, push_event, Call, RecordingForkHost, Script};
use nodes::PipelineExecutor;
use pipeline::{
    PipelineOutcome, PipelinePolicy, PipelineReport, PipelineState, StepKind, StepStatus,
};

async fn run(script: Script, policy: PipelinePolicy, id: &str) -> (Arc<RecordingForkHost>, PipelineReport) {
    let host = Arc::new(RecordingForkHost::new(script));
    let executor = PipelineExecutor::new(host.clone(), config().with_policy(policy));
    let report = executor.handle_push_event(&push_event(id)).await;
    (host, report)
}

/// Scenario 1: happy path issues every call with the derived names.
#[tokio::test]
async fn test_happy_path_creates_file_and_pull_request_from_derived_branch() {
    let (host, report) = run(Script::default(), PipelinePolicy::forgiving(), "push-1").await;

    let calls = host.calls();
    assert_eq!(
        host.call_names(),
        [
            "merge_upstream",
            "branch_head",
            "create_branch",
            "create_file",
            "open_pull_request"
        ]
    );
    assert_eq!(
        calls[0],
        Call::MergeUpstream {
            fork: "forker/storage".into(),
            branch: "master".into()
        }
    );
    assert_eq!(
        calls[1],
        Call::BranchHead {
            repo: "forker/storage".into(),
            branch: "master".into()
        }
    );
    assert_eq!(
        calls[2],
        Call::CreateBranch {
            repo: "forker/storage".into(),
            branch: "update-push-1".into(),
            sha: "abc123".into()
        }
    );
    match &calls[3] {
        Call::CreateFile { repo, plan } => {
            assert_eq!(repo, "forker/storage");
            assert_eq!(plan.path, artifact_path("push-1"));
            assert_eq!(plan.path.as_str(), "push-1.json");
            assert_eq!(plan.target_branch.as_str(), "update-push-1");
            assert_eq!(plan.message, "Add file push-1.json");
        }
        other => panic!("expected create_file, got {other:?}"),
    }
    match &calls[4] {
        Call::OpenPullRequest { repo, request } => {
            assert_eq!(repo, "origin-org/storage");
            assert_eq!(request.head, "forker:update-push-1");
            assert_eq!(request.base.as_str(), "master");
        }
        other => panic!("expected open_pull_request, got {other:?}"),
    }
    assert_eq!(report.state, PipelineState::End);
}

/// Scenario 2: a failed base-branch lookup stops everything after it.
#[tokio::test]
async fn test_ref_lookup_failure_short_circuits_the_run() {
    let script = Script {
        branch_head: Some(404),
        ..Script::default()
    };
    let (host, report) = run(script, PipelinePolicy::forgiving(), "push-2").await;

    assert_eq!(host.call_names(), ["merge_upstream", "branch_head"]);
    assert_eq!(report.state, PipelineState::Aborted);
    assert!(report.pull_request_url().is_none());
    match &report.outcome {
        PipelineOutcome::Failed { step, reason } => {
            assert_eq!(*step, StepKind::CreateBranch);
            assert!(reason.contains("404"), "{reason}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(report.status_of(StepKind::CommitFile).is_none());
    assert!(report.status_of(StepKind::OpenPullRequest).is_none());
}

/// Scenario 3: a branch-name collision stops the run before any commit.
#[tokio::test]
async fn test_branch_conflict_prevents_commit_and_pull_request() {
    let script = Script {
        create_branch: Some(422),
        ..Script::default()
    };
    let (host, report) = run(script, PipelinePolicy::forgiving(), "push-3").await;

    assert_eq!(
        host.call_names(),
        ["merge_upstream", "branch_head", "create_branch"]
    );
    assert_eq!(report.state, PipelineState::Aborted);
    assert!(matches!(
        report.status_of(StepKind::CreateBranch),
        Some(StepStatus::FatalFailed { .. })
    ));
}

/// Scenario 4: a failed commit is soft; the pull request is still attempted.
#[tokio::test]
async fn test_commit_failure_still_opens_pull_request_for_same_branch() {
    let script = Script {
        create_file: Some(422),
        ..Script::default()
    };
    let (host, report) = run(script, PipelinePolicy::forgiving(), "push-4").await;

    let calls = host.calls();
    assert_eq!(calls.len(), 5);
    match calls.last() {
        Some(Call::OpenPullRequest { request, .. }) => {
            assert_eq!(request.head, "forker:update-push-4");
        }
        other => panic!("expected open_pull_request, got {other:?}"),
    }
    assert!(matches!(
        report.status_of(StepKind::CommitFile),
        Some(StepStatus::SoftFailed { .. })
    ));
    assert_eq!(
        report.pull_request_url(),
        Some("https://github.com/origin-org/storage/pull/7")
    );
}

/// Scenario 5: the pull request URL is the terminal output.
#[tokio::test]
async fn test_all_steps_succeeding_reports_pull_request_url() {
    let (_, report) = run(Script::default(), PipelinePolicy::forgiving(), "push-5").await;

    assert_eq!(
        report.outcome,
        PipelineOutcome::PullRequestOpened {
            url: "https://github.com/origin-org/storage/pull/7".into()
        }
    );
    let statuses: Vec<_> = report.steps.iter().map(|r| (r.step, r.status.clone())).collect();
    assert_eq!(
        statuses,
        StepKind::ORDER
            .iter()
            .map(|s| (*s, StepStatus::Succeeded))
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_sync_failure_does_not_prevent_branch_creation() {
    let script = Script {
        merge_upstream: Some(409),
        ..Script::default()
    };
    let (host, report) = run(script, PipelinePolicy::forgiving(), "push-6").await;

    assert_eq!(host.call_names().len(), 5);
    assert!(matches!(
        report.status_of(StepKind::SyncFork),
        Some(StepStatus::SoftFailed { reason }) if reason.contains("409")
    ));
    assert_eq!(report.state, PipelineState::End);
    assert!(report.pull_request_url().is_some());
}

#[tokio::test]
async fn test_already_up_to_date_sync_is_success() {
    let script = Script {
        already_up_to_date: true,
        ..Script::default()
    };
    let (_, report) = run(script, PipelinePolicy::forgiving(), "push-7").await;

    assert_eq!(report.status_of(StepKind::SyncFork), Some(&StepStatus::Succeeded));
}

#[tokio::test]
async fn test_pull_request_failure_ends_run_without_url() {
    let script = Script {
        open_pull_request: Some(422),
        ..Script::default()
    };
    let (host, report) = run(script, PipelinePolicy::forgiving(), "push-8").await;

    assert_eq!(host.call_names().len(), 5);
    assert_eq!(report.state, PipelineState::End);
    assert!(report.pull_request_url().is_none());
    assert!(matches!(
        report.outcome,
        PipelineOutcome::Failed {
            step: StepKind::OpenPullRequest,
            ..
        }
    ));
}

#[tokio::test]
async fn test_each_step_is_attempted_exactly_once_even_when_all_soft_fail() {
    let script = Script {
        merge_upstream: Some(500),
        create_file: Some(500),
        open_pull_request: Some(500),
        ..Script::default()
    };
    let (host, _) = run(script, PipelinePolicy::forgiving(), "push-9").await;

    let names = host.call_names();
    for name in [
        "merge_upstream",
        "branch_head",
        "create_branch",
        "create_file",
        "open_pull_request",
    ] {
        assert_eq!(names.iter().filter(|n| **n == name).count(), 1, "{name}");
    }
}

#[tokio::test]
async fn test_strict_policy_halts_on_sync_failure() {
    let script = Script {
        merge_upstream: Some(409),
        ..Script::default()
    };
    let (host, report) = run(script, PipelinePolicy::strict(), "push-10").await;

    assert_eq!(host.call_names(), ["merge_upstream"]);
    assert_eq!(report.state, PipelineState::Aborted);
    assert!(matches!(
        report.outcome,
        PipelineOutcome::Failed {
            step: StepKind::SyncFork,
            ..
        }
    ));
}

#[tokio::test]
async fn test_strict_policy_skips_pull_request_after_commit_failure() {
    let script = Script {
        create_file: Some(422),
        ..Script::default()
    };
    let (host, report) = run(script, PipelinePolicy::strict(), "push-11").await;

    assert_eq!(
        host.call_names(),
        ["merge_upstream", "branch_head", "create_branch", "create_file"]
    );
    assert_eq!(report.state, PipelineState::Aborted);
}

#[tokio::test]
async fn test_branch_is_created_at_resolved_head() {
    let script = Script {
        head_sha: Some("0123456789abcdef".into()),
        ..Script::default()
    };
    let (host, _) = run(script, PipelinePolicy::forgiving(), "push-12").await;

    assert!(host.calls().contains(&Call::CreateBranch {
        repo: "forker/storage".into(),
        branch: "update-push-12".into(),
        sha: "0123456789abcdef".into(),
    }));
}

#[tokio::test]
async fn test_committed_content_reparses_to_payload() {
    let (host, _) = run(Script::default(), PipelinePolicy::forgiving(), "push-13").await;

    let content = host
        .calls()
        .into_iter()
        .find_map(|c| match c {
            Call::CreateFile { plan, .. } => Some(plan.content),
            _ => None,
        })
        .unwrap();
    let reparsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(
        reparsed,
        serde_json::json!({"example_key": "example_value", "count": 3})
    );
    assert!(content.contains("\n    \"example_key\""));
}

#[tokio::test]
async fn test_each_run_gets_a_fresh_run_id() {
    let host = Arc::new(RecordingForkHost::new(Script::default()));
    let executor = PipelineExecutor::new(host, config());
    let a = executor.handle_push_event(&push_event("a")).await;
    let b = executor.handle_push_event(&push_event("b")).await;
    assert_ne!(a.run_id, b.run_id);
}
