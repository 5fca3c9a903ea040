//! End-to-end readiness scenarios against the in-memory host.

use chrono::{TimeZone, Utc};
use qvet_config::{ConfigMeta, CONFIG_FILE_PATH};
use qvet_readiness::{collect_snapshot, evaluate, Alert, Rotation};
use qvet_status::{StatusWriter, WriteableState};
use qvet_types::{
    CheckRun, CheckRunConclusion, Commit, CommitComparison, HostError, HostOperation,
    InMemorySourceControl, OwnerRepo, Status, StatusState, Tag, User,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const POLICY: &str = r#"
action:
  ready:
    type: link
    name: Deploy
    url: https://deploy.example.com/widgets
commit:
  ignore:
    authors: [renovate-bot]
team:
  org: octo
  team_slug: web
check_runs:
  enabled: true
  default_level: hidden
  items:
    - name: e2e
      level: embargo
"#;

fn repo() -> OwnerRepo {
    OwnerRepo::new("octo", "widgets")
}

fn alice() -> User {
    User::new(1, "alice")
}

fn host() -> InMemorySourceControl {
    let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let comparison = CommitComparison {
        html_url: "https://github.com/octo/widgets/compare/v1.4.0...base".into(),
        commits: vec![
            Commit::new("c1", "Add search").with_author(alice()),
            Commit::new("c2", "Bump serde").with_author(User::new(9, "renovate-bot")),
        ],
        ahead_by: 2,
        behind_by: 0,
    };

    InMemorySourceControl::new()
        .with_user(User::new(2, "bob"))
        .with_file(CONFIG_FILE_PATH, POLICY)
        .with_branch("main", "base")
        .with_tag_pages(vec![vec![Tag::new("v1.4.0", "prod")]])
        .with_comparison("prod", "base", comparison)
        .with_statuses(
            "c1",
            vec![Status::new("qvet/qa", StatusState::Success, created)],
        )
        .with_check_runs(
            "base",
            vec![CheckRun::completed("e2e", CheckRunConclusion::Success, created)],
        )
        .with_team(
            "octo",
            "web",
            vec![alice(), User::new(2, "bob"), User::new(3, "carol")],
        )
}

async fn evaluate_for(host: &InMemorySourceControl, actor: User) -> qvet_readiness::ReadinessReport {
    let meta = ConfigMeta::load(host, &repo()).await.unwrap();
    let snapshot = collect_snapshot(host, &repo(), Some(actor), meta).await;
    evaluate(&snapshot.inputs(), &mut StdRng::seed_from_u64(11))
}

#[tokio::test]
async fn test_ready_to_deploy() {
    let host = host();
    let report = evaluate_for(&host, User::new(2, "bob")).await;

    assert!(report.ready_to_deploy, "{:?}", report.predicates);
    assert_eq!(report.alerts.len(), 1);
    match &report.alerts[0] {
        Alert::Ready { action, rotation } => {
            assert_eq!(action.as_ref().unwrap().url(), "https://deploy.example.com/widgets");
            assert_eq!(rotation, &Some(Rotation::ActorCanDeploy));
        }
        other => panic!("unexpected {:?}", other),
    }

    // The ignored renovate commit needs no QA status.
    assert_eq!(host.call_count(HostOperation::ListCommitStatuses).await, 2);
}

#[tokio::test]
async fn test_ready_without_check_runs_or_team() {
    let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let host = InMemorySourceControl::new()
        .with_user(User::new(2, "bob"))
        .with_file(CONFIG_FILE_PATH, "commit:\n  ignore:\n    authors: [renovate-bot]\n")
        .with_branch("main", "base")
        .with_tag_pages(vec![vec![Tag::new("v1.4.0", "prod")]])
        .with_comparison(
            "prod",
            "base",
            CommitComparison {
                html_url: "https://github.com/octo/widgets/compare/v1.4.0...base".into(),
                commits: vec![
                    Commit::new("c1", "Add search").with_author(alice()),
                    Commit::new("c2", "Bump serde").with_author(User::new(9, "renovate-bot")),
                ],
                ahead_by: 2,
                behind_by: 0,
            },
        )
        .with_statuses(
            "c1",
            vec![Status::new("qvet/qa", StatusState::Success, created)],
        );

    let report = evaluate_for(&host, User::new(2, "bob")).await;

    assert!(report.ready_to_deploy, "{:?}", report.predicates);
    assert_eq!(report.alerts.len(), 1);
    match &report.alerts[0] {
        Alert::Ready { action, rotation } => {
            assert!(action.is_none());
            assert!(rotation.is_none());
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(host.call_count(HostOperation::ListCheckRuns).await, 0);
}

#[tokio::test]
async fn test_blocked_by_embargo() {
    let host = host();
    let writer = StatusWriter::new(&host, repo(), "bob");
    writer
        .add_embargo("base", "9f3c", "Payments incident")
        .await
        .unwrap();

    let report = evaluate_for(&host, alice()).await;
    assert!(!report.ready_to_deploy);
    assert!(!report.predicates.no_embargoes);

    match &report.alerts[0] {
        Alert::Embargo { entry } => {
            assert_eq!(entry.id, "9f3c");
            assert_eq!(entry.status.description.as_deref(), Some("Payments incident"));
            assert_eq!(entry.status.creator.as_ref().unwrap().login, "bob");
        }
        other => panic!("unexpected {:?}", other),
    }

    writer.resolve_embargo("base", "9f3c").await.unwrap();
    assert!(evaluate_for(&host, alice()).await.ready_to_deploy);
}

#[tokio::test]
async fn test_rejected_qa_blocks() {
    let host = host();
    StatusWriter::new(&host, repo(), "bob")
        .set_qa("c1", WriteableState::Failure)
        .await
        .unwrap();

    let report = evaluate_for(&host, alice()).await;
    assert!(!report.predicates.all_qa_success);
    assert!(!report.ready_to_deploy);
}

#[tokio::test]
async fn test_failing_embargo_check_run_until_overruled() {
    let created = Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap();
    let host = host().with_check_runs(
        "base",
        vec![CheckRun::completed("e2e", CheckRunConclusion::Failure, created)],
    );

    let report = evaluate_for(&host, alice()).await;
    assert!(!report.ready_to_deploy);
    assert!(matches!(report.alerts[0], Alert::UnresolvedCheckRun { .. }));

    StatusWriter::new(&host, repo(), "bob")
        .overrule_check_run("base", "e2e")
        .await
        .unwrap();
    assert!(evaluate_for(&host, alice()).await.ready_to_deploy);
}

#[tokio::test]
async fn test_check_run_outage_does_not_block() {
    let host = host().with_failure(
        HostOperation::ListCheckRuns,
        HostError::Api {
            status: 500,
            message: "internal error".into(),
        },
    );

    let report = evaluate_for(&host, alice()).await;
    assert!(report.ready_to_deploy);
    assert!(matches!(
        report.alerts[0],
        Alert::CheckRunsUnavailable { .. }
    ));
}

#[tokio::test]
async fn test_no_previous_release() {
    let host = host().with_tag_pages(vec![]);
    let meta = ConfigMeta::load(&host, &repo()).await.unwrap();
    let snapshot = collect_snapshot(&host, &repo(), Some(alice()), meta).await;

    let range = snapshot.range.ready().unwrap();
    assert!(range.prod_tag.is_none());
    assert!(range.comparison.is_none());

    let report = evaluate(&snapshot.inputs(), &mut StdRng::seed_from_u64(1));
    assert!(!report.predicates.has_commits);
    assert!(!report.ready_to_deploy);
}

#[tokio::test]
async fn test_snapshot_serializes_report() {
    let host = host();
    let report = evaluate_for(&host, alice()).await;
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["ready_to_deploy"], true);
    assert_eq!(json["alerts"][0]["kind"], "ready");
}
