//! Readiness verdict

use crate::app::App;
use crate::output::{self, check_mark, print_alert, OutputFormat};
use anyhow::{bail, Result};
use colored::*;
use qvet_checks::{CheckRunAssessment, CheckRunFinding};
use qvet_config::ConfigStatus;
use qvet_readiness::{evaluate, Alert, ReadinessReport, Rotation, Snapshot};
use qvet_types::Load;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct StatusView<'a> {
    repo: String,
    policy: ConfigStatus,
    base_branch: Option<&'a str>,
    base_sha: Option<&'a str>,
    prod_tag: Option<&'a str>,
    report: &'a ReadinessReport,
}

/// Show whether the repository is ready to deploy
pub async fn execute(app: &App, fail_unless_ready: bool) -> Result<()> {
    let snapshot = app.snapshot().await?;
    let report = evaluate(&snapshot.inputs(), &mut rand::thread_rng());

    match app.output {
        OutputFormat::Table => print_table(&snapshot, &report),
        format => {
            let range = snapshot.range.ready();
            let view = StatusView {
                repo: snapshot.repo.to_string(),
                policy: snapshot.config_meta.status(),
                base_branch: range.map(|r| r.base_branch.as_str()),
                base_sha: range.map(|r| r.base_sha.as_str()),
                prod_tag: range
                    .and_then(|r| r.prod_tag.as_ref())
                    .map(|tag| tag.name.as_str()),
                report: &report,
            };
            output::print_single(&view, format)?;
        }
    }

    if fail_unless_ready && !report.ready_to_deploy {
        bail!("{} is not ready to deploy", snapshot.repo);
    }
    Ok(())
}

fn print_table(snapshot: &Snapshot, report: &ReadinessReport) {
    println!("Repository: {}", snapshot.repo.to_string().bold());
    println!("Policy: {}", snapshot.config_meta.status());

    match &snapshot.range {
        Load::Ready(range) => {
            println!(
                "Base: {} @ {}",
                range.base_branch,
                output::short_sha(&range.base_sha)
            );
            match &range.prod_tag {
                Some(tag) => println!("Production: {} @ {}", tag.name, output::short_sha(tag.sha())),
                None => println!("Production: {}", "no release found".dimmed()),
            }
        }
        Load::Failed(message) => println!("Base: {}", message.red()),
        Load::Loading => {}
    }

    let predicates = &report.predicates;
    println!();
    println!("  {} No embargoes", check_mark(predicates.no_embargoes));
    println!("  {} QA complete", check_mark(predicates.all_qa_success));
    println!("  {} Commits to deploy", check_mark(predicates.has_commits));
    println!(
        "  {} Routine checks complete",
        check_mark(predicates.routine_checks_complete)
    );

    if !report.alerts.is_empty() {
        println!();
    }
    for alert in &report.alerts {
        print_alert(alert.severity(), &describe_alert(alert));
    }

    if !report.ready_to_deploy {
        println!();
        println!("{}", "Not ready to deploy".red().bold());
    }
}

fn describe_alert(alert: &Alert) -> String {
    match alert {
        Alert::Embargo { entry } => format!(
            "Embargo {}: {}{}",
            entry.id,
            entry.status.description.as_deref().unwrap_or("(no reason given)"),
            by(entry.status.creator.as_ref().map(|c| c.login.as_str()))
        ),
        Alert::DeploymentNote { entry } => format!(
            "Note {}: {}{}",
            entry.id,
            entry.status.description.as_deref().unwrap_or_default(),
            by(entry.status.creator.as_ref().map(|c| c.login.as_str()))
        ),
        Alert::CheckRunsUnavailable { message } => {
            format!("Check-runs unavailable, not blocking: {}", message)
        }
        Alert::MissingCheckRun { assessment } => {
            format!("{} has not reported{}", assessment.name, suffix(assessment))
        }
        Alert::UnresolvedCheckRun { assessment } => {
            let outcome = match &assessment.finding {
                CheckRunFinding::Unresolved {
                    status,
                    conclusion: Some(conclusion),
                    ..
                } => format!("{} ({})", status, conclusion),
                CheckRunFinding::Unresolved { status, .. } => status.to_string(),
                CheckRunFinding::Missing => "missing".to_string(),
            };
            format!("{} is {}{}", assessment.name, outcome, suffix(assessment))
        }
        Alert::Ready { action, rotation } => {
            let mut text = "Ready to deploy".to_string();
            if let Some(action) = action {
                text.push_str(&format!(": {} {}", action.name(), action.url()));
            }
            match rotation {
                Some(Rotation::ActorCanDeploy) => text.push_str("\n  You can deploy this release"),
                Some(Rotation::EmergencyDeployer) => text.push_str(
                    "\n  Every team member has a commit in this release; deploy as emergency deployer",
                ),
                Some(Rotation::Suggested(users)) => {
                    let logins: Vec<&str> = users.iter().map(|u| u.login.as_str()).collect();
                    text.push_str(&format!("\n  Suggested deployers: {}", logins.join(", ")));
                }
                None => {}
            }
            text
        }
    }
}

fn by(login: Option<&str>) -> String {
    login.map(|login| format!(" ({})", login)).unwrap_or_default()
}

fn suffix(assessment: &CheckRunAssessment) -> String {
    let mut suffix = format!(" [{}]", assessment.level);
    if assessment.overruled {
        suffix.push_str(" overruled");
    }
    if let CheckRunFinding::Unresolved {
        details_url: Some(url),
        ..
    } = &assessment.finding
    {
        suffix.push_str(&format!(" {}", url));
    }
    if let Some(url) = &assessment.config_url {
        suffix.push_str(&format!(" see {}", url));
    }
    suffix
}

#[cfg(test)]
mod tests {
    use super::*;
    use qvet_config::CheckRunLevel;
    use qvet_types::{CheckRunConclusion, CheckRunStatus, User};

    #[test]
    fn test_describe_unresolved_check_run() {
        let alert = Alert::UnresolvedCheckRun {
            assessment: CheckRunAssessment {
                name: "e2e".into(),
                level: CheckRunLevel::Embargo,
                finding: CheckRunFinding::Unresolved {
                    status: CheckRunStatus::Completed,
                    conclusion: Some(CheckRunConclusion::Failure),
                    details_url: None,
                },
                config_url: None,
                overruled: true,
            },
        };
        assert_eq!(
            describe_alert(&alert),
            "e2e is completed (failure) [embargo] overruled"
        );
    }

    #[test]
    fn test_describe_suggested_rotation() {
        let alert = Alert::Ready {
            action: None,
            rotation: Some(Rotation::Suggested(vec![User::new(1, "alice"), User::new(2, "bob")])),
        };
        assert_eq!(
            describe_alert(&alert),
            "Ready to deploy\n  Suggested deployers: alice, bob"
        );
    }
}
