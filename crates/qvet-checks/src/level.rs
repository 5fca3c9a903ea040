//! Configured levels of check-runs

use qvet_config::{CheckRunItem, CheckRunLevel, CheckRunsConfig};
use qvet_types::CheckRun;

/// Level of the job called `name`: its configured item, else the default level
pub fn classify_level(name: &str, config: &CheckRunsConfig) -> CheckRunLevel {
    config
        .item(name)
        .map(|item| item.level)
        .unwrap_or(config.default_level)
}

/// Explanation link configured for the job called `name`
pub fn config_url<'a>(name: &str, config: &'a CheckRunsConfig) -> Option<&'a str> {
    config.item(name).and_then(|item| item.url.as_deref())
}

/// Configured, non-hidden jobs that have not reported any run
pub fn missing_check_runs<'a>(runs: &[CheckRun], config: &'a CheckRunsConfig) -> Vec<&'a CheckRunItem> {
    config
        .items
        .iter()
        .filter(|item| item.level != CheckRunLevel::Hidden)
        .filter(|item| !runs.iter().any(|run| run.name == item.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn config() -> CheckRunsConfig {
        CheckRunsConfig {
            enabled: true,
            default_level: CheckRunLevel::Info,
            items: vec![
                CheckRunItem {
                    name: "e2e".into(),
                    level: CheckRunLevel::Embargo,
                    url: Some("https://wiki.example.com/e2e".into()),
                },
                CheckRunItem {
                    name: "coverage".into(),
                    level: CheckRunLevel::Hidden,
                    url: None,
                },
                CheckRunItem {
                    name: "security-scan".into(),
                    level: CheckRunLevel::Info,
                    url: None,
                },
            ],
        }
    }

    #[test]
    fn test_classify_level() {
        let config = config();
        assert_eq!(classify_level("e2e", &config), CheckRunLevel::Embargo);
        assert_eq!(classify_level("coverage", &config), CheckRunLevel::Hidden);
        assert_eq!(classify_level("E2E", &config), CheckRunLevel::Info);
        assert_eq!(config_url("e2e", &config), Some("https://wiki.example.com/e2e"));
        assert_eq!(config_url("unknown", &config), None);
    }

    #[test]
    fn test_missing_skips_hidden_and_reported() {
        let config = config();
        let runs = vec![CheckRun::in_progress("security-scan", Utc::now())];
        let missing: Vec<&str> = missing_check_runs(&runs, &config)
            .into_iter()
            .map(|item| item.name.as_str())
            .collect();
        assert_eq!(missing, vec!["e2e"]);
    }
}
