//! Layered CLI settings
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file, `QVET_*`
//! environment variables, then command-line flags applied by the caller.

use qvet_github::DEFAULT_API_URL;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings shared by every command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// GitHub token
    pub token: Option<String>,

    /// Repository as `owner/repo`
    pub repo: Option<String>,

    /// GitHub API root, for GitHub Enterprise
    pub api_url: String,

    /// Link attached to statuses written from the CLI
    pub target_url: Option<String>,

    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            token: None,
            repo: None,
            api_url: DEFAULT_API_URL.to_string(),
            target_url: None,
            logging: LoggingSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,

    /// Emit logs as JSON lines
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub token: Option<String>,
    pub repo: Option<String>,
    pub api_url: Option<String>,
    pub log_level: Option<String>,
    pub json_logs: bool,
}

/// `~/.config/qvet/config.toml` or the platform equivalent
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("qvet").join("config.toml"))
}

impl Settings {
    /// Load settings; an explicit `path` must exist, the default file may not
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(
                    config::File::new(path, config::FileFormat::Toml).required(true),
                );
            }
            None => {
                if let Some(default) = default_path() {
                    builder = builder.add_source(
                        config::File::from(default)
                            .format(config::FileFormat::Toml)
                            .required(false),
                    );
                }
            }
        }

        builder = builder.add_source(
            config::Environment::with_prefix("QVET")
                .prefix_separator("_")
                .separator("__"),
        );

        builder.build()?.try_deserialize()
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if overrides.token.is_some() {
            self.token = overrides.token;
        }
        if overrides.repo.is_some() {
            self.repo = overrides.repo;
        }
        if let Some(api_url) = overrides.api_url {
            self.api_url = api_url;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        self.logging.json |= overrides.json_logs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("qvet-{}-{}.toml", name, std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api_url, "https://api.github.com");
        assert_eq!(settings.logging.level, "warn");
        assert!(settings.token.is_none());
    }

    #[test]
    fn test_load_file() {
        let path = write_temp(
            "settings",
            "repo = \"octo/widgets\"\ntarget_url = \"https://qvet.example.com\"\n\n[logging]\njson = true\n",
        );
        let settings = Settings::load(path.to_str()).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(settings.repo.as_deref(), Some("octo/widgets"));
        assert_eq!(settings.target_url.as_deref(), Some("https://qvet.example.com"));
        assert!(settings.logging.json);
        assert_eq!(settings.logging.level, "warn");
        assert_eq!(settings.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let missing = std::env::temp_dir().join("qvet-does-not-exist.toml");
        assert!(Settings::load(missing.to_str()).is_err());
    }

    #[test]
    fn test_flags_take_precedence() {
        let settings = Settings {
            repo: Some("octo/widgets".into()),
            ..Default::default()
        }
        .apply(Overrides {
            repo: Some("octo/gadgets".into()),
            log_level: Some("debug".into()),
            ..Default::default()
        });

        assert_eq!(settings.repo.as_deref(), Some("octo/gadgets"));
        assert_eq!(settings.logging.level, "debug");
        assert!(settings.token.is_none());
    }
}
