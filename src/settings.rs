use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ranking::CountingStrategy;
use crate::{AppError, Result};

pub const SETTINGS_FILE: &str = "emoji-digest.toml";

pub const DEFAULT_API_BASE_URL: &str = "https://slack.com/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub slack: SlackSettings,
    #[serde(default)]
    pub digest: DigestSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackSettings {
    #[serde(default = "default_api_base_url", rename = "api-base-url")]
    pub api_base_url: String,
    #[serde(default = "default_timeout_secs", rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for SlackSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Digest options; unset values fall back to the command line or built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DigestSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, rename = "window-days", skip_serializing_if = "Option::is_none")]
    pub window_days: Option<u32>,
    #[serde(default, rename = "max-pages", skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counting: Option<CountingStrategy>,
}

impl Settings {
    /// Load settings from `path`, or from [`SETTINGS_FILE`] when `path` is `None`.
    ///
    /// A missing default file yields the defaults; an explicitly requested
    /// file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p, true),
            None => (Path::new(SETTINGS_FILE), false),
        };

        if !explicit && !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| AppError::ReadFile {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AppError::TomlParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_settings_file_constant() {
        assert_eq!(SETTINGS_FILE, "emoji-digest.toml");
    }

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();

        assert_eq!(settings.slack.api_base_url, "https://slack.com/api");
        assert_eq!(settings.slack.timeout_secs, 3);
        assert!(settings.digest.channel.is_none());
        assert!(settings.digest.window_days.is_none());
        assert!(settings.digest.max_pages.is_none());
        assert!(settings.digest.counting.is_none());
    }

    #[test]
    fn test_settings_deserialization() {
        let toml_content = r#"
[slack]
api-base-url = "http://localhost:9000/api"
timeout-secs = 10

[digest]
channel = "random"
window-days = 14
max-pages = 50
counting = "reported-count"
"#;

        let settings = Settings::parse(toml_content).unwrap();

        assert_eq!(settings.slack.api_base_url, "http://localhost:9000/api");
        assert_eq!(settings.slack.timeout_secs, 10);
        assert_eq!(settings.digest.channel.as_deref(), Some("random"));
        assert_eq!(settings.digest.window_days, Some(14));
        assert_eq!(settings.digest.max_pages, Some(50));
        assert_eq!(settings.digest.counting, Some(CountingStrategy::ReportedCount));
    }

    #[test]
    fn test_settings_deserialization_empty() {
        let settings = Settings::parse("").unwrap();

        assert_eq!(settings.slack.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(settings.slack.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(settings.digest.channel.is_none());
    }

    #[test]
    fn test_settings_deserialization_partial_slack_only() {
        let toml_content = r#"
[slack]
timeout-secs = 5
"#;

        let settings = Settings::parse(toml_content).unwrap();

        assert_eq!(settings.slack.timeout_secs, 5);
        assert_eq!(settings.slack.api_base_url, DEFAULT_API_BASE_URL);
        assert!(settings.digest.counting.is_none());
    }

    #[test]
    fn test_settings_invalid_counting() {
        let toml_content = r#"
[digest]
counting = "average"
"#;

        let err = Settings::parse(toml_content).unwrap_err();

        assert!(matches!(err, AppError::TomlParse(_)));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[digest]\nchannel = \"emoji-stats\"").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();

        assert_eq!(settings.digest.channel.as_deref(), Some("emoji-stats"));
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Settings::load(Some(&path)).unwrap_err();

        assert!(matches!(err, AppError::ReadFile { .. }));
        assert!(err.is_fatal());
    }
}
