use crate::cli::Cli;
use crate::collector::DEFAULT_MAX_PAGES;
use crate::ranking::CountingStrategy;
use crate::settings::{Settings, SlackSettings};
use crate::window::DEFAULT_WINDOW_DAYS;
use crate::{AppError, Result};

pub const DEFAULT_CHANNEL: &str = "general";

/// What a digest run collects and where it posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestOptions {
    pub channel: String,
    pub window_days: u32,
    pub max_pages: usize,
    pub counting: CountingStrategy,
    pub dry_run: bool,
}

impl Default for DigestOptions {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_string(),
            window_days: DEFAULT_WINDOW_DAYS,
            max_pages: DEFAULT_MAX_PAGES,
            counting: CountingStrategy::default(),
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DigestConfig {
    pub token: String,
    pub slack: SlackSettings,
    pub options: DigestOptions,
}

impl DigestConfig {
    /// Merge command line (including environment) over the settings file.
    pub fn resolve(cli: &Cli, settings: Settings) -> Result<Self> {
        let token = non_empty(cli.token.as_deref()).ok_or(AppError::MissingToken)?;

        let channel = non_empty(cli.channel.as_deref())
            .or_else(|| non_empty(settings.digest.channel.as_deref()))
            .unwrap_or_else(|| DEFAULT_CHANNEL.to_string());

        let window_days = cli
            .window_days
            .or(settings.digest.window_days)
            .unwrap_or(DEFAULT_WINDOW_DAYS);
        if window_days == 0 {
            return Err(AppError::InvalidConfig(
                "window-days must be at least 1".to_string(),
            ));
        }

        let max_pages = settings.digest.max_pages.unwrap_or(DEFAULT_MAX_PAGES);
        if max_pages == 0 {
            return Err(AppError::InvalidConfig(
                "max-pages must be at least 1".to_string(),
            ));
        }

        let counting = cli
            .counting
            .or(settings.digest.counting)
            .unwrap_or_default();

        Ok(Self {
            token,
            slack: settings.slack,
            options: DigestOptions {
                channel,
                window_days,
                max_pages,
                counting,
                dry_run: cli.dry_run,
            },
        })
    }
}

/// Empty and whitespace-only values count as unset.
fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DigestSettings;

    fn cli(token: Option<&str>) -> Cli {
        Cli {
            token: token.map(String::from),
            channel: None,
            window_days: None,
            counting: None,
            dry_run: false,
            config: None,
        }
    }

    #[test]
    fn test_defaults() {
        let config = DigestConfig::resolve(&cli(Some("xoxb-1")), Settings::default()).unwrap();

        assert_eq!(config.token, "xoxb-1");
        assert_eq!(config.options, DigestOptions::default());
        assert_eq!(config.options.channel, "general");
        assert_eq!(config.options.window_days, 7);
        assert_eq!(config.options.max_pages, 200);
        assert_eq!(config.options.counting, CountingStrategy::PerReaction);
        assert_eq!(config.slack.timeout_secs, 3);
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let err = DigestConfig::resolve(&cli(None), Settings::default()).unwrap_err();

        assert!(matches!(err, AppError::MissingToken));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_empty_token_is_missing() {
        let err = DigestConfig::resolve(&cli(Some("  ")), Settings::default()).unwrap_err();
        assert!(matches!(err, AppError::MissingToken));
    }

    #[test]
    fn test_empty_channel_falls_back_to_general() {
        let mut args = cli(Some("xoxb-1"));
        args.channel = Some(String::new());

        let config = DigestConfig::resolve(&args, Settings::default()).unwrap();

        assert_eq!(config.options.channel, "general");
    }

    #[test]
    fn test_settings_fill_unset_flags() {
        let settings = Settings {
            digest: DigestSettings {
                channel: Some("emoji-stats".to_string()),
                window_days: Some(30),
                max_pages: Some(10),
                counting: Some(CountingStrategy::ReportedCount),
            },
            ..Settings::default()
        };

        let config = DigestConfig::resolve(&cli(Some("xoxb-1")), settings).unwrap();

        assert_eq!(config.options.channel, "emoji-stats");
        assert_eq!(config.options.window_days, 30);
        assert_eq!(config.options.max_pages, 10);
        assert_eq!(config.options.counting, CountingStrategy::ReportedCount);
    }

    #[test]
    fn test_flags_override_settings() {
        let settings = Settings {
            digest: DigestSettings {
                channel: Some("emoji-stats".to_string()),
                window_days: Some(30),
                counting: Some(CountingStrategy::ReportedCount),
                ..DigestSettings::default()
            },
            ..Settings::default()
        };
        let mut args = cli(Some("xoxb-1"));
        args.channel = Some("random".to_string());
        args.window_days = Some(1);
        args.counting = Some(CountingStrategy::PerReaction);
        args.dry_run = true;

        let config = DigestConfig::resolve(&args, settings).unwrap();

        assert_eq!(config.options.channel, "random");
        assert_eq!(config.options.window_days, 1);
        assert_eq!(config.options.counting, CountingStrategy::PerReaction);
        assert!(config.options.dry_run);
    }

    #[test]
    fn test_zero_window_is_invalid() {
        let mut args = cli(Some("xoxb-1"));
        args.window_days = Some(0);

        let err = DigestConfig::resolve(&args, Settings::default()).unwrap_err();

        assert!(matches!(err, AppError::InvalidConfig(_)));
    }

    #[test]
    fn test_zero_max_pages_is_invalid() {
        let settings = Settings {
            digest: DigestSettings {
                max_pages: Some(0),
                ..DigestSettings::default()
            },
            ..Settings::default()
        };

        let err = DigestConfig::resolve(&cli(Some("xoxb-1")), settings).unwrap_err();

        assert!(matches!(err, AppError::InvalidConfig(_)));
    }
}
