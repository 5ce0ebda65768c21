use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("SLACK_TOKEN environment variable not set")]
    MissingToken,

    #[error("failed to read file at {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Slack API error: {0}")]
    SlackApi(String),

    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

impl AppError {
    /// Whether the error must abort the whole run.
    ///
    /// Only startup preconditions are fatal. Everything raised while talking
    /// to Slack ends the current scan or stage and the run carries on.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AppError::MissingToken
                | AppError::ReadFile { .. }
                | AppError::TomlParse(_)
                | AppError::InvalidConfig(_)
                | AppError::HttpClient(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
