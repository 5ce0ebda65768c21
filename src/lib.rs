pub mod cli;
pub mod collector;
pub mod commands;
pub mod config;
pub mod cursor;
pub mod digest;
mod error;
pub mod model;
pub mod ranking;
pub mod report;
pub mod settings;
pub mod slack;
pub mod window;

pub use cli::Cli;
pub use collector::{ReactionCollector, ReactionEvent, ScanEnd, UserScan};
pub use commands::run_digest;
pub use config::{DigestConfig, DigestOptions};
pub use cursor::Cursor;
pub use digest::{DigestReport, DigestRun, Publication};
pub use error::{AppError, Result};
pub use ranking::{CountingStrategy, FrequencyTable, RankedEmoji};
pub use settings::Settings;
pub use slack::{HttpSlackClient, SlackApi};
pub use window::TimeWindow;
