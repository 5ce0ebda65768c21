use std::path::PathBuf;

use clap::Parser;

use crate::ranking::CountingStrategy;

#[derive(Parser, Debug)]
#[command(name = "slack-emoji-digest")]
#[command(about = "Rank the emoji reactions used in a Slack workspace and post the digest to a channel")]
#[command(version)]
pub struct Cli {
    /// Slack token (needs users:read, reactions:read, channels:read and chat:write)
    #[arg(long, env = "SLACK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Channel to post the digest to, defaults to "general"
    #[arg(short, long, env = "SLACK_CHANNEL")]
    pub channel: Option<String>,

    /// Length of the trailing window in days, defaults to 7
    #[arg(short, long)]
    pub window_days: Option<u32>,

    /// How each reaction adds to its emoji's total
    #[arg(long, value_enum)]
    pub counting: Option<CountingStrategy>,

    /// Print the digest without posting it
    #[arg(long)]
    pub dry_run: bool,

    /// Settings file path, defaults to emoji-digest.toml when present
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
