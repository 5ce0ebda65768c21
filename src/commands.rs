use chrono::Utc;
use tracing::info;

use crate::cli::Cli;
use crate::config::DigestConfig;
use crate::digest::{self, DigestReport, Publication};
use crate::error::Result;
use crate::report::preview_digest;
use crate::settings::Settings;
use crate::slack::HttpSlackClient;

/// Run one digest. Only startup errors are returned; everything after that
/// is logged and reflected in the summary.
pub fn run_digest(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let config = DigestConfig::resolve(&cli, settings)?;
    let client = HttpSlackClient::new(&config.token, &config.slack, config.options.max_pages)?;

    info!(
        channel = %config.options.channel,
        window_days = config.options.window_days,
        api = %config.slack.api_base_url,
        "starting emoji digest"
    );

    let report = digest::run_digest(&client, &config.options, Utc::now());

    print_report(&report, &config.options.channel);
    Ok(())
}

fn print_report(report: &DigestReport, channel: &str) {
    if report.ranked.is_empty() {
        println!("No reactions found in the time window.");
    } else {
        println!("{}", preview_digest(&report.ranked));
    }

    println!();
    println!(
        "Scanned {} users ({} scans failed), {} distinct emoji.",
        report.users,
        report.failed_scans(),
        report.ranked.len()
    );

    match &report.publication {
        Publication::Posted => println!("Digest posted to #{}.", channel),
        Publication::DryRun => println!("Dry run: digest not posted to #{}.", channel),
        Publication::Failed(reason) => {
            eprintln!("Failed to post digest to #{}: {}", channel, reason)
        }
    }
}
