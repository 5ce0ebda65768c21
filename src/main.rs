use clap::Parser;
use slack_emoji_digest::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("slack_emoji_digest=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = slack_emoji_digest::run_digest(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
