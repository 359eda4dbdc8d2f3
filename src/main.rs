//! yt-audience - classify YouTube channels by audience from their public text.

mod cli;

use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();

    let default_filter = if cli::is_verbose() {
        "yt_audience=debug,channel_analyzer=debug,youtube_client=debug,audience_core=debug"
    } else {
        "yt_audience=info,channel_analyzer=info,youtube_client=info,audience_core=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    if cli.verbose {
        tracing::debug!("Starting yt-audience {}", env!("CARGO_PKG_VERSION"));
    }

    cli::run(cli).await
}
