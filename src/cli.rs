//! Command-line interface.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context};
use audience_core::lexicon::{parse_keyword_list, CategoryKeywords};
use audience_core::{
    classify, resolve, AppConfig, Category, ErrorExt, JsonLexiconStore, KeywordLexicon,
    LexiconStore, PrimaryCategory, ScoreResult,
};
use channel_analyzer::{
    default_export_file_name, read_url_file, write_csv, BatchAnalyzer, BatchConfig, BatchHalt,
    BatchOutcome, CategorySummary, Progress,
};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use youtube_client::YouTubeApiClient;

/// Exit status when the API quota cut the batch short.
const EXIT_QUOTA_EXHAUSTED: u8 = 2;

#[derive(Parser)]
#[command(name = "yt-audience")]
#[command(about = "Classify YouTube channels into kids, teen and serious audiences")]
#[command(version)]
pub struct Cli {
    /// Config file path (defaults to ./yt-audience.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Keyword lexicon JSON file (overrides config)
    #[arg(long, global = true)]
    lexicon: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and classify channels behind a list of YouTube URLs
    Analyze {
        /// Channel or video URLs
        urls: Vec<String>,
        /// Read URLs from a file (one per line, or CSV)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// CSV column holding the URLs (header name; first column by default)
        #[arg(long, requires = "input")]
        column: Option<String>,
        /// Write results as CSV to this file
        #[arg(short, long, conflicts_with = "export")]
        output: Option<PathBuf>,
        /// Write results as CSV to a timestamped file in the current directory
        #[arg(long)]
        export: bool,
        /// YouTube Data API key (also read from YOUTUBE_API_KEY)
        #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        /// Pause between URLs in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Number of recent uploads added to each channel's text
        #[arg(long)]
        videos: Option<u32>,
    },

    /// Classify a piece of text without calling the API
    Classify {
        #[arg(short, long)]
        text: String,
    },

    /// Show how URLs are recognised
    Resolve {
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Inspect or edit the keyword lexicon
    Lexicon {
        #[command(subcommand)]
        command: LexiconCommands,
    },
}

#[derive(Subcommand)]
enum LexiconCommands {
    /// Print the keywords of every category
    Show,
    /// Replace the keywords of a category (comma-separated)
    Set {
        /// kids, teen or serious
        category: Category,
        /// Comma-separated keywords, e.g. "news, science"
        words: String,
        /// Language partition to replace (en, cs, sk, ...)
        #[arg(short, long)]
        lang: Option<String>,
    },
    /// Restore the built-in keywords
    Reset,
}

pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.lexicon {
        config.lexicon_path = path;
    }
    let store = JsonLexiconStore::new(&config.lexicon_path);

    match cli.command {
        Commands::Analyze {
            urls,
            input,
            column,
            output,
            export,
            api_key,
            delay_ms,
            videos,
        } => {
            if api_key.is_some() {
                config.api_key = api_key;
            }
            if let Some(delay_ms) = delay_ms {
                config.request_delay_ms = delay_ms;
            }
            if let Some(videos) = videos {
                config.recent_video_limit = videos;
            }
            config.validate()?;

            let mut urls = urls;
            if let Some(input) = input {
                let from_file = read_url_file(&input, column.as_deref())
                    .with_context(|| format!("reading URLs from {}", input.display()))?;
                urls.extend(from_file);
            }
            if urls.iter().all(|url| url.trim().is_empty()) {
                bail!("no URLs given; pass them as arguments or with --input");
            }

            let output = match (output, export) {
                (Some(path), _) => Some(path),
                (None, true) => Some(PathBuf::from(default_export_file_name(
                    Local::now().naive_local(),
                ))),
                (None, false) => None,
            };

            analyze(&config, &store, &urls, output.as_deref()).await
        }
        Commands::Classify { text } => {
            let lexicon = store.load();
            print_score(&classify(&text, &lexicon));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Resolve { urls } => {
            for url in &urls {
                match resolve(url) {
                    Some(entity) if entity.kind.needs_name_lookup() => {
                        println!(
                            "{url}\t{} '{}' (not supported, needs a channel id)",
                            entity.kind, entity.id
                        )
                    }
                    Some(entity) => println!("{url}\t{} {}", entity.kind, entity.id),
                    None => println!("{url}\tunrecognized"),
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Lexicon { command } => {
            lexicon_command(&store, command)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn analyze(
    config: &AppConfig,
    store: &JsonLexiconStore,
    urls: &[String],
    output: Option<&Path>,
) -> anyhow::Result<ExitCode> {
    let api_key = config.resolve_api_key()?;
    let client = YouTubeApiClient::from_config(config, api_key)?;
    let lexicon = store.load();

    let cancel = Arc::new(AtomicBool::new(false));
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing the current URL");
            on_interrupt.store(true, Ordering::SeqCst);
        }
    });

    let analyzer = BatchAnalyzer::new(BatchConfig::from_config(config)).with_cancel_flag(cancel);
    let outcome = analyzer
        .run(urls, &client, &lexicon, |p: &Progress| {
            eprintln!("[{}/{}] {}", p.index, p.total, p.url)
        })
        .await;

    print_outcome(&outcome);

    if let Some(path) = output {
        write_csv(path, &outcome.records)
            .with_context(|| format!("writing results to {}", path.display()))?;
        println!("Results written to {}", path.display());
    }

    let metrics = client.get_metrics().await;
    info!("{}", metrics.summary());
    for line in metrics.endpoint_summaries() {
        debug!("{}", line);
    }

    if outcome.is_quota_exhausted() {
        Ok(ExitCode::from(EXIT_QUOTA_EXHAUSTED))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_outcome(outcome: &BatchOutcome) {
    for skip in &outcome.skipped {
        eprintln!(
            "skipped [{}] {}: {}",
            skip.index,
            skip.url,
            skip.reason.user_friendly_message()
        );
    }

    match &outcome.halt {
        Some(BatchHalt::QuotaExceeded { at_index, url }) => eprintln!(
            "YouTube API quota exhausted at item {} ({}); remaining URLs were not analysed",
            at_index, url
        ),
        Some(BatchHalt::Cancelled { at_index }) => {
            eprintln!("Cancelled before item {}", at_index)
        }
        None => {}
    }

    if outcome.records.is_empty() {
        println!("No channels classified.");
        return;
    }

    println!(
        "{:<40} {:>12} {:>8} {:>14} {:<8} {:>5} {:>5} {:>8}",
        "Channel", "Subscribers", "Videos", "Views", "Primary", "Kids", "Teen", "Serious"
    );
    for record in &outcome.records {
        println!(
            "{:<40} {:>12} {:>8} {:>14} {:<8} {:>4}% {:>4}% {:>7}%",
            truncate(&record.channel_title, 40),
            record.subscribers,
            record.videos,
            record.views,
            record.primary_category,
            record.kids_pct,
            record.teen_pct,
            record.serious_pct
        );
    }

    let summary = CategorySummary::from_records(&outcome.records);
    println!();
    println!("Classified {} channels ({})", summary.total(), summary);
}

fn print_score(score: &ScoreResult) {
    for category in Category::ALL {
        println!(
            "{:<8} {:>4} hits {:>4}%",
            PrimaryCategory::from(category),
            score.raw.get(category),
            score.percent.get(category)
        );
    }
    println!("Primary: {}", score.primary);
}

fn lexicon_command(store: &JsonLexiconStore, command: LexiconCommands) -> anyhow::Result<()> {
    match command {
        LexiconCommands::Show => {
            let lexicon = store.load();
            println!("# {}", store.path().display());
            for category in Category::ALL {
                match lexicon.category(category) {
                    CategoryKeywords::Flat(words) => {
                        println!("{}: {}", category, words.join(", "))
                    }
                    CategoryKeywords::ByLanguage(partitions) => {
                        println!("{}:", category);
                        for (language, words) in partitions.iter() {
                            println!("  {}: {}", language, words.join(", "));
                        }
                    }
                }
            }
        }
        LexiconCommands::Set {
            category,
            words,
            lang,
        } => {
            let words = parse_keyword_list(&words);
            if words.is_empty() {
                bail!("no keywords given");
            }
            let mut lexicon = store.load();
            let count = words.len();
            if let Err(e) = lexicon.set_keywords(category, lang.as_deref(), words) {
                e.log_warn();
                bail!(e.user_friendly_message());
            }
            store.save(&lexicon)?;
            println!("Updated {} ({} keywords)", category, count);
        }
        LexiconCommands::Reset => {
            store.save(&KeywordLexicon::default())?;
            println!("Restored built-in keywords in {}", store.path().display());
        }
    }
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    }
}
