//! CLI entry point for the GTFS frequency analyzer.
//!
//! Provides subcommands for analyzing one feed and for comparing two feeds
//! side by side.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use gtfs_frequency::analyzers::analyzer::analyze_bytes;
use gtfs_frequency::analyzers::types::FeedAnalysis;
use gtfs_frequency::feed::time::{TimeOfDay, TimeWindow};
use gtfs_frequency::options::{AnalyzeOptions, DEFAULT_MAX_UPLOAD_BYTES};
use gtfs_frequency::{
    AnalysisError,
    fetch::{BasicClient, fetch_archive},
    output::{append_summary, print_json, print_pretty, write_json},
};
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "gtfs_frequency")]
#[command(about = "Classify GTFS routes by weekday daytime frequency", long_about = None)]
struct Cli {
    /// Reject archives larger than this many bytes
    #[arg(long, global = true, env = "GTFS_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_size: u64,

    /// Start of the daytime window (H:MM:SS)
    #[arg(long, global = true, default_value = "07:00:00")]
    window_start: TimeOfDay,

    /// End of the daytime window (H:MM:SS), inclusive
    #[arg(long, global = true, default_value = "22:00:00")]
    window_end: TimeOfDay,

    /// HTTP timeout in seconds when a source is a URL
    #[arg(long, global = true, default_value_t = 120)]
    http_timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a zipped GTFS feed from a file or URL
    Analyze {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// JSON file to write the result to
        #[arg(short, long)]
        output: Option<String>,

        /// CSV file to append a frequency summary row to
        #[arg(long)]
        summary_csv: Option<String>,
    },
    /// Analyze two feeds concurrently and emit both results
    Compare {
        /// Paths or URLs of exactly two feeds
        #[arg(value_name = "FILE_OR_URL", num_args = 2, required = true)]
        sources: Vec<String>,

        /// JSON file to write the pair of results to
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/gtfs_frequency.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("gtfs_frequency.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    if cli.window_start > cli.window_end {
        bail!(
            "window start {} is after window end {}",
            cli.window_start,
            cli.window_end
        );
    }

    let options = AnalyzeOptions::default()
        .with_max_size(cli.max_size)
        .with_window(TimeWindow {
            start: cli.window_start,
            end: cli.window_end,
        });
    let http_timeout = Duration::from_secs(cli.http_timeout);

    let result = match cli.command {
        Commands::Analyze {
            source,
            output,
            summary_csv,
        } => run_analyze(&source, output, summary_csv, &options, http_timeout).await,
        Commands::Compare { sources, output } => {
            run_compare(sources, output, &options, http_timeout).await
        }
    };

    if let Err(e) = &result {
        match e.downcast_ref::<AnalysisError>() {
            Some(analysis_error) => error!(
                kind = analysis_error.kind(),
                retryable = analysis_error.is_retryable(),
                error = %analysis_error,
                "Analysis failed"
            ),
            None => error!(error = %e, "Run failed"),
        }
    }

    result
}

async fn run_analyze(
    source: &str,
    output: Option<String>,
    summary_csv: Option<String>,
    options: &AnalyzeOptions,
    http_timeout: Duration,
) -> Result<()> {
    let bytes = fetcher(source, options.max_size_bytes, http_timeout).await?;
    let analysis = analyze_bytes(&bytes, options)?.with_feed_name(&feed_name(source));

    print_pretty(&analysis);
    match &output {
        Some(path) => write_json(path, &analysis)?,
        None => print_json(&analysis)?,
    }
    if let Some(path) = &summary_csv {
        append_summary(path, &analysis)?;
    }

    info!(
        feed = analysis.feed_name.as_deref().unwrap_or_default(),
        routes = analysis.frequencies.total(),
        "Analysis complete"
    );
    Ok(())
}

/// Each feed gets its own blocking task, and with it its own scratch directory.
#[tracing::instrument(skip(options, http_timeout))]
async fn run_compare(
    sources: Vec<String>,
    output: Option<String>,
    options: &AnalyzeOptions,
    http_timeout: Duration,
) -> Result<()> {
    let mut tasks = Vec::new();
    for source in sources {
        let bytes = fetcher(&source, options.max_size_bytes, http_timeout).await?;
        if bytes.is_empty() {
            bail!("{} is empty", source);
        }
        let options = options.clone();
        tasks.push(tokio::task::spawn_blocking(move || {
            analyze_bytes(&bytes, &options).map(|a| a.with_feed_name(&feed_name(&source)))
        }));
    }

    let mut results: Vec<FeedAnalysis> = Vec::with_capacity(tasks.len());
    for task in tasks {
        results.push(task.await??);
    }

    match &output {
        Some(path) => write_json(path, &results)?,
        None => print_json(&results)?,
    }
    info!(feeds = results.len(), "Comparison complete");
    Ok(())
}

/// Loads feed data from a local file path or fetches it over HTTP.
#[tracing::instrument(skip(http_timeout))]
async fn fetcher(source: &str, max_bytes: u64, http_timeout: Duration) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        let client = BasicClient::new(http_timeout)?;
        fetch_archive(&client, source, max_bytes).await?
    } else {
        std::fs::read(source)?
    };
    Ok(bytes)
}

/// Display name of a feed: the file stem of its path or URL.
fn feed_name(source: &str) -> String {
    let last = source
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(source);
    let last = last.split(['?', '#']).next().unwrap_or(last);
    Path::new(last)
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or(last)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_name_from_path_and_url() {
        assert_eq!(feed_name("feeds/seattle.zip"), "seattle");
        assert_eq!(feed_name("https://example.com/gtfs/tacoma.zip?v=2"), "tacoma");
        assert_eq!(feed_name("portland"), "portland");
    }

    #[test]
    fn test_cli_parses_compare() {
        let cli = Cli::try_parse_from(["gtfs_frequency", "compare", "a.zip", "b.zip"]).unwrap();
        assert_eq!(cli.window_start, TimeOfDay::from_hms(7, 0, 0));
        match cli.command {
            Commands::Compare { sources, output } => {
                assert_eq!(sources, vec!["a.zip", "b.zip"]);
                assert!(output.is_none());
            }
            _ => panic!("expected compare"),
        }
    }

    #[test]
    fn test_cli_compare_needs_two_sources() {
        assert!(Cli::try_parse_from(["gtfs_frequency", "compare", "a.zip"]).is_err());
    }
}
