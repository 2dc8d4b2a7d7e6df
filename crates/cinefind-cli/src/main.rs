//! cinefind - terminal movie discovery CLI.

/// Application configuration (TOML).
mod config;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::AppConfig;
use cinefind_api::tmdb::TmdbClient;
use cinefind_db::{AnalyticsStore, SqliteAnalyticsStore, resolve_data_dir};
use cinefind_tui::view::MovieCard;
use cinefind_tui::{run_page, search_movies};

/// Log file written while the discovery page owns the terminal.
const LOG_FILE_NAME: &str = "cinefind.log";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Open the interactive discovery page.
    Browse,
    /// Run one catalog search and print the results.
    Search(SearchArgs),
    /// Print the most frequent searches.
    Trending(TrendingArgs),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search text (default: the popularity listing).
    #[arg(long, default_value = "")]
    query: String,
}

/// Arguments for the `trending` subcommand.
#[derive(clap::Args)]
struct TrendingArgs {
    /// Number of entries (default: `[trending] limit` from config).
    #[arg(long)]
    limit: Option<usize>,
}

/// Builds a `TmdbClient` from the `TMDB_API_TOKEN` environment variable.
///
/// `[catalog]` config overrides the base URL and response language.
///
/// # Errors
///
/// Returns an error if `TMDB_API_TOKEN` is not set, the configured base URL
/// is invalid, or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN")
        .context("TMDB_API_TOKEN environment variable is required")?;

    let mut builder = TmdbClient::builder().api_token(api_token).user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));

    if let Some(ref base_url) = config.catalog.base_url {
        builder = builder.base_url(parse_base_url(base_url)?);
    }
    if let Some(ref language) = config.catalog.language {
        builder = builder.language(language);
    }

    builder.build().context("failed to build TMDB client")
}

/// Parses a base URL, adding the trailing slash endpoint paths are joined onto.
fn parse_base_url(raw: &str) -> Result<Url> {
    let normalized = if raw.ends_with('/') {
        String::from(raw)
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).with_context(|| format!("invalid catalog base_url {raw:?}"))
}

/// Loads `config.toml` from `--dir` or the default config directory.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    AppConfig::load_from_dir(dir).context("failed to load config")
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the client or store cannot be set up, or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(config: &AppConfig, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let store = SqliteAnalyticsStore::open(dir).context("failed to open analytics store")?;

    tracing::info!("Launching discovery page");
    run_page(Arc::new(client), Arc::new(store), config.search_settings())
        .await
        .context("discovery page failed")
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client or store cannot be set up, or the search fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, config: &AppConfig, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let store = SqliteAnalyticsStore::open(dir).context("failed to open analytics store")?;

    let movies = search_movies(&client, &store, &args.query)
        .await
        .context("movie search failed")?;

    if movies.is_empty() {
        tracing::info!("No movies found.");
        return Ok(());
    }

    tracing::info!("Results: {}", movies.len());
    tracing::info!("ID\tRating\tLang\tYear\tTitle\t\t\tPoster");
    for movie in &movies {
        let card = MovieCard::from_movie(movie);
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}\t\t\t{}",
            movie.id,
            card.rating,
            card.language,
            card.year,
            card.title,
            card.poster,
        );
    }

    Ok(())
}

/// Runs the `trending` subcommand.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or read.
#[instrument(skip_all)]
async fn run_trending(
    args: &TrendingArgs,
    config: &AppConfig,
    dir: Option<&PathBuf>,
) -> Result<()> {
    let store = SqliteAnalyticsStore::open(dir).context("failed to open analytics store")?;
    let limit = args.limit.unwrap_or(config.trending.limit);

    let entries = store
        .trending(limit)
        .await
        .context("failed to load trending searches")?;

    if entries.is_empty() {
        tracing::info!("No trending searches yet. Run `cinefind browse` to search.");
        return Ok(());
    }

    tracing::info!("Rank\tSearches\tID\tTitle\t\t\tPoster");
    for entry in &entries {
        tracing::info!(
            "{:>4}\t{}\t\t{}\t{}\t\t\t{}",
            entry.rank,
            entry.count,
            entry.id,
            entry.title,
            entry.poster_url.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}

/// Opens the log file in the data directory for appending.
fn open_log_file(dir: Option<&PathBuf>) -> Result<std::fs::File> {
    let data_dir = resolve_data_dir(dir).context("failed to resolve data directory")?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create directory {}", data_dir.display()))?;
    let path = data_dir.join(LOG_FILE_NAME);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

/// Installs the global tracing subscriber writing to `writer`.
fn init_tracing(writer: BoxMakeWriter, ansi: bool) {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dir = cli.dir.as_ref();

    // The discovery page owns the terminal, so its logs go to a file.
    if matches!(cli.command, Commands::Browse) {
        let log_file = open_log_file(dir)?;
        init_tracing(BoxMakeWriter::new(Mutex::new(log_file)), false);
    } else {
        init_tracing(BoxMakeWriter::new(std::io::stdout), true);
    }

    let config = load_config(dir)?;
    match cli.command {
        Commands::Browse => run_browse(&config, dir).await,
        Commands::Search(args) => run_search(&args, &config, dir).await,
        Commands::Trending(args) => run_trending(&args, &config, dir).await,
    }
}
