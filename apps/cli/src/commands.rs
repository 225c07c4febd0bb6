//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use paperfeed_core::backfill::backfill_store;
use paperfeed_core::pipeline::ProgressReporter;
use paperfeed_core::run::{RecordSource, RunOptions, RunReport, run_ingest};
use paperfeed_search::SearchOptions;
use paperfeed_shared::{AppConfig, init_config, load_config, load_config_from};
use paperfeed_store::PaperStore;
use paperfeed_translate::TranslatorBackend;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// paperfeed: collect, translate and publish notable AI research papers.
#[derive(Parser)]
#[command(
    name = "paperfeed",
    version,
    about = "Collect notable AI research papers from arXiv into a curated paper store.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ~/.paperfeed/paperfeed.toml).
    #[arg(long, global = true, env = "PAPERFEED_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Search arXiv and merge new papers into the store.
    Fetch {
        /// Paper store to update (defaults to [store].path).
        #[arg(long)]
        store: Option<PathBuf>,

        /// Lookback window in days.
        #[arg(long)]
        days: Option<u32>,

        /// Maximum search results requested.
        #[arg(long)]
        max_results: Option<u32>,

        /// Keep titles and summaries in English.
        #[arg(long)]
        no_translate: bool,

        /// Show what would be added without writing the store.
        #[arg(long)]
        dry_run: bool,
    },

    /// Run the pipeline over records from a JSON file.
    Ingest {
        /// JSON array of records.
        #[arg(short, long)]
        input: PathBuf,

        /// Paper store to update (defaults to [store].path).
        #[arg(long)]
        store: Option<PathBuf>,

        /// Lookback window in days.
        #[arg(long)]
        days: Option<u32>,

        /// Keep titles and summaries in English.
        #[arg(long)]
        no_translate: bool,

        /// Show what would be added without writing the store.
        #[arg(long)]
        dry_run: bool,
    },

    /// Translate English summaries and add missing Korean titles in the store.
    Backfill {
        /// Paper store to update (defaults to [store].path).
        #[arg(long)]
        store: Option<PathBuf>,

        /// Report what would change without writing the store.
        #[arg(long)]
        dry_run: bool,
    },

    /// Show entry counts per organization and domain.
    Stats {
        /// Paper store to read (defaults to [store].path).
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "paperfeed=info",
        1 => "paperfeed=debug",
        _ => "paperfeed=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Fetch {
            store,
            days,
            max_results,
            no_translate,
            dry_run,
        } => {
            let mut config = resolve_config(config_path)?;
            if let Some(days) = days {
                config.search.lookback_days = days;
            }
            if let Some(max) = max_results {
                config.search.max_results = max;
            }
            let source = RecordSource::Arxiv(SearchOptions::try_from(&config)?);
            cmd_ingest(&config, source, store, no_translate, dry_run).await
        }
        Command::Ingest {
            input,
            store,
            days,
            no_translate,
            dry_run,
        } => {
            let mut config = resolve_config(config_path)?;
            if let Some(days) = days {
                config.search.lookback_days = days;
            }
            cmd_ingest(&config, RecordSource::File(input), store, no_translate, dry_run).await
        }
        Command::Backfill { store, dry_run } => {
            let config = resolve_config(config_path)?;
            cmd_backfill(&config, store, dry_run).await
        }
        Command::Stats { store } => {
            let config = resolve_config(config_path)?;
            cmd_stats(&config, store)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

fn store_path(config: &AppConfig, flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| PathBuf::from(&config.store.path))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_ingest(
    config: &AppConfig,
    source: RecordSource,
    store: Option<PathBuf>,
    no_translate: bool,
    dry_run: bool,
) -> Result<()> {
    let translator = TranslatorBackend::from_config(config, config.translation.enabled && !no_translate)?;

    let mut options = RunOptions::from_config(config);
    options.store_path = store_path(config, store);
    options.dry_run = dry_run;

    info!(
        source = %source.describe(),
        store = %options.store_path.display(),
        translator = translator.name(),
        dry_run,
        "collecting papers"
    );

    let reporter = CliProgress::new();
    let report = match run_ingest(&source, &options, &translator, &reporter, Utc::now()).await {
        Ok(report) => report,
        Err(e) => {
            reporter.finish();
            if e.is_merge_abort() {
                eprintln!("  Merge aborted, store left untouched.");
            }
            return Err(e.into());
        }
    };

    print_report(&report, dry_run);
    Ok(())
}

fn print_report(report: &RunReport, dry_run: bool) {
    let outcome = &report.outcome;

    println!();
    if outcome.added.is_empty() {
        println!("  No new papers to add.");
    } else if dry_run {
        println!("  Would add {} papers (dry run):", outcome.added.len());
    } else {
        println!("  Added {} papers:", outcome.added.len());
    }

    for id in &outcome.added {
        // Renamed entries are listed under their assigned id.
        let original = outcome
            .renamed
            .iter()
            .find(|(_, new_id)| new_id == id)
            .map_or(id.as_str(), |(old, _)| old.as_str());
        if let Some(c) = report.batch.iter().find(|c| c.id == original) {
            let title: String = c.title.chars().take(50).collect();
            println!("    + [{}] {title} (score: {})", c.organization, c.score);
        }
    }

    println!();
    println!("  Run:        {}", report.run_id);
    println!("  Fetched:    {}", report.fetched);
    println!("  Candidates: {}", report.batch.len());
    println!("  Duplicates: {}", outcome.duplicates.len());
    if outcome.capped > 0 {
        println!("  Capped:     {}", outcome.capped);
    }
    for (old, new) in &outcome.renamed {
        println!("  Renamed:    {old} -> {new}");
    }
    println!("  Time:       {:.1}s", report.elapsed.as_secs_f64());
    println!();
}

async fn cmd_backfill(config: &AppConfig, store: Option<PathBuf>, dry_run: bool) -> Result<()> {
    let path = store_path(config, store);
    let translator = TranslatorBackend::from_config(config, true)?;

    info!(store = %path.display(), dry_run, "backfilling translations");

    let reporter = CliProgress::new();
    reporter.phase("Translating store entries");
    let outcome = backfill_store(&path, &translator, dry_run).await;
    reporter.finish();
    let outcome = outcome?;

    println!();
    println!("  Summaries translated: {}", outcome.summaries_translated);
    println!("  Titles added:         {}", outcome.titles_added);
    if dry_run && outcome.changed() {
        println!("  (dry run, store not written)");
    }
    println!();
    Ok(())
}

fn cmd_stats(config: &AppConfig, store: Option<PathBuf>) -> Result<()> {
    let path = store_path(config, store);
    let stats = PaperStore::open(&path)?.stats();

    println!();
    println!("  Total papers: {}", stats.total);
    println!();
    println!("  By organization:");
    for (org, count) in stats.top_organizations() {
        println!("    {org:<12} {count}");
    }
    println!();
    println!("  By domain:");
    for (domain, count) in &stats.by_domain {
        println!("    {domain:<12} {count}");
    }
    println!();
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn candidate_translated(&self, title: &str, current: usize, total: usize) {
        let short: String = title.chars().take(50).collect();
        self.spinner
            .set_message(format!("Translating [{current}/{total}] {short}"));
    }

    fn done(&self, _report: &RunReport) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_fetch_flags() {
        let cli = Cli::try_parse_from([
            "paperfeed",
            "-vv",
            "fetch",
            "--days",
            "5",
            "--no-translate",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Fetch {
                days,
                no_translate,
                dry_run,
                store,
                ..
            } => {
                assert_eq!(days, Some(5));
                assert!(no_translate && dry_run);
                assert!(store.is_none());
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn ingest_requires_input() {
        assert!(Cli::try_parse_from(["paperfeed", "ingest"]).is_err());
        assert!(Cli::try_parse_from(["paperfeed", "ingest", "--input", "records.json"]).is_ok());
    }
}
