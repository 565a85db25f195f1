use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use openalex_works::config::{find_config_file, get_config, load_config, Config};
use openalex_works::graph::{Hop, HopDelays, WorkGraph};
use openalex_works::models::Work;
use openalex_works::sources::OpenAlexSource;
use openalex_works::utils::{format_entry, EntryType};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Print the BibTeX or RIS entry for a work in OpenAlex
#[derive(Parser, Debug)]
#[command(name = "openalex-works")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Print the RIS or BibTeX entry for a particular paper", long_about = None)]
struct Cli {
    /// Work to look up: an OpenAlex URL or key, or a DOI URL
    #[arg(long, short, required_unless_present = "write_config")]
    url: Option<String>,

    /// Type of entry to print (bibtex or ris)
    #[arg(long = "entrytype", short = 'e', required_unless_present = "write_config")]
    entry_type: Option<String>,

    /// Print entries for the works one hop away instead of the work itself
    #[arg(long, value_enum)]
    follow: Option<FollowArg>,

    /// Print a one-line summary instead of a citation entry
    #[arg(long)]
    summary: bool,

    /// Enable verbose logging (-v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress everything but errors on stderr
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// OpenAlex API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Contact email for the OpenAlex polite pool
    #[arg(long, env = "OPENALEX_EMAIL")]
    mailto: Option<String>,

    /// Write the effective configuration to this path and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

/// Linked works to print
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FollowArg {
    /// Works OpenAlex considers related
    Related,
    /// Works citing this one
    Citing,
    /// Works this one cites
    References,
}

impl From<FollowArg> for Hop {
    fn from(arg: FollowArg) -> Self {
        match arg {
            FollowArg::Related => Hop::Related,
            FollowArg::Citing => Hop::Citing,
            FollowArg::References => Hop::References,
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = if quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("openalex_works={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(path) = &cli.config {
        load_config(path).with_context(|| format!("loading config {}", path.display()))?
    } else if let Some(path) = find_config_file() {
        tracing::info!("Using config file: {}", path.display());
        load_config(&path).with_context(|| format!("loading config {}", path.display()))?
    } else {
        get_config()?
    };

    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.api.timeout_secs = timeout;
    }
    if let Some(mailto) = &cli.mailto {
        config.api.mailto = Some(mailto.clone());
    }
    Ok(config)
}

fn render(work: &Work, entry_type: EntryType, summary: bool) -> Result<String> {
    if summary {
        return Ok(work.to_string());
    }
    Ok(format_entry(work, entry_type)?)
}

/// Text placed between consecutive entries when printing linked works
fn entry_separator(summary: bool, entry_type: EntryType) -> &'static str {
    // BibTeX entries already end in a newline
    match (summary, entry_type) {
        (false, EntryType::Ris) => "\n\n",
        _ => "\n",
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;

    if let Some(path) = &cli.write_config {
        config
            .save(path)
            .with_context(|| format!("writing config {}", path.display()))?;
        tracing::info!("Wrote config to {}", path.display());
        return Ok(());
    }

    let url = cli.url.as_deref().context("--url is required")?;
    let entry_type: EntryType = cli
        .entry_type
        .as_deref()
        .context("--entrytype is required")?
        .parse()?;

    let source = OpenAlexSource::from_config(&config.api)?;
    let graph =
        WorkGraph::new(Arc::new(source)).with_delays(HopDelays::from(&config.throttle));

    let work = graph
        .fetch(url)
        .await
        .with_context(|| format!("fetching {}", url))?;

    match cli.follow {
        None => println!("{}", render(&work, entry_type, cli.summary)?),
        Some(follow) => {
            let hop = Hop::from(follow);
            let linked = graph.hop(&work, hop).await?;
            tracing::info!("{} {} works for {}", linked.len(), hop, url);

            let entries = linked
                .iter()
                .map(|w| render(w, entry_type, cli.summary))
                .collect::<Result<Vec<_>>>()?;
            println!("{}", entries.join(entry_separator(cli.summary, entry_type)));
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    run(cli).await
}
