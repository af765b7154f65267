//! `roost`: build the static tweet archive site.
//!
//! Each subcommand loads the dataset, runs one step and writes one artifact.

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use roost_common::RoostError;
use roost_common::observability::init_logging;
use roost_config::{RoostConfig, RoostConfigLoader, default_config_candidates};
use roost_site::IdFilter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod commands;

#[derive(Parser)]
#[command(name = "roost")]
#[command(about = "Static pages, archive index and sitemap for a tweet archive")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./roost.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level; also mirrors logs to stderr
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Move leading dates out of `alt` into `date`
    Clean {
        /// Input dataset
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Backup of the original (defaults to <input>.bak)
        #[arg(short, long)]
        backup: Option<PathBuf>,

        /// Cleaned output (defaults to overwriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render one page per tweet
    Bake {
        /// Input dataset
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Comma-separated ids to render, or `all` (empty means all)
        #[arg(long)]
        ids: Option<IdFilter>,

        /// Render at most this many tweets (0 means no limit)
        #[arg(long)]
        limit: Option<usize>,

        /// Bake log (tab-separated, appended)
        #[arg(long)]
        log: Option<PathBuf>,

        /// Directory receiving <id>/index.html
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Render the archive index page
    Archive {
        /// Input dataset
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output HTML file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write sitemap.xml
    Sitemap {
        /// Site base URL, e.g. https://example.com
        #[arg(short, long)]
        base_url: Option<String>,

        /// Input JSON or JSON-lines file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output sitemap file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn load_config(explicit: Option<&Path>) -> Result<RoostConfig> {
    let loader = match explicit {
        Some(path) => RoostConfigLoader::new().with_file(path),
        None => default_config_candidates()
            .into_iter()
            .rev()
            .fold(RoostConfigLoader::new(), |l, p| l.with_optional_file(p)),
    };
    Ok(loader.load()?)
}

fn run(cli: Cli) -> Result<()> {
    let cfg = load_config(cli.config.as_deref())?;

    let mut log_cfg = cfg.logging.to_log_config();
    if cli.verbose > 0 {
        log_cfg.emit_stderr = true;
        log_cfg.default_filter = if cli.verbose == 1 { "debug" } else { "trace" }.to_string();
    }
    init_logging(log_cfg)?;

    let paths = cfg.paths();
    match cli.command {
        Commands::Clean {
            input,
            backup,
            output,
        } => commands::clean(&paths, input, backup, output),
        Commands::Bake {
            input,
            ids,
            limit,
            log,
            out_dir,
        } => commands::bake(&paths, input, ids, limit, log, out_dir),
        Commands::Archive { input, output } => commands::archive(&paths, input, output),
        Commands::Sitemap {
            base_url,
            input,
            output,
        } => {
            let base_url = base_url.or(cfg.site.base_url).ok_or_else(|| {
                RoostError::Config("a base URL is required (--base-url or site.base_url)".into())
            })?;
            commands::sitemap(&paths, &base_url, input, output)
        }
    }
}

/// 2: input unreadable, 3: input unparseable, 1: anything else (including
/// failed writes).
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<RoostError>() {
        Some(RoostError::Read { .. }) => 2,
        Some(RoostError::Json(_) | RoostError::Dataset(_)) => 3,
        _ => 1,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "command failed");
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}
