//! # RankMaster CLI (`rankmaster`)
//!
//! ## Usage
//!
//! ```bash
//! rankmaster --config ./config/rankmaster.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rankmaster analyze <site>` | Analyze a site, serving a fresh cached report when one exists |
//! | `rankmaster show <site>` | Print the cached report without calling the provider |
//! | `rankmaster share <site>` | Print one-line share text for a cached report |
//! | `rankmaster history` | List recent searches, most recent first |
//! | `rankmaster stats` | Cache and history overview |
//! | `rankmaster completions <shell>` | Generate shell completions |

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use rankmaster::{analyze, config, history, logging, progress, show, stats};

/// RankMaster: AI-assisted SEO, AEO and Google ranking reports with a
/// local seven-day report cache.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/rankmaster.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "rankmaster",
    about = "RankMaster: AI website visibility reports with a local report cache",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/rankmaster.toml")]
    config: PathBuf,

    /// Enable debug logging on stderr (`RUST_LOG` takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a website.
    ///
    /// Input is trimmed and lower-cased before lookup. A cached report
    /// younger than the freshness window is returned without calling the
    /// provider; otherwise a new assessment is fetched and cached.
    Analyze {
        /// Site name or URL, e.g. `example.com`.
        site: String,

        /// Print the report and its source as JSON.
        #[arg(long)]
        json: bool,

        /// Progress output on stderr: `off`, `human` or `json`.
        /// Defaults to `human` on a terminal and `off` otherwise.
        #[arg(long)]
        progress: Option<String>,
    },

    /// Print a cached report. Never calls the provider.
    Show {
        /// Site name or URL.
        site: String,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print one-line share text for a cached report.
    Share {
        /// Site name or URL.
        site: String,
    },

    /// List recent searches.
    History {
        /// Print entries as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show cache and history statistics.
    Stats,

    /// Generate shell completions to stdout.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    // Commands that don't require config
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "rankmaster", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Analyze {
            site,
            json,
            progress,
        } => {
            let mode = progress::ProgressMode::from_flag(progress.as_deref())?;
            analyze::run_analyze(&cfg, &site, json, mode).await?;
        }
        Commands::Show { site, json } => {
            show::run_show(&cfg, &site, json)?;
        }
        Commands::Share { site } => {
            show::run_share(&cfg, &site)?;
        }
        Commands::History { json } => {
            history::run_history(&cfg, json)?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg)?;
        }
        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
