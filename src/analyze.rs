//! `rankmaster analyze`: run one analysis request and print the report.

use std::time::Duration;

use anyhow::Result;

use crate::analyzer::Analyzer;
use crate::config::Config;
use crate::file_storage;
use crate::progress::ProgressMode;
use crate::provider::create_provider;
use crate::show::{print_report, report_json};

/// Build an [`Analyzer`] from configuration: file storage, the configured
/// provider, freshness window, and cache-hit delay.
pub fn build_analyzer(config: &Config, progress: ProgressMode) -> Result<Analyzer> {
    let provider = create_provider(&config.provider)?;
    Ok(Analyzer::new(file_storage::open(config), provider)
        .with_freshness_window(config.cache.freshness_window())
        .with_cache_hit_delay(Duration::from_millis(config.analysis.cache_hit_delay_ms))
        .with_progress(progress.reporter()))
}

/// CLI entry point: analyze `site`, print the report to stdout.
pub async fn run_analyze(
    config: &Config,
    site: &str,
    json: bool,
    progress: ProgressMode,
) -> Result<()> {
    let analyzer = build_analyzer(config, progress)?;

    let outcome = match analyzer.analyze(site).await {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report_json(&outcome.report, outcome.source))?
        );
    } else {
        print_report(
            &outcome.report,
            outcome.source,
            config.cache.freshness_window(),
        );
    }
    Ok(())
}
