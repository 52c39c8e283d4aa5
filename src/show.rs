//! Report display: `rankmaster show` and `rankmaster share`.
//!
//! Both commands read only the local cache and never call the provider.
//! [`print_report`] is also used by `rankmaster analyze`.

use anyhow::Result;
use chrono::Duration;

use rankmaster_core::{Clock, Report, ReportCache, SiteKey, SystemClock};

use crate::analyzer::ReportSource;
use crate::config::Config;
use crate::file_storage;

/// One-line share text for a report.
pub fn share_text(report: &Report) -> String {
    format!(
        "RankMaster AI Report for {}: Overall Score {}/100. Analysis: {}",
        report.display_name(),
        report.overall_score,
        report.summary
    )
}

/// Report plus its source, as printed by `--json`.
pub fn report_json(report: &Report, source: ReportSource) -> serde_json::Value {
    serde_json::json!({
        "source": source.as_str(),
        "report": report,
    })
}

/// Print a report in human-readable form.
pub fn print_report(report: &Report, source: ReportSource, window: Duration) {
    println!("--- RankMaster Report ---");
    println!(
        "site:          {} ({})",
        report.display_name(),
        report.site_key
    );
    if !report.url.is_empty() {
        println!("url:           {}", report.url);
    }
    println!("overall score: {}/100", report.overall_score);
    println!("source:        {}", source.as_str());
    println!("analyzed:      {}", format_ts(report.fetched_at));
    println!("valid until:   {}", valid_until(report, window));
    println!();

    println!("--- Summary ---");
    println!("{}", report.summary);
    println!();

    for (category, section) in report.sections.iter() {
        println!(
            "--- {} ({}/100) | {} ---",
            category.title(),
            section.score,
            category.description()
        );
        print_list("Advantages", "+", &section.advantages);
        print_list("Disadvantages", "-", &section.disadvantages);
        print_list("Recommendations", "*", &section.recommendations);
        println!();
    }
}

fn print_list(label: &str, bullet: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{}:", label);
    for item in items {
        println!("  {} {}", bullet, item);
    }
}

/// End of the freshness window, or `n/a` when it falls outside the
/// representable date range.
fn valid_until(report: &Report, window: Duration) -> String {
    report
        .fetched_at
        .checked_add_signed(window)
        .map(format_ts)
        .unwrap_or_else(|| "n/a".to_string())
}

pub(crate) fn format_ts(ts: chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Look up a fresh cached report for raw user input.
pub fn cached_report(config: &Config, site: &str) -> Result<Option<Report>> {
    let key = SiteKey::normalize(site)
        .ok_or_else(|| anyhow::anyhow!("Please enter a website to look up."))?;
    let cache = ReportCache::with_window(
        file_storage::open(config),
        config.cache.freshness_window(),
    );
    Ok(cache.get(&key, SystemClock.now()))
}

/// CLI entry point for `rankmaster show`.
pub fn run_show(config: &Config, site: &str, json: bool) -> Result<()> {
    let report = match cached_report(config, site)? {
        Some(r) => r,
        None => {
            eprintln!(
                "No fresh report cached for '{}'. Run `rankmaster analyze {}` first.",
                site.trim(),
                site.trim()
            );
            std::process::exit(1);
        }
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report_json(&report, ReportSource::Cache))?
        );
    } else {
        print_report(&report, ReportSource::Cache, config.cache.freshness_window());
    }
    Ok(())
}

/// CLI entry point for `rankmaster share`.
pub fn run_share(config: &Config, site: &str) -> Result<()> {
    match cached_report(config, site)? {
        Some(report) => {
            println!("{}", share_text(&report));
            Ok(())
        }
        None => {
            eprintln!("No fresh report cached for '{}'.", site.trim());
            std::process::exit(1);
        }
    }
}
