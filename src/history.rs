//! `rankmaster history`: list recent searches, most recent first.

use anyhow::Result;

use rankmaster_core::History;

use crate::config::Config;
use crate::file_storage;
use crate::show::format_ts;

pub fn run_history(config: &Config, json: bool) -> Result<()> {
    let entries = History::new(file_storage::open(config)).entries();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No recent searches.");
        return Ok(());
    }

    println!("Recent searches:");
    for (i, entry) in entries.iter().enumerate() {
        println!(
            "  {:>2}. {:<40} {}",
            i + 1,
            entry.site_key,
            format_ts(entry.recorded_at)
        );
    }
    Ok(())
}
