//! Cache statistics and health overview.
//!
//! Summarizes what is stored locally: how many reports are still fresh, how
//! many have gone stale and will be refetched on next use, and how long the
//! recent-searches list is. Used by `rankmaster stats`.

use anyhow::Result;

use rankmaster_core::{Clock, History, ReportCache, SystemClock, HISTORY_CAPACITY};

use crate::config::Config;

pub fn run_stats(config: &Config) -> Result<()> {
    let storage = crate::file_storage::open(config);
    let cache = ReportCache::with_window(storage.clone(), config.cache.freshness_window());
    let stats = cache.stats(SystemClock.now());
    let history = History::new(storage).entries();

    println!("RankMaster: Cache Stats");
    println!("======================");
    println!();
    println!("  Storage:     {}", config.storage.dir.display());
    println!("  Window:      {} days", config.cache.freshness_days);
    if config.provider.is_enabled() {
        println!("  Provider:    {}", config.provider.kind);
    } else {
        println!("  Provider:    disabled (cache misses will fail)");
    }
    println!();
    println!("  Reports:     {}", stats.total());
    println!("    fresh:     {}", stats.fresh);
    println!("    stale:     {}", stats.stale);
    if stats.unreadable > 0 {
        println!("    unreadable: {}", stats.unreadable);
    }
    println!("  History:     {} / {}", history.len(), HISTORY_CAPACITY);

    Ok(())
}
