//! Analysis orchestration: normalize → cache → provider → persist.
//!
//! Each call to [`Analyzer::analyze`] runs one request through
//!
//! ```text
//! Idle ─▶ Checking ─┬─▶ CacheHit ──────────────▶ Done
//!                   └─▶ Fetching ─┬─▶ (persist) ▶ Done
//!                                 └─▶ Failed
//! ```
//!
//! - A fresh cache entry is returned tagged [`ReportSource::Cache`] after
//!   the configured minimum delay; the provider is not called.
//! - Otherwise the provider is called once. On success the report is
//!   stamped with the current time, written to the cache, and the key is
//!   promoted in the history. If the report cannot be written it is still
//!   returned, but the history is left alone so it never names a site with
//!   no stored report. On failure nothing is written and the caller
//!   gets [`AnalyzeError::Failed`]; retrying is up to the caller.
//! - Every request takes a monotonically increasing token. When a request
//!   finishes after a newer one has started, its result is discarded
//!   without touching storage and it returns [`AnalyzeError::Superseded`].
//!
//! The analyzer adds no timeout around the provider call; providers own
//! their transport timeouts.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use rankmaster_core::{
    AnalysisProvider, Clock, History, KvStorage, Report, ReportCache, SiteKey, SystemClock,
};

use crate::progress::{AnalysisEvent, NoProgress, ProgressReporter};

/// Where a returned report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSource {
    Cache,
    Fresh,
}

impl ReportSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportSource::Cache => "cached",
            ReportSource::Fresh => "fresh",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub report: Report,
    pub source: ReportSource,
}

/// Why a request produced no report. Provider failures of every kind map
/// to [`AnalyzeError::Failed`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error("Please enter a website to analyze.")]
    EmptyInput,
    #[error("Analysis failed. Please check your connection or try again later.")]
    Failed,
    #[error("A newer analysis request replaced this one.")]
    Superseded,
}

pub struct Analyzer {
    cache: ReportCache<Arc<dyn KvStorage>>,
    history: History<Arc<dyn KvStorage>>,
    provider: Arc<dyn AnalysisProvider>,
    clock: Arc<dyn Clock>,
    progress: Box<dyn ProgressReporter>,
    cache_hit_delay: Duration,
    latest_token: AtomicU64,
}

impl Analyzer {
    /// Analyzer with the system clock, default freshness window, no
    /// cache-hit delay, and no progress output.
    pub fn new(storage: Arc<dyn KvStorage>, provider: Arc<dyn AnalysisProvider>) -> Self {
        Self {
            cache: ReportCache::new(storage.clone()),
            history: History::new(storage),
            provider,
            clock: Arc::new(SystemClock),
            progress: Box::new(NoProgress),
            cache_hit_delay: Duration::ZERO,
            latest_token: AtomicU64::new(0),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_progress(mut self, progress: Box<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_cache_hit_delay(mut self, delay: Duration) -> Self {
        self.cache_hit_delay = delay;
        self
    }

    pub fn with_freshness_window(self, window: chrono::Duration) -> Self {
        let storage = self.cache.storage().clone();
        Self {
            cache: ReportCache::with_window(storage, window),
            ..self
        }
    }

    /// Run one analysis request for raw user input.
    pub async fn analyze(&self, raw: &str) -> Result<AnalysisOutcome, AnalyzeError> {
        let key = SiteKey::normalize(raw).ok_or(AnalyzeError::EmptyInput)?;
        let token = self.latest_token.fetch_add(1, Ordering::SeqCst) + 1;
        let site = key.to_string();

        self.progress.report(AnalysisEvent::Checking { site: site.clone() });

        if let Some(report) = self.cache.get(&key, self.clock.now()) {
            if !self.cache_hit_delay.is_zero() {
                tokio::time::sleep(self.cache_hit_delay).await;
            }
            if !self.is_latest(token) {
                return Err(self.superseded(site));
            }
            self.record_history(&key);
            tracing::info!(site = %key, fetched_at = %report.fetched_at, "serving cached report");
            self.progress.report(AnalysisEvent::CacheHit { site });
            return Ok(AnalysisOutcome {
                report,
                source: ReportSource::Cache,
            });
        }

        self.progress.report(AnalysisEvent::Fetching {
            site: site.clone(),
            provider: self.provider.name().to_string(),
        });

        let assessment = match self.provider.fetch(&key).await {
            Ok(a) => a,
            Err(e) => {
                tracing::warn!(
                    site = %key,
                    provider = self.provider.name(),
                    error = %format!("{:#}", e),
                    "analysis failed"
                );
                self.progress.report(AnalysisEvent::Failed { site });
                return Err(AnalyzeError::Failed);
            }
        };

        if !self.is_latest(token) {
            return Err(self.superseded(site));
        }

        let report = Report::from_assessment(key.clone(), assessment, self.clock.now());
        match self.cache.put(&key, &report) {
            Ok(()) => self.record_history(&key),
            Err(e) => {
                tracing::warn!(
                    site = %key,
                    error = %e,
                    "failed to persist report, history unchanged"
                );
            }
        }
        tracing::info!(site = %key, score = report.overall_score, "stored fresh report");
        self.progress.report(AnalysisEvent::Done { site });

        Ok(AnalysisOutcome {
            report,
            source: ReportSource::Fresh,
        })
    }

    fn is_latest(&self, token: u64) -> bool {
        self.latest_token.load(Ordering::SeqCst) == token
    }

    fn superseded(&self, site: String) -> AnalyzeError {
        tracing::debug!(site = %site, "discarding result of superseded request");
        self.progress.report(AnalysisEvent::Superseded { site });
        AnalyzeError::Superseded
    }

    fn record_history(&self, key: &SiteKey) {
        if let Err(e) = self.history.record(key, self.clock.now()) {
            tracing::warn!(site = %key, error = %e, "failed to update history");
        }
    }
}
