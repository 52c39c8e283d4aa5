//! Analysis progress reporting.
//!
//! Reports each state transition of an analysis request (checking the
//! cache, serving a cache hit, fetching from the provider, done, failed) so
//! users can see what a slow command is waiting on. Progress is emitted on
//! **stderr** so stdout remains parseable for scripts.

use std::io::Write;

use anyhow::{bail, Result};

/// A single state transition of one analysis request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AnalysisEvent {
    /// Input normalized; looking the key up in the cache.
    Checking { site: String },
    /// A fresh report was found in the cache.
    CacheHit { site: String },
    /// Cache miss or stale entry; the provider is being called.
    Fetching { site: String, provider: String },
    /// A freshly fetched report was stored.
    Done { site: String },
    /// The provider failed; nothing was stored.
    Failed { site: String },
    /// A newer request started before this one finished; its result was dropped.
    Superseded { site: String },
}

impl AnalysisEvent {
    pub fn phase(&self) -> &'static str {
        match self {
            AnalysisEvent::Checking { .. } => "checking",
            AnalysisEvent::CacheHit { .. } => "cache-hit",
            AnalysisEvent::Fetching { .. } => "fetching",
            AnalysisEvent::Done { .. } => "done",
            AnalysisEvent::Failed { .. } => "failed",
            AnalysisEvent::Superseded { .. } => "superseded",
        }
    }

    pub fn site(&self) -> &str {
        match self {
            AnalysisEvent::Checking { site }
            | AnalysisEvent::CacheHit { site }
            | AnalysisEvent::Fetching { site, .. }
            | AnalysisEvent::Done { site }
            | AnalysisEvent::Failed { site }
            | AnalysisEvent::Superseded { site } => site,
        }
    }
}

/// Receives progress events. Implementations write to stderr (human or JSON).
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: AnalysisEvent);
}

/// Human-friendly progress on stderr: "analyze example.com  fetching (gemini)...".
pub struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn report(&self, event: AnalysisEvent) {
        let line = match &event {
            AnalysisEvent::Checking { site } => format!("analyze {}  checking cache...\n", site),
            AnalysisEvent::CacheHit { site } => {
                format!("analyze {}  using cached report\n", site)
            }
            AnalysisEvent::Fetching { site, provider } => {
                format!("analyze {}  fetching ({})...\n", site, provider)
            }
            AnalysisEvent::Done { site } => format!("analyze {}  done\n", site),
            AnalysisEvent::Failed { site } => format!("analyze {}  failed\n", site),
            AnalysisEvent::Superseded { site } => {
                format!("analyze {}  superseded by a newer request\n", site)
            }
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl ProgressReporter for JsonProgress {
    fn report(&self, event: AnalysisEvent) {
        let mut obj = serde_json::json!({
            "event": "progress",
            "site": event.site(),
            "phase": event.phase(),
        });
        if let AnalysisEvent::Fetching { provider, .. } = &event {
            obj["provider"] = serde_json::Value::String(provider.clone());
        }
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _event: AnalysisEvent) {}
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    /// Parse a `--progress` value; `None` picks [`default_for_tty`](Self::default_for_tty).
    pub fn from_flag(flag: Option<&str>) -> Result<Self> {
        match flag {
            None => Ok(Self::default_for_tty()),
            Some("off") => Ok(ProgressMode::Off),
            Some("human") => Ok(ProgressMode::Human),
            Some("json") => Ok(ProgressMode::Json),
            Some(other) => bail!(
                "Unknown progress mode: '{}'. Must be off, human, or json.",
                other
            ),
        }
    }

    pub fn reporter(&self) -> Box<dyn ProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
