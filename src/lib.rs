//! # RankMaster
//!
//! Command-line website visibility analyzer. Given a site name or URL,
//! RankMaster asks a language-model provider for an SEO / AEO / Google
//! ranking assessment and keeps the result in a local report cache so
//! repeated lookups within a week are served without another provider call.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌───────────────┐
//! │   CLI    │──▶│  Analyzer  │──▶│   Provider    │
//! │ (clap)   │   │  fencing   │   │ Gemini / dir  │
//! └──────────┘   └─────┬──────┘   └───────────────┘
//!                      │
//!            ┌─────────┴─────────┐
//!            ▼                   ▼
//!      ┌────────────┐      ┌───────────┐
//!      │ReportCache │      │  History  │
//!      │  (7 days)  │      │  (10 max) │
//!      └─────┬──────┘      └─────┬─────┘
//!            └────────┬──────────┘
//!                     ▼
//!              ┌─────────────┐
//!              │ FileStorage │
//!              └─────────────┘
//! ```
//!
//! The cache, history, key normalization and data model live in
//! [`rankmaster_core`] and are re-exported here.
//!
//! ## Quick Start
//!
//! ```bash
//! rankmaster analyze example.com     # fetch or serve from cache
//! rankmaster show example.com        # cached report only
//! rankmaster share example.com       # one-line share text
//! rankmaster history                 # recent searches
//! rankmaster stats                   # cache overview
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`analyzer`] | Cache-first analysis orchestration |
//! | [`provider`] | Analysis provider implementations |
//! | [`file_storage`] | Directory-backed key/value storage |
//! | [`progress`] | Progress reporting to stderr |
//! | [`logging`] | Tracing subscriber setup |
//! | [`analyze`], [`show`], [`history`], [`stats`] | CLI commands |

pub mod analyze;
pub mod analyzer;
pub mod config;
pub mod file_storage;
pub mod history;
pub mod logging;
pub mod progress;
pub mod provider;
pub mod show;
pub mod stats;

pub use rankmaster_core::{
    AnalysisProvider, Assessment, Category, Clock, History, HistoryEntry, KvStorage, ManualClock,
    Report, ReportCache, Section, Sections, SiteKey, StorageError, SystemClock,
};
