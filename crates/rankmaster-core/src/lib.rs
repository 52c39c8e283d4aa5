//! # RankMaster Core
//!
//! Shared, runtime-agnostic logic for RankMaster: report models, site-key
//! normalization, the key-value storage abstraction, the report cache with
//! its freshness window, the recent-queries history, and the analysis
//! provider trait.
//!
//! This crate contains no tokio, filesystem I/O, or network code. Durable
//! storage backends and concrete providers live in the `rankmaster` app
//! crate.

pub mod cache;
pub mod clock;
pub mod history;
pub mod key;
pub mod models;
pub mod provider;
pub mod storage;

pub use cache::{CacheStats, ReportCache, CACHE_STORAGE_KEY, FRESHNESS_WINDOW_MS};
pub use clock::{Clock, ManualClock, SystemClock};
pub use history::{History, HistoryEntry, HISTORY_CAPACITY, HISTORY_STORAGE_KEY};
pub use key::SiteKey;
pub use models::{Assessment, Category, Report, Section, Sections};
pub use provider::AnalysisProvider;
pub use storage::{KvStorage, StorageError};
