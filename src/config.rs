//! TOML configuration parsing and validation.
//!
//! ```toml
//! [storage]
//! dir = "./data"
//!
//! [cache]
//! freshness_days = 7
//!
//! [analysis]
//! cache_hit_delay_ms = 0
//!
//! [provider]
//! kind = "gemini"
//! model = "gemini-3-flash-preview"
//! ```
//!
//! Only `[storage]` is required. See `config/rankmaster.example.toml`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_freshness_days")]
    pub freshness_days: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            freshness_days: default_freshness_days(),
        }
    }
}

/// Upper bound on `cache.freshness_days` (about a century).
pub const MAX_FRESHNESS_DAYS: i64 = 36_500;

fn default_freshness_days() -> i64 {
    7
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AnalysisConfig {
    /// Minimum time a cache hit takes before it is returned. The web
    /// dashboard used 800 so cached and live results felt the same.
    #[serde(default)]
    pub cache_hit_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_provider")]
    pub kind: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Directory of prepared `<site>.json` assessments (`kind = "directory"`).
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: default_provider(),
            model: default_model(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            dir: None,
        }
    }
}

fn default_provider() -> String {
    "disabled".to_string()
}
fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_max_retries() -> u32 {
    2
}

impl ProviderConfig {
    pub fn is_enabled(&self) -> bool {
        self.kind != "disabled"
    }
}

impl CacheConfig {
    pub fn freshness_window(&self) -> chrono::Duration {
        chrono::Duration::days(self.freshness_days)
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.storage.dir.as_os_str().is_empty() {
        anyhow::bail!("storage.dir must not be empty");
    }

    if config.cache.freshness_days < 1 {
        anyhow::bail!("cache.freshness_days must be >= 1");
    }

    if config.cache.freshness_days > MAX_FRESHNESS_DAYS {
        anyhow::bail!(
            "cache.freshness_days must be <= {} (got {})",
            MAX_FRESHNESS_DAYS,
            config.cache.freshness_days
        );
    }

    if config.provider.timeout_secs == 0 {
        anyhow::bail!("provider.timeout_secs must be > 0");
    }

    match config.provider.kind.as_str() {
        "disabled" | "gemini" => {}
        "directory" => {
            if config.provider.dir.is_none() {
                anyhow::bail!("provider.dir must be specified when provider is 'directory'");
            }
        }
        other => anyhow::bail!(
            "Unknown analysis provider: '{}'. Must be disabled, gemini, or directory.",
            other
        ),
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = parse_config("[storage]\ndir = \"./data\"\n").unwrap();
        assert_eq!(cfg.storage.dir, PathBuf::from("./data"));
        assert_eq!(cfg.cache.freshness_days, 7);
        assert_eq!(cfg.analysis.cache_hit_delay_ms, 0);
        assert_eq!(cfg.provider.kind, "disabled");
        assert!(!cfg.provider.is_enabled());
        assert_eq!(cfg.provider.model, "gemini-3-flash-preview");
    }

    #[test]
    fn full_config_parses() {
        let cfg = parse_config(
            r#"
[storage]
dir = "/var/lib/rankmaster"

[cache]
freshness_days = 3

[analysis]
cache_hit_delay_ms = 800

[provider]
kind = "gemini"
model = "gemini-2.0-flash"
timeout_secs = 20
max_retries = 4
"#,
        )
        .unwrap();
        assert_eq!(cfg.cache.freshness_window(), chrono::Duration::days(3));
        assert_eq!(cfg.analysis.cache_hit_delay_ms, 800);
        assert_eq!(cfg.provider.model, "gemini-2.0-flash");
        assert_eq!(cfg.provider.max_retries, 4);
    }

    #[test]
    fn storage_section_is_required() {
        assert!(parse_config("[cache]\nfreshness_days = 7\n").is_err());
    }

    #[test]
    fn rejects_zero_freshness() {
        let err = parse_config("[storage]\ndir = \"d\"\n[cache]\nfreshness_days = 0\n")
            .unwrap_err()
            .to_string();
        assert!(err.contains("freshness_days"));
    }

    #[test]
    fn rejects_huge_freshness() {
        let err = parse_config(
            "[storage]\ndir = \"d\"\n[cache]\nfreshness_days = 9223372036854775807\n",
        )
        .unwrap_err()
        .to_string();
        assert!(err.contains("freshness_days must be <="));

        let cfg = parse_config("[storage]\ndir = \"d\"\n[cache]\nfreshness_days = 36500\n")
            .unwrap();
        assert_eq!(cfg.cache.freshness_window(), chrono::Duration::days(36_500));
    }

    #[test]
    fn rejects_unknown_provider() {
        let err = parse_config("[storage]\ndir = \"d\"\n[provider]\nkind = \"openai\"\n")
            .unwrap_err()
            .to_string();
        assert!(err.contains("Unknown analysis provider"));
    }

    #[test]
    fn directory_provider_needs_dir() {
        assert!(parse_config("[storage]\ndir = \"d\"\n[provider]\nkind = \"directory\"\n").is_err());
        assert!(parse_config(
            "[storage]\ndir = \"d\"\n[provider]\nkind = \"directory\"\ndir = \"fixtures\"\n"
        )
        .is_ok());
    }
}
