//! Analysis provider implementations.
//!
//! Implementations of [`AnalysisProvider`]:
//! - **[`DisabledProvider`]**: always fails; used when no provider is configured.
//! - **[`GeminiProvider`]**: asks the Gemini `generateContent` API for a
//!   schema-constrained JSON assessment, with retry and backoff.
//! - **[`DirectoryProvider`]**: reads prepared `<site>.json` assessments from
//!   a directory; useful offline and for reproducible runs.
//!
//! Every provider funnels the raw JSON through [`parse_assessment`], which
//! is the single validation boundary: scores must be finite numbers in
//! 0–100 and all three categories must be present.
//!
//! # Provider Selection
//!
//! ```rust,no_run
//! # use rankmaster::config::ProviderConfig;
//! # use rankmaster::provider::create_provider;
//! let config = ProviderConfig::default(); // kind = "disabled"
//! let provider = create_provider(&config).unwrap();
//! assert_eq!(provider.name(), "disabled");
//! ```

mod gemini;

pub use gemini::GeminiProvider;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use rankmaster_core::models::{Assessment, Section, Sections, MAX_SCORE};
use rankmaster_core::{AnalysisProvider, SiteKey};

use crate::config::ProviderConfig;

/// Build the provider selected by `config.kind`.
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn AnalysisProvider>> {
    match config.kind.as_str() {
        "disabled" => Ok(Arc::new(DisabledProvider)),
        "gemini" => Ok(Arc::new(GeminiProvider::new(config)?)),
        "directory" => {
            let dir = config
                .dir
                .clone()
                .ok_or_else(|| anyhow::anyhow!("provider.dir required for directory provider"))?;
            Ok(Arc::new(DirectoryProvider::new(dir)))
        }
        other => bail!("Unknown analysis provider: {}", other),
    }
}

// ============ Disabled Provider ============

pub struct DisabledProvider;

#[async_trait]
impl AnalysisProvider for DisabledProvider {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn fetch(&self, _key: &SiteKey) -> Result<Assessment> {
        bail!("Analysis provider is disabled")
    }
}

// ============ Directory Provider ============

/// Serves `<dir>/<site key>.json`, in the same JSON shape the Gemini
/// provider requests.
pub struct DirectoryProvider {
    dir: PathBuf,
}

impl DirectoryProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &SiteKey) -> Result<PathBuf> {
        let name = key.as_str();
        if name.contains(['/', '\\']) || name.starts_with('.') {
            bail!("site key '{}' cannot be used as a file name", name);
        }
        Ok(self.dir.join(format!("{}.json", name)))
    }
}

#[async_trait]
impl AnalysisProvider for DirectoryProvider {
    fn name(&self) -> &str {
        "directory"
    }

    async fn fetch(&self, key: &SiteKey) -> Result<Assessment> {
        let path = self.path_for(key)?;
        let text = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("No prepared assessment at {}", path.display()))?;
        parse_assessment(&text).with_context(|| format!("Invalid assessment in {}", path.display()))
    }
}

// ============ Response parsing ============

/// Wire shape requested from the model: categories at the top level and
/// scores as plain JSON numbers.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAssessment {
    #[serde(default)]
    site_name: String,
    #[serde(default)]
    url: String,
    overall_score: f64,
    summary: String,
    seo: RawSection,
    aeo: RawSection,
    google_ranking: RawSection,
}

#[derive(Deserialize)]
struct RawSection {
    score: f64,
    advantages: Vec<String>,
    disadvantages: Vec<String>,
    recommendations: Vec<String>,
}

fn to_score(field: &str, value: f64) -> Result<u8> {
    if !value.is_finite() || value < 0.0 || value > f64::from(MAX_SCORE) {
        bail!("{} must be a number in 0-{}, got {}", field, MAX_SCORE, value);
    }
    Ok(value.round() as u8)
}

fn to_section(field: &str, raw: RawSection) -> Result<Section> {
    Ok(Section {
        score: to_score(&format!("{}.score", field), raw.score)?,
        advantages: raw.advantages,
        disadvantages: raw.disadvantages,
        recommendations: raw.recommendations,
    })
}

/// Parse and validate an assessment from model output.
///
/// Tolerates a surrounding Markdown code fence.
pub fn parse_assessment(text: &str) -> Result<Assessment> {
    let body = strip_code_fence(text);
    let raw: RawAssessment =
        serde_json::from_str(body).context("Response is not a valid assessment object")?;

    let assessment = Assessment {
        site_name: raw.site_name,
        url: raw.url,
        overall_score: to_score("overallScore", raw.overall_score)?,
        sections: Sections {
            seo: to_section("seo", raw.seo)?,
            aeo: to_section("aeo", raw.aeo)?,
            google_ranking: to_section("googleRanking", raw.google_ranking)?,
        },
        summary: raw.summary,
    };
    assessment.validate()?;
    Ok(assessment)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
