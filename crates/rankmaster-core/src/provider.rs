//! Analysis provider trait.
//!
//! A provider turns a normalized [`SiteKey`] into a validated
//! [`Assessment`]. It owns everything about how that happens: prompts,
//! transport, timeouts, retries, and checking that the response has the
//! right shape. Callers treat any error as an opaque failure.
//!
//! Concrete providers (Gemini, directory, disabled) live in the
//! `rankmaster` app crate.

use anyhow::Result;
use async_trait::async_trait;

use crate::key::SiteKey;
use crate::models::Assessment;

#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Short identifier shown in logs (e.g. `"gemini"`).
    fn name(&self) -> &str;

    /// Analyze the site identified by `key`.
    async fn fetch(&self, key: &SiteKey) -> Result<Assessment>;
}
