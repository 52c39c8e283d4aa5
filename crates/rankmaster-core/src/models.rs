//! Report data types.
//!
//! An [`Assessment`] is what an analysis provider returns. The orchestrator
//! stamps it with the site key and fetch time to produce the immutable
//! [`Report`] that is cached and shown to the user.
//!
//! All types serialize with camelCase field names; this is the format of the
//! cache blob in durable storage.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::key::SiteKey;

/// Highest score any report or section may carry.
pub const MAX_SCORE: u8 = 100;

/// The fixed set of scored categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Seo,
    Aeo,
    GoogleRanking,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Seo, Category::Aeo, Category::GoogleRanking];

    /// Name used in the serialized `sections` mapping.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Seo => "seo",
            Category::Aeo => "aeo",
            Category::GoogleRanking => "googleRanking",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::Seo => "SEO",
            Category::Aeo => "AEO",
            Category::GoogleRanking => "Google Ranking Factors",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Seo => "Technical search optimization",
            Category::Aeo => "AI & Conversational Visibility",
            Category::GoogleRanking => "Authority, Speed, and Vitals",
        }
    }
}

/// Score and findings for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub score: u8,
    pub advantages: Vec<String>,
    pub disadvantages: Vec<String>,
    pub recommendations: Vec<String>,
}

/// One [`Section`] per [`Category`]; no category can be missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sections {
    pub seo: Section,
    pub aeo: Section,
    pub google_ranking: Section,
}

impl Sections {
    pub fn get(&self, category: Category) -> &Section {
        match category {
            Category::Seo => &self.seo,
            Category::Aeo => &self.aeo,
            Category::GoogleRanking => &self.google_ranking,
        }
    }

    /// Iterate sections in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &Section)> {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// Structured result of an analysis, as produced by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub site_name: String,
    pub url: String,
    pub overall_score: u8,
    pub sections: Sections,
    pub summary: String,
}

impl Assessment {
    /// Check score bounds on the overall score and every section.
    pub fn validate(&self) -> Result<()> {
        if self.overall_score > MAX_SCORE {
            bail!(
                "overallScore {} is out of range 0-{}",
                self.overall_score,
                MAX_SCORE
            );
        }
        for (category, section) in self.sections.iter() {
            if section.score > MAX_SCORE {
                bail!(
                    "{}.score {} is out of range 0-{}",
                    category.as_str(),
                    section.score,
                    MAX_SCORE
                );
            }
        }
        Ok(())
    }
}

/// Immutable snapshot of an analysis for one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub site_key: SiteKey,
    pub site_name: String,
    pub url: String,
    pub overall_score: u8,
    pub sections: Sections,
    pub summary: String,
    pub fetched_at: DateTime<Utc>,
}

impl Report {
    pub fn from_assessment(
        site_key: SiteKey,
        assessment: Assessment,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            site_key,
            site_name: assessment.site_name,
            url: assessment.url,
            overall_score: assessment.overall_score,
            sections: assessment.sections,
            summary: assessment.summary,
            fetched_at,
        }
    }

    /// Name to show for this report, falling back to the key when the
    /// provider left `siteName` blank.
    pub fn display_name(&self) -> &str {
        if self.site_name.trim().is_empty() {
            self.site_key.as_str()
        } else {
            &self.site_name
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn sections_serialize_under_fixed_category_names() {
        let json = serde_json::to_value(assessment(72)).unwrap();
        let sections = json["sections"].as_object().unwrap();
        let mut names: Vec<&str> = sections.keys().map(|k| k.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["aeo", "googleRanking", "seo"]);
        assert_eq!(json["overallScore"], 72);
    }

    #[test]
    fn missing_category_is_rejected() {
        let json = r#"{
            "siteName": "x", "url": "x", "overallScore": 10, "summary": "",
            "sections": {
                "seo": {"score": 1, "advantages": [], "disadvantages": [], "recommendations": []},
                "aeo": {"score": 1, "advantages": [], "disadvantages": [], "recommendations": []}
            }
        }"#;
        assert!(serde_json::from_str::<Assessment>(json).is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_scores() {
        assert!(assessment(100).validate().is_ok());
        assert!(assessment(101).validate().is_err());

        let mut a = assessment(50);
        a.sections.aeo.score = 140;
        let err = a.validate().unwrap_err().to_string();
        assert!(err.contains("aeo"), "unexpected error: {}", err);
    }

    #[test]
    fn report_takes_key_and_time_from_caller() {
        let now = Utc::now();
        let r = report(" Example.com ", 72, now);
        assert_eq!(r.site_key.as_str(), "example.com");
        assert_eq!(r.fetched_at, now);
        assert_eq!(r.overall_score, 72);
    }

    #[test]
    fn display_name_falls_back_to_key() {
        let mut r = report("example.com", 10, Utc::now());
        assert_eq!(r.display_name(), "Example");
        r.site_name = "  ".to_string();
        assert_eq!(r.display_name(), "example.com");
    }

    #[test]
    fn sections_iterate_in_display_order() {
        let a = assessment(1);
        let order: Vec<Category> = a.sections.iter().map(|(c, _)| c).collect();
        assert_eq!(order, Category::ALL.to_vec());
    }
}
