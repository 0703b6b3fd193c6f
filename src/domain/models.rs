//! Domain entities for page scoring - inputs, score items, and results.

use serde::{Deserialize, Serialize};

// ====== Enums ======

/// Severity of a single check, authored per rule.
///
/// Two rules losing identical points can carry different severities (a
/// missing canonical tag is a warning, a missing H1 is a failure), so the
/// status is stored as data and never recomputed from the score ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Warning,
    Fail,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "pass",
            Status::Warning => "warning",
            Status::Fail => "fail",
        }
    }
}

// ====== Page snapshot ======

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageElement {
    pub src: String,
    pub alt: Option<String>,
}

/// Immutable snapshot of one page, produced by an external crawler (or the
/// [`PageExtractor`](crate::extractor::PageExtractor) convenience builder).
///
/// Every field but `url` is optional; scoring treats a missing field as
/// worst case, never as an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageInput {
    pub url: String,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub word_count: Option<i64>,
    pub images: Vec<ImageElement>,
    pub internal_links: Option<i64>,
    pub external_links: Option<i64>,
    pub load_time_ms: Option<f64>,
    pub html_size: Option<i64>,
    /// Parsed JSON-LD structured data blocks.
    pub structured_data: Vec<serde_json::Value>,
    /// Raw markup, for markup-level pattern checks.
    pub html: Option<String>,
    /// Extracted plain text, for text-level pattern checks.
    pub text: Option<String>,
}

impl PageInput {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Raw markup, or empty when the crawler supplied none.
    pub fn markup(&self) -> &str {
        self.html.as_deref().unwrap_or("")
    }

    /// Extracted plain text, or empty when the crawler supplied none.
    pub fn plain_text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

// ====== Score items and breakdowns ======

/// The atomic evaluation unit: one named check with a bounded score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreItem {
    pub name: String,
    pub score: i64,
    pub max_score: i64,
    pub status: Status,
    pub reason: String,
    pub how_to_fix: Option<String>,
    /// Structured numeric payload for checks that measure something
    /// (e.g. average sentence length), so downstream consumers never
    /// have to parse it back out of `reason`.
    pub metric: Option<f64>,
}

/// SEO score items grouped by category. Each category's max scores sum
/// to 20; the whole breakdown sums to 100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoBreakdown {
    pub technical: Vec<ScoreItem>,
    pub content: Vec<ScoreItem>,
    pub meta: Vec<ScoreItem>,
    pub performance: Vec<ScoreItem>,
    pub accessibility: Vec<ScoreItem>,
}

impl SeoBreakdown {
    pub fn categories(&self) -> [&Vec<ScoreItem>; 5] {
        [
            &self.technical,
            &self.content,
            &self.meta,
            &self.performance,
            &self.accessibility,
        ]
    }

    /// All items across categories, in evaluation order.
    pub fn items(&self) -> impl Iterator<Item = &ScoreItem> {
        self.categories().into_iter().flatten()
    }
}

/// AIO score items grouped by category, same 20-per-category budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AioBreakdown {
    pub structure: Vec<ScoreItem>,
    pub authority: Vec<ScoreItem>,
    pub schema: Vec<ScoreItem>,
    pub content_quality: Vec<ScoreItem>,
    pub quotability: Vec<ScoreItem>,
}

impl AioBreakdown {
    pub fn categories(&self) -> [&Vec<ScoreItem>; 5] {
        [
            &self.structure,
            &self.authority,
            &self.schema,
            &self.content_quality,
            &self.quotability,
        ]
    }

    pub fn items(&self) -> impl Iterator<Item = &ScoreItem> {
        self.categories().into_iter().flatten()
    }
}

// ====== Rollups ======

/// Per-category SEO scores, each 0-20.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SeoCategoryScores {
    pub technical: i64,
    pub content: i64,
    pub meta: i64,
    pub performance: i64,
    pub accessibility: i64,
}

/// Per-category AIO scores, each 0-20.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AioCategoryScores {
    pub structure: i64,
    pub authority: i64,
    pub schema: i64,
    pub content_quality: i64,
    pub quotability: i64,
}

/// SEO issue tallies, counted from item statuses (fail -> critical).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IssueCounts {
    pub critical: i64,
    pub warnings: i64,
    pub passed: i64,
}

/// Answer-engine readiness signals, derived from named AIO items.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AioFactors {
    pub has_direct_answers: bool,
    pub has_faq_section: bool,
    pub has_schema: bool,
    pub has_author_info: bool,
    pub has_citations: bool,
    pub has_key_takeaways: bool,
}

/// Compact page facts for list views and trend rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageSummary {
    pub word_count: i64,
    pub has_h1: bool,
    pub has_meta_description: bool,
    pub schema_types: Vec<String>,
}

/// Full single-page result: both dimensions scored, rolled up, and
/// summarized for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub url: String,
    pub seo_score: i64,
    pub aio_score: i64,
    pub combined_score: i64,
    pub seo_categories: SeoCategoryScores,
    pub aio_categories: AioCategoryScores,
    pub seo_breakdown: SeoBreakdown,
    pub aio_breakdown: AioBreakdown,
    pub issues: IssueCounts,
    pub aio_factors: AioFactors,
    pub avg_sentence_length: Option<f64>,
    pub page: PageSummary,
    pub seo_recommendations: Vec<String>,
    pub aio_recommendations: Vec<String>,
}

/// Site-level aggregate over zero or more analyzed pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteAudit {
    pub pages_analyzed: i64,
    pub avg_seo_score: i64,
    pub avg_aio_score: i64,
    pub avg_combined_score: i64,
    pub issues: IssueCounts,
    pub top_seo_fixes: Vec<String>,
    pub top_aio_fixes: Vec<String>,
    pub pages: Vec<AnalysisResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(Status::Pass.as_str(), "pass");
        assert_eq!(Status::Warning.as_str(), "warning");
        assert_eq!(Status::Fail.as_str(), "fail");
    }

    #[test]
    fn test_page_input_defaults_are_empty() {
        let page = PageInput::new("https://example.com");
        assert_eq!(page.url, "https://example.com");
        assert!(page.title.is_none());
        assert!(page.markup().is_empty());
        assert!(page.plain_text().is_empty());
        assert!(page.structured_data.is_empty());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&Status::Warning).unwrap();
        assert_eq!(json, r#""warning""#);
    }
}
