//! Single-page orchestrator: runs both evaluators and assembles the
//! full analysis result for one page snapshot.

use tracing::debug;

use crate::domain::{
    AioCategoryScores, AioFactors, AnalysisResult, IssueCounts, PageInput, PageSummary, ScoreItem,
    SeoCategoryScores, Status,
};
use crate::service::scorer::{
    aio, calculate_category_score, calculate_total_score, detectors, seo, top_recommendations,
};

/// How many fixes each page surfaces per dimension.
const RECOMMENDATION_LIMIT: usize = 5;

/// Analyze one page: both rule sets, category and total rollups, issue
/// counts, answer-engine factors, and the page summary.
///
/// Never fails on sparse input - absent optional fields yield no credit,
/// not an error.
pub fn analyze_page(page: &PageInput) -> AnalysisResult {
    let seo_breakdown = seo::evaluate(page);
    let aio_breakdown = aio::evaluate(page);

    let seo_categories = SeoCategoryScores {
        technical: calculate_category_score(&seo_breakdown.technical),
        content: calculate_category_score(&seo_breakdown.content),
        meta: calculate_category_score(&seo_breakdown.meta),
        performance: calculate_category_score(&seo_breakdown.performance),
        accessibility: calculate_category_score(&seo_breakdown.accessibility),
    };
    let aio_categories = AioCategoryScores {
        structure: calculate_category_score(&aio_breakdown.structure),
        authority: calculate_category_score(&aio_breakdown.authority),
        schema: calculate_category_score(&aio_breakdown.schema),
        content_quality: calculate_category_score(&aio_breakdown.content_quality),
        quotability: calculate_category_score(&aio_breakdown.quotability),
    };

    let seo_score = calculate_total_score(seo_breakdown.items());
    let aio_score = calculate_total_score(aio_breakdown.items());
    let combined_score = ((seo_score + aio_score) as f64 / 2.0).round() as i64;

    let issues = count_issues(seo_breakdown.items());

    let aio_factors = AioFactors {
        has_direct_answers: item_passed(&aio_breakdown.structure, aio::ITEM_DIRECT_ANSWER),
        has_faq_section: item_passed(&aio_breakdown.structure, aio::ITEM_FAQ_SECTION),
        has_schema: item_passed(&aio_breakdown.schema, aio::ITEM_SCHEMA_PRESENT),
        has_author_info: item_passed(&aio_breakdown.authority, aio::ITEM_AUTHOR_BYLINE),
        has_citations: item_passed(&aio_breakdown.authority, aio::ITEM_CITATIONS),
        has_key_takeaways: item_passed(&aio_breakdown.structure, aio::ITEM_KEY_TAKEAWAYS),
    };

    // Carried as structured data on the brevity item, not parsed back out
    // of its reason string.
    let avg_sentence_length = aio_breakdown
        .quotability
        .iter()
        .find(|item| item.name == aio::ITEM_SENTENCE_BREVITY)
        .and_then(|item| item.metric);

    let page_summary = PageSummary {
        word_count: page.word_count.unwrap_or(0),
        has_h1: !page.h1.is_empty(),
        has_meta_description: page
            .meta_description
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty()),
        schema_types: detectors::schema_types(page),
    };

    let seo_recommendations = top_recommendations(seo_breakdown.items(), RECOMMENDATION_LIMIT);
    let aio_recommendations = top_recommendations(aio_breakdown.items(), RECOMMENDATION_LIMIT);

    debug!(
        "[SCORE] {} seo={} aio={} combined={} critical={} warnings={}",
        page.url, seo_score, aio_score, combined_score, issues.critical, issues.warnings
    );

    AnalysisResult {
        url: page.url.clone(),
        seo_score,
        aio_score,
        combined_score,
        seo_categories,
        aio_categories,
        seo_breakdown,
        aio_breakdown,
        issues,
        aio_factors,
        avg_sentence_length,
        page: page_summary,
        seo_recommendations,
        aio_recommendations,
    }
}

fn count_issues<'a>(items: impl Iterator<Item = &'a ScoreItem>) -> IssueCounts {
    items.fold(IssueCounts::default(), |mut counts, item| {
        match item.status {
            Status::Fail => counts.critical += 1,
            Status::Warning => counts.warnings += 1,
            Status::Pass => counts.passed += 1,
        }
        counts
    })
}

fn item_passed(items: &[ScoreItem], name: &str) -> bool {
    items
        .iter()
        .any(|item| item.name == name && item.status == Status::Pass)
}
