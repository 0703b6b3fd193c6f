//! AIO rule evaluator - fitness for being quoted by answer engines.
//!
//! Mirrors the SEO evaluator's 20-points-per-category structure across
//! structure, authority, schema, content quality, and quotability.
//! Detection is pattern matching over raw markup and extracted text, not
//! semantic parsing; this runs inline across many pages per audit.

use super::detectors;
use super::{run_rules, validate_budgets, Rule, Verdict};
use crate::domain::{AioBreakdown, PageInput};
use crate::error::Result;

pub const ITEM_DIRECT_ANSWER: &str = "Direct Answer";
pub const ITEM_FAQ_SECTION: &str = "FAQ Section";
pub const ITEM_LISTS: &str = "Lists";
pub const ITEM_TABLES: &str = "Tables";
pub const ITEM_KEY_TAKEAWAYS: &str = "Key Takeaways";
pub const ITEM_AUTHOR_BYLINE: &str = "Author Byline";
pub const ITEM_CITATIONS: &str = "Citations";
pub const ITEM_PUBLISH_DATE: &str = "Publish Date";
pub const ITEM_LAST_UPDATED: &str = "Last Updated";
pub const ITEM_ATTRIBUTED_QUOTES: &str = "Attributed Quotes";
pub const ITEM_SCHEMA_PRESENT: &str = "Structured Data";
pub const ITEM_SCHEMA_FAQ: &str = "FAQ Schema";
pub const ITEM_SCHEMA_HOWTO: &str = "HowTo Schema";
pub const ITEM_SCHEMA_ARTICLE: &str = "Article Schema";
pub const ITEM_DEFINITIONS: &str = "Definitional Sentences";
pub const ITEM_STATISTICS: &str = "Statistics";
pub const ITEM_COMPARISONS: &str = "Comparisons";
pub const ITEM_RESEARCH: &str = "Original Research";
pub const ITEM_QUOTABLE_SENTENCES: &str = "Quotable Sentences";
pub const ITEM_SENTENCE_BREVITY: &str = "Sentence Brevity";
pub const ITEM_OPENING_PARAGRAPH: &str = "Opening Paragraph";
pub const ITEM_EMPHASIS: &str = "Emphasis Markup";

const STRUCTURE_RULES: &[Rule] = &[
    Rule { name: ITEM_DIRECT_ANSWER, max: 5, detect: detect_direct_answer },
    Rule { name: ITEM_FAQ_SECTION, max: 4, detect: detect_faq_section },
    Rule { name: ITEM_LISTS, max: 4, detect: detect_lists },
    Rule { name: ITEM_TABLES, max: 3, detect: detect_tables },
    Rule { name: ITEM_KEY_TAKEAWAYS, max: 4, detect: detect_key_takeaways },
];

const AUTHORITY_RULES: &[Rule] = &[
    Rule { name: ITEM_AUTHOR_BYLINE, max: 5, detect: detect_author_byline },
    Rule { name: ITEM_CITATIONS, max: 5, detect: detect_citations },
    Rule { name: ITEM_PUBLISH_DATE, max: 3, detect: detect_publish_date },
    Rule { name: ITEM_LAST_UPDATED, max: 4, detect: detect_last_updated },
    Rule { name: ITEM_ATTRIBUTED_QUOTES, max: 3, detect: detect_attributed_quotes },
];

const SCHEMA_RULES: &[Rule] = &[
    Rule { name: ITEM_SCHEMA_PRESENT, max: 5, detect: detect_schema_present },
    Rule { name: ITEM_SCHEMA_FAQ, max: 5, detect: detect_schema_faq },
    Rule { name: ITEM_SCHEMA_HOWTO, max: 5, detect: detect_schema_howto },
    Rule { name: ITEM_SCHEMA_ARTICLE, max: 5, detect: detect_schema_article },
];

const CONTENT_QUALITY_RULES: &[Rule] = &[
    Rule { name: ITEM_DEFINITIONS, max: 5, detect: detect_definitions },
    Rule { name: ITEM_STATISTICS, max: 5, detect: detect_statistics },
    Rule { name: ITEM_COMPARISONS, max: 4, detect: detect_comparisons },
    Rule { name: ITEM_RESEARCH, max: 6, detect: detect_research },
];

const QUOTABILITY_RULES: &[Rule] = &[
    Rule { name: ITEM_QUOTABLE_SENTENCES, max: 6, detect: detect_quotable_sentences },
    Rule { name: ITEM_SENTENCE_BREVITY, max: 6, detect: detect_sentence_brevity },
    Rule { name: ITEM_OPENING_PARAGRAPH, max: 5, detect: detect_opening_paragraph },
    Rule { name: ITEM_EMPHASIS, max: 3, detect: detect_emphasis },
];

/// Evaluate all AIO rules against one page.
pub fn evaluate(page: &PageInput) -> AioBreakdown {
    AioBreakdown {
        structure: run_rules(STRUCTURE_RULES, page),
        authority: run_rules(AUTHORITY_RULES, page),
        schema: run_rules(SCHEMA_RULES, page),
        content_quality: run_rules(CONTENT_QUALITY_RULES, page),
        quotability: run_rules(QUOTABILITY_RULES, page),
    }
}

/// Check the 20-points-per-category / 100-total budget invariant.
pub fn validate_point_budgets() -> Result<()> {
    validate_budgets(
        "aio",
        &[
            ("structure", STRUCTURE_RULES),
            ("authority", AUTHORITY_RULES),
            ("schema", SCHEMA_RULES),
            ("content_quality", CONTENT_QUALITY_RULES),
            ("quotability", QUOTABILITY_RULES),
        ],
    )
}

// ====== Structure ======

fn detect_direct_answer(page: &PageInput) -> Verdict {
    if detectors::has_direct_answer_opening(page.plain_text()) {
        Verdict::pass(5, "Page opens with a direct answer")
    } else {
        Verdict::fail(
            0,
            "Page does not open with a direct answer",
            "Open with a one-sentence answer to the page's core question",
        )
    }
}

fn detect_faq_section(page: &PageInput) -> Verdict {
    let in_text = detectors::has_faq_keywords(page.plain_text());
    let in_headings = page
        .h2
        .iter()
        .chain(page.h3.iter())
        .any(|heading| detectors::has_faq_keywords(heading));
    if in_text || in_headings {
        Verdict::pass(4, "FAQ section detected")
    } else {
        Verdict::warning(
            0,
            "No FAQ section found",
            "Add a FAQ section answering common questions about the topic",
        )
    }
}

fn detect_lists(page: &PageInput) -> Verdict {
    if detectors::has_list_markup(page.markup()) {
        Verdict::pass(4, "List markup present")
    } else {
        Verdict::warning(
            0,
            "No list markup found",
            "Use bulleted or numbered lists for steps and enumerations",
        )
    }
}

fn detect_tables(page: &PageInput) -> Verdict {
    if detectors::has_table_markup(page.markup()) {
        Verdict::pass(3, "Table markup present")
    } else {
        Verdict::warning(0, "No table markup found", "Present comparable data in tables")
    }
}

fn detect_key_takeaways(page: &PageInput) -> Verdict {
    if detectors::has_key_takeaways(page.plain_text()) {
        Verdict::pass(4, "Key takeaways section detected")
    } else {
        Verdict::warning(
            0,
            "No key takeaways or summary found",
            "Add a key takeaways or TL;DR section near the top",
        )
    }
}

// ====== Authority ======

fn detect_author_byline(page: &PageInput) -> Verdict {
    if detectors::has_author_byline(page.plain_text()) {
        Verdict::pass(5, "Author byline detected")
    } else {
        Verdict::fail(
            0,
            "No author byline found",
            "Add a visible author byline with the writer's full name",
        )
    }
}

fn detect_citations(page: &PageInput) -> Verdict {
    if detectors::has_citations(page.plain_text()) {
        Verdict::pass(5, "Citations detected")
    } else {
        Verdict::fail(
            0,
            "No citations or sources found",
            "Cite sources with 'according to' attributions or numbered references",
        )
    }
}

fn detect_publish_date(page: &PageInput) -> Verdict {
    if detectors::has_publish_date(page.plain_text()) {
        Verdict::pass(3, "Publish date detected")
    } else {
        Verdict::warning(0, "No publish date found", "Show the publish date on the page")
    }
}

fn detect_last_updated(page: &PageInput) -> Verdict {
    if detectors::has_last_updated(page.plain_text()) {
        Verdict::pass(4, "Last-updated date detected")
    } else {
        Verdict::warning(
            0,
            "No last-updated date found",
            "Show a last-updated date to signal freshness",
        )
    }
}

fn detect_attributed_quotes(page: &PageInput) -> Verdict {
    if detectors::has_attributed_quote(page.plain_text()) {
        Verdict::pass(3, "Attributed quotes detected")
    } else {
        Verdict::warning(
            0,
            "No attributed quotes found",
            "Quote named experts with clear attribution",
        )
    }
}

// ====== Schema ======

fn detect_schema_present(page: &PageInput) -> Verdict {
    if !page.structured_data.is_empty() || detectors::has_structured_data_markup(page.markup()) {
        Verdict::pass(5, "Structured data present")
    } else {
        Verdict::fail(
            0,
            "Page has no structured data",
            "Add JSON-LD structured data; answer engines lean on it heavily",
        )
    }
}

fn detect_schema_faq(page: &PageInput) -> Verdict {
    if detectors::has_schema_type(page, &["FAQPage"]) {
        Verdict::pass(5, "FAQPage schema detected")
    } else {
        Verdict::warning(
            0,
            "No FAQPage schema found",
            "Mark FAQ content up with FAQPage schema",
        )
    }
}

fn detect_schema_howto(page: &PageInput) -> Verdict {
    if detectors::has_schema_type(page, &["HowTo"]) {
        Verdict::pass(5, "HowTo schema detected")
    } else {
        Verdict::warning(
            0,
            "No HowTo schema found",
            "Mark step-by-step content up with HowTo schema",
        )
    }
}

fn detect_schema_article(page: &PageInput) -> Verdict {
    if detectors::has_schema_type(page, &["Article", "NewsArticle", "BlogPosting"]) {
        Verdict::pass(5, "Article schema detected")
    } else {
        Verdict::warning(
            0,
            "No Article schema found",
            "Mark editorial content up with Article schema",
        )
    }
}

// ====== Content quality ======

fn detect_definitions(page: &PageInput) -> Verdict {
    if detectors::has_definitional_sentence(page.plain_text()) {
        Verdict::pass(5, "Definitional sentences detected")
    } else {
        Verdict::warning(
            0,
            "No definitional sentences found",
            "Define key terms plainly: 'X is ...', 'X refers to ...'",
        )
    }
}

fn detect_statistics(page: &PageInput) -> Verdict {
    if detectors::has_statistics(page.plain_text()) {
        Verdict::pass(5, "Statistics detected")
    } else {
        Verdict::warning(
            0,
            "No statistics found",
            "Include concrete numbers and percentages; they get quoted",
        )
    }
}

fn detect_comparisons(page: &PageInput) -> Verdict {
    if detectors::has_comparison(page.plain_text()) {
        Verdict::pass(4, "Comparisons detected")
    } else {
        Verdict::warning(
            0,
            "No comparisons found",
            "Compare options directly ('X vs Y') where relevant",
        )
    }
}

fn detect_research(page: &PageInput) -> Verdict {
    if detectors::has_research_claims(page.plain_text()) {
        Verdict::pass(6, "First-person research claims detected")
    } else {
        Verdict::warning(
            0,
            "No first-person research claims found",
            "Share your own data or testing ('we analyzed', 'our research shows')",
        )
    }
}

// ====== Quotability ======

fn detect_quotable_sentences(page: &PageInput) -> Verdict {
    let count = detectors::quotable_sentence_count(page.plain_text());
    let reason = format!("Page has {} quotable 15-60 word sentences", count);
    let fix = "Write self-contained sentences of 15-60 words that stand alone when quoted";
    let verdict = if count >= 10 {
        Verdict::pass(6, reason)
    } else if count >= 5 {
        Verdict::warning(4, reason, fix)
    } else if count >= 2 {
        Verdict::warning(2, reason, fix)
    } else if count == 1 {
        Verdict::warning(1, reason, fix)
    } else {
        Verdict::fail(0, "Page has no quotable 15-60 word sentences", fix)
    };
    verdict.with_metric(count as f64)
}

fn detect_sentence_brevity(page: &PageInput) -> Verdict {
    let fix = "Shorten sentences; aim for under 20 words on average";
    let Some(avg) = detectors::avg_sentence_length(page.plain_text()) else {
        return Verdict::fail(0, "Page has no sentences to measure", fix);
    };
    let reason = format!("Average sentence length is {:.1} words", avg);
    let verdict = if avg <= 15.0 {
        Verdict::pass(6, reason)
    } else if avg <= 20.0 {
        Verdict::pass(5, reason)
    } else if avg <= 25.0 {
        Verdict::warning(3, reason, fix)
    } else if avg <= 35.0 {
        Verdict::warning(1, reason, fix)
    } else {
        Verdict::fail(0, reason, fix)
    };
    verdict.with_metric(avg)
}

fn detect_opening_paragraph(page: &PageInput) -> Verdict {
    let fix = "Open with a focused 20-120 word paragraph that answers the query";
    let Some(paragraph) = detectors::first_paragraph(page.plain_text()) else {
        return Verdict::fail(0, "Page has no opening paragraph", fix);
    };
    let words = paragraph.split_whitespace().count();
    if (20..=120).contains(&words) {
        Verdict::pass(5, format!("Opening paragraph is {} words", words))
    } else {
        Verdict::warning(
            2,
            format!("Opening paragraph is {} words (aim for 20-120)", words),
            fix,
        )
    }
}

fn detect_emphasis(page: &PageInput) -> Verdict {
    if detectors::has_emphasis_markup(page.markup()) {
        Verdict::pass(3, "Emphasis markup present")
    } else {
        Verdict::warning(
            0,
            "No emphasis markup found",
            "Bold the key facts so they stand out to scanners and parsers",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ScoreItem, Status};
    use crate::service::scorer::calculate_total_score;

    fn find<'a>(items: &'a [ScoreItem], name: &str) -> &'a ScoreItem {
        items.iter().find(|i| i.name == name).expect("item missing")
    }

    #[test]
    fn test_point_budgets_hold() {
        validate_point_budgets().expect("AIO budgets must sum to 20 per category");
    }

    #[test]
    fn test_empty_page_scores_zero_without_panicking() {
        let page = PageInput::new("https://example.com");
        let breakdown = evaluate(&page);
        assert_eq!(calculate_total_score(breakdown.items()), 0);
    }

    #[test]
    fn test_faq_detected_from_headings() {
        let mut page = PageInput::new("https://example.com");
        page.h2 = vec!["Frequently Asked Questions".into()];
        let breakdown = evaluate(&page);
        assert_eq!(find(&breakdown.structure, ITEM_FAQ_SECTION).status, Status::Pass);
    }

    #[test]
    fn test_schema_rules_detect_independently() {
        let mut page = PageInput::new("https://example.com");
        page.structured_data = vec![
            serde_json::json!({"@type": "FAQPage"}),
            serde_json::json!({"@type": "BlogPosting"}),
        ];
        let breakdown = evaluate(&page);
        assert_eq!(find(&breakdown.schema, ITEM_SCHEMA_PRESENT).status, Status::Pass);
        assert_eq!(find(&breakdown.schema, ITEM_SCHEMA_FAQ).status, Status::Pass);
        assert_eq!(find(&breakdown.schema, ITEM_SCHEMA_ARTICLE).status, Status::Pass);
        assert_eq!(find(&breakdown.schema, ITEM_SCHEMA_HOWTO).status, Status::Warning);
    }

    #[test]
    fn test_sentence_brevity_carries_metric() {
        let mut page = PageInput::new("https://example.com");
        page.text = Some("Short sentences win. They quote well. Keep them tight.".into());
        let breakdown = evaluate(&page);
        let brevity = find(&breakdown.quotability, ITEM_SENTENCE_BREVITY);
        assert_eq!(brevity.score, 6);
        let avg = brevity.metric.expect("brevity item must carry its metric");
        assert!((avg - 3.0).abs() < 1e-9, "unexpected avg {}", avg);
    }

    #[test]
    fn test_quotable_sentence_buckets() {
        let quotable = "This single sentence contains more than fifteen words so that it \
                        lands inside the quotable range comfortably. ";

        let mut page = PageInput::new("https://example.com");
        for (repeats, expected) in [(12, 6), (6, 4), (3, 2), (1, 1)] {
            page.text = Some(quotable.repeat(repeats));
            let breakdown = evaluate(&page);
            assert_eq!(
                find(&breakdown.quotability, ITEM_QUOTABLE_SENTENCES).score,
                expected,
                "{} quotable sentences",
                repeats
            );
        }

        page.text = Some("Too short to quote.".into());
        let breakdown = evaluate(&page);
        let item = find(&breakdown.quotability, ITEM_QUOTABLE_SENTENCES);
        assert_eq!(item.score, 0);
        assert_eq!(item.status, Status::Fail);
    }

    #[test]
    fn test_opening_paragraph_band() {
        let mut page = PageInput::new("https://example.com");

        let words: Vec<String> = (0..40).map(|i| format!("word{}", i)).collect();
        page.text = Some(format!("{}\n\nsecond paragraph", words.join(" ")));
        let breakdown = evaluate(&page);
        assert_eq!(find(&breakdown.quotability, ITEM_OPENING_PARAGRAPH).score, 5);

        page.text = Some("Tiny opener.\n\nrest".into());
        let breakdown = evaluate(&page);
        let item = find(&breakdown.quotability, ITEM_OPENING_PARAGRAPH);
        assert_eq!(item.score, 2);
        assert_eq!(item.status, Status::Warning);
    }

    #[test]
    fn test_authority_rules_on_rich_text() {
        let mut page = PageInput::new("https://example.com");
        page.text = Some(
            "Written by Jane Doe. Published on March 4, 2024. Last updated: June 1, 2025. \
             According to the HTTP Archive, pages keep getting heavier. \
             \"Payload growth is relentless,\" said one analyst."
                .into(),
        );
        let breakdown = evaluate(&page);
        for name in [
            ITEM_AUTHOR_BYLINE,
            ITEM_CITATIONS,
            ITEM_PUBLISH_DATE,
            ITEM_LAST_UPDATED,
            ITEM_ATTRIBUTED_QUOTES,
        ] {
            assert_eq!(
                find(&breakdown.authority, name).status,
                Status::Pass,
                "{} should pass",
                name
            );
        }
    }
}
