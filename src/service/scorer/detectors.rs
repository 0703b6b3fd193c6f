//! Pattern detectors backing the scoring rules.
//!
//! Every "does this page have X" question is answered here by a fixed
//! string/regex heuristic over raw markup or extracted text - cheap enough
//! to run inline across many pages per audit. Each detector is a standalone
//! predicate so a heuristic can be swapped for a real parser later without
//! touching scoring or aggregation.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::PageInput;

fn regex(cell: &'static OnceLock<Regex>, pattern: &'static str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("invalid detector pattern"))
}

// ====== Markup detectors ======

pub fn has_open_graph(markup: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r#"(?i)<meta[^>]*property\s*=\s*["']og:"#).is_match(markup)
}

pub fn has_viewport(markup: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r#"(?i)<meta[^>]*name\s*=\s*["']viewport["']"#).is_match(markup)
}

pub fn has_canonical(markup: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r#"(?i)<link[^>]*rel\s*=\s*["']canonical["']"#).is_match(markup)
}

pub fn has_html_lang(markup: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r#"(?i)<html[^>]*\slang\s*="#).is_match(markup)
}

pub fn has_aria_markup(markup: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r#"(?i)\b(?:aria-[a-z]+|role)\s*=\s*["']"#).is_match(markup)
}

pub fn has_structured_data_markup(markup: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r#"(?i)application/ld\+json"#).is_match(markup)
}

pub fn has_list_markup(markup: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?i)<(?:ul|ol)[\s>]").is_match(markup)
}

pub fn has_table_markup(markup: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?i)<table[\s>]").is_match(markup)
}

pub fn has_emphasis_markup(markup: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?i)<(?:strong|b|em)[\s>]").is_match(markup)
}

// ====== Text detectors ======

pub fn has_faq_keywords(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?i)\b(?:frequently asked questions|faqs?)\b").is_match(text)
}

pub fn has_key_takeaways(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?i)\b(?:key takeaways?|tl;dr|in summary|to summarize|the bottom line)\b",
    )
    .is_match(text)
}

pub fn has_author_byline(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?:(?i:written by|reviewed by|author:)|\bBy [A-Z][a-z]+ [A-Z][a-z]+)",
    )
    .is_match(text)
}

pub fn has_citations(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?i)\b(?:according to|sources?:|as reported by|research (?:from|by)|study (?:from|by|published))\b|\[\d+\]",
    )
    .is_match(text)
}

pub fn has_publish_date(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?i)\b(?:published|posted)\b.{0,40}\d{4}|\b\d{4}-\d{2}-\d{2}\b|\b(?:january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{1,2},\s+\d{4}",
    )
    .is_match(text)
}

pub fn has_last_updated(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?i)\blast\s+(?:updated|modified|reviewed)\b|\bupdated\s+(?:on\s+)?[a-z]+\s+\d{1,2},?\s+\d{4}",
    )
    .is_match(text)
}

pub fn has_attributed_quote(text: &str) -> bool {
    static QUOTE_THEN_SPEAKER: OnceLock<Regex> = OnceLock::new();
    static SPEAKER_THEN_QUOTE: OnceLock<Regex> = OnceLock::new();
    regex(
        &QUOTE_THEN_SPEAKER,
        r#"["“][^"”]{10,300}["”][^.!?]{0,60}(?i:said|says|explains|explained|notes|noted|according to)"#,
    )
    .is_match(text)
        || regex(
            &SPEAKER_THEN_QUOTE,
            r#"(?i:said|says|explains|explained|notes|noted)[^.!?]{0,60}["“]"#,
        )
        .is_match(text)
}

pub fn has_definitional_sentence(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?i)\b(?:is|are)\s+(?:a|an|the)\b|\brefers?\s+to\b|\bis\s+defined\s+as\b|\bmeans\b",
    )
    .is_match(text)
}

pub fn has_statistics(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?i)\d+(?:\.\d+)?\s*(?:%|percent)|\b\d+(?:\.\d+)?\s*(?:thousand|million|billion)\b|\b\d+\s+out\s+of\s+\d+\b",
    )
    .is_match(text)
}

pub fn has_comparison(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?i)\b(?:vs|versus)\b|\bcompared\s+(?:to|with)\b|\bdifference\s+between\b|\b(?:better|worse|faster|slower)\s+than\b",
    )
    .is_match(text)
}

pub fn has_research_claims(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r"(?i)\bwe\s+(?:found|tested|analyzed|analysed|surveyed|measured|observed)\b|\bour\s+(?:research|study|analysis|data|testing|survey)\b|\bi\s+tested\b",
    )
    .is_match(text)
}

/// Whether the page opens by answering directly: the first sentence of the
/// first paragraph reads as a statement ("X is ...", "Yes, ...") rather
/// than a preamble.
pub fn has_direct_answer_opening(text: &str) -> bool {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    static STATEMENT: OnceLock<Regex> = OnceLock::new();

    let Some(paragraph) = first_paragraph(text) else {
        return false;
    };
    let Some(first) = split_sentences(paragraph).into_iter().next() else {
        return false;
    };

    regex(
        &PREFIX,
        r"(?i)^(?:yes\b|no\b|in short\b|the answer\b|simply put\b)",
    )
    .is_match(first)
        || regex(&STATEMENT, r"(?i)\b(?:is|are|refers?\s+to|means)\b").is_match(first)
}

// ====== Sentence utilities ======

/// Split extracted text into sentences on terminator runs. Heuristic, not
/// a tokenizer: abbreviations and decimals split too, which is acceptable
/// noise for banded scoring.
pub fn split_sentences(text: &str) -> Vec<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"[.!?]+\s+")
        .split(text)
        .map(|s| s.trim().trim_end_matches(['.', '!', '?']))
        .filter(|s| s.chars().any(|c| c.is_alphabetic()))
        .collect()
}

/// Number of self-contained sentences in the 15-60 word quotable range.
pub fn quotable_sentence_count(text: &str) -> i64 {
    split_sentences(text)
        .iter()
        .filter(|s| {
            let words = s.split_whitespace().count();
            (15..=60).contains(&words)
        })
        .count() as i64
}

/// Mean words per sentence, or None when the text has no sentences.
pub fn avg_sentence_length(text: &str) -> Option<f64> {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return None;
    }
    let words: usize = sentences.iter().map(|s| s.split_whitespace().count()).sum();
    Some(words as f64 / sentences.len() as f64)
}

/// First non-empty blank-line-delimited block of the extracted text.
pub fn first_paragraph(text: &str) -> Option<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"\n\s*\n")
        .split(text)
        .map(str::trim)
        .find(|block| !block.is_empty())
}

// ====== Structured data ======

/// Distinct JSON-LD `@type` values found on the page, first-seen order.
/// Walks parsed blocks (including `@graph` and type arrays); falls back to
/// a markup scan when the crawler delivered the blocks unparsed.
pub fn schema_types(page: &PageInput) -> Vec<String> {
    let mut found = Vec::new();

    for block in &page.structured_data {
        collect_types(block, &mut found);
    }

    if found.is_empty() {
        static RE: OnceLock<Regex> = OnceLock::new();
        for capture in regex(&RE, r#""@type"\s*:\s*"([A-Za-z]+)""#).captures_iter(page.markup()) {
            let ty = capture[1].to_string();
            if !found.contains(&ty) {
                found.push(ty);
            }
        }
    }

    found
}

fn collect_types(value: &serde_json::Value, found: &mut Vec<String>) {
    match value {
        serde_json::Value::Object(map) => {
            match map.get("@type") {
                Some(serde_json::Value::String(ty)) => {
                    if !found.contains(ty) {
                        found.push(ty.clone());
                    }
                }
                Some(serde_json::Value::Array(types)) => {
                    for ty in types.iter().filter_map(|t| t.as_str()) {
                        if !found.iter().any(|f| f == ty) {
                            found.push(ty.to_string());
                        }
                    }
                }
                _ => {}
            }
            for nested in map.values() {
                collect_types(nested, found);
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                collect_types(item, found);
            }
        }
        _ => {}
    }
}

/// Whether the page declares any of the given schema.org types.
pub fn has_schema_type(page: &PageInput, types: &[&str]) -> bool {
    schema_types(page)
        .iter()
        .any(|found| types.iter().any(|ty| found.eq_ignore_ascii_case(ty)))
}

// ====== Heading heuristics ======

/// Whether the title and the first H1 share at least one significant word.
pub fn title_keyword_in_h1(title: &str, h1s: &[String]) -> bool {
    let keywords: Vec<String> = significant_words(title);
    if keywords.is_empty() {
        return false;
    }
    h1s.iter().any(|h1| {
        let h1_words = significant_words(h1);
        keywords.iter().any(|kw| h1_words.contains(kw))
    })
}

fn significant_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 3)
        .map(|w| w.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_detectors() {
        let markup = r#"<html lang="en"><head>
            <meta property="og:title" content="T">
            <meta name="viewport" content="width=device-width">
            <link rel="canonical" href="https://example.com/">
            <script type="application/ld+json">{}</script>
        </head><body role="main"><ul><li>a</li></ul><strong>bold</strong></body></html>"#;

        assert!(has_open_graph(markup));
        assert!(has_viewport(markup));
        assert!(has_canonical(markup));
        assert!(has_html_lang(markup));
        assert!(has_aria_markup(markup));
        assert!(has_structured_data_markup(markup));
        assert!(has_list_markup(markup));
        assert!(has_emphasis_markup(markup));
        assert!(!has_table_markup(markup));

        assert!(!has_open_graph("<html></html>"));
        assert!(!has_html_lang("<html><body>lang=en</body></html>"));
    }

    #[test]
    fn test_authority_detectors() {
        assert!(has_author_byline("Written by Jane Doe"));
        assert!(has_author_byline("By Jane Doe, staff writer"));
        assert!(!has_author_byline("stop by the store"));

        assert!(has_citations("According to the W3C, this is standard."));
        assert!(has_citations("See the appendix [12] for details."));
        assert!(!has_citations("No references here."));

        assert!(has_publish_date("Published on March 4, 2024"));
        assert!(has_publish_date("2024-03-04"));
        assert!(!has_publish_date("publishing is hard"));

        assert!(has_last_updated("Last updated: March 2024"));
        assert!(has_last_updated("Updated on March 4, 2024"));

        assert!(has_attributed_quote(
            r#""This changes everything for crawlers," said Dr. Smith."#
        ));
        assert!(!has_attributed_quote("He said nothing of note."));
    }

    #[test]
    fn test_content_quality_detectors() {
        assert!(has_definitional_sentence(
            "Index bloat is a condition where search engines index junk pages."
        ));
        assert!(has_definitional_sentence("Crawl budget refers to the number of pages fetched."));
        assert!(!has_definitional_sentence("Run fast and jump high"));

        assert!(has_statistics("Traffic grew 45% year over year."));
        assert!(has_statistics("Over 3 million sites were sampled."));
        assert!(has_statistics("9 out of 10 pages never rank."));
        assert!(!has_statistics("Traffic grew a lot."));

        assert!(has_comparison("Static rendering vs dynamic rendering"));
        assert!(has_comparison("compared to last year"));
        assert!(!has_comparison("versatile tooling"));

        assert!(has_research_claims("We analyzed 10,000 result pages."));
        assert!(has_research_claims("Our research shows a clear trend."));
        assert!(!has_research_claims("Research is ongoing elsewhere."));
    }

    #[test]
    fn test_structure_detectors() {
        assert!(has_faq_keywords("Frequently Asked Questions"));
        assert!(has_faq_keywords("Jump to the FAQ below"));
        assert!(!has_faq_keywords("no questions asked"));

        assert!(has_key_takeaways("Key takeaways: ship less JavaScript."));
        assert!(has_key_takeaways("TL;DR - it depends."));
        assert!(!has_key_takeaways("take it away"));
    }

    #[test]
    fn test_direct_answer_opening() {
        assert!(has_direct_answer_opening(
            "Crawl budget is the number of pages a bot will fetch.\n\nMore detail follows."
        ));
        assert!(has_direct_answer_opening("Yes, meta keywords are ignored."));
        assert!(!has_direct_answer_opening(
            "Before we answer that, some history.\n\nLong ago..."
        ));
        assert!(!has_direct_answer_opening(""));
    }

    #[test]
    fn test_sentence_utilities() {
        let text = "Short one. This sentence has exactly seven words in it! And here is \
                    another sentence that is long enough to carry fifteen whole words for \
                    the quotable test? Tail";

        let sentences = split_sentences(text);
        assert_eq!(sentences.len(), 4);
        assert_eq!(sentences[0], "Short one");

        assert_eq!(quotable_sentence_count(text), 1);
        assert!(avg_sentence_length(text).is_some());
        assert!(avg_sentence_length("").is_none());
        assert_eq!(quotable_sentence_count(""), 0);
    }

    #[test]
    fn test_first_paragraph() {
        let text = "\n\nOpening block here.\n\nSecond block.";
        assert_eq!(first_paragraph(text), Some("Opening block here."));
        assert_eq!(first_paragraph("single block only"), Some("single block only"));
        assert_eq!(first_paragraph("   \n\n  "), None);
    }

    #[test]
    fn test_schema_types_from_blocks() {
        let mut page = PageInput::new("https://example.com");
        page.structured_data = vec![
            serde_json::json!({"@context": "https://schema.org", "@type": "FAQPage"}),
            serde_json::json!({"@graph": [{"@type": "Article"}, {"@type": ["WebPage", "FAQPage"]}]}),
        ];

        let types = schema_types(&page);
        assert_eq!(types, vec!["FAQPage", "Article", "WebPage"]);
        assert!(has_schema_type(&page, &["Article", "NewsArticle"]));
        assert!(!has_schema_type(&page, &["HowTo"]));
    }

    #[test]
    fn test_schema_types_markup_fallback() {
        let mut page = PageInput::new("https://example.com");
        page.html = Some(
            r#"<script type="application/ld+json">{"@type": "HowTo"}</script>"#.to_string(),
        );
        assert_eq!(schema_types(&page), vec!["HowTo"]);
    }

    #[test]
    fn test_title_keyword_in_h1() {
        let h1s = vec!["A Complete Guide to Crawl Budget".to_string()];
        assert!(title_keyword_in_h1("Crawl Budget Explained", &h1s));
        assert!(!title_keyword_in_h1("Meta Tags 101", &h1s));
        assert!(!title_keyword_in_h1("", &h1s));
    }
}
