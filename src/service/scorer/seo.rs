//! SEO rule evaluator.
//!
//! Five categories of 20 points each: technical, content, meta,
//! performance, accessibility. Pure function of the page snapshot; a
//! missing field scores worst case instead of erroring.
//!
//! Statuses are authored per rule, not derived from points lost: a
//! missing canonical tag stays a warning while a missing H1 is a failure.

use super::detectors;
use super::{run_rules, validate_budgets, Rule, Verdict};
use crate::domain::{PageInput, SeoBreakdown};
use crate::error::Result;

pub const ITEM_HTTPS: &str = "HTTPS";
pub const ITEM_STRUCTURED_DATA: &str = "Structured Data";
pub const ITEM_INTERNAL_LINKS: &str = "Internal Links";
pub const ITEM_CANONICAL: &str = "Canonical Tag";
pub const ITEM_H1: &str = "H1 Heading";
pub const ITEM_SUBHEADINGS: &str = "Subheadings";
pub const ITEM_CONTENT_LENGTH: &str = "Content Length";
pub const ITEM_TITLE_KEYWORD: &str = "Title Keyword in H1";
pub const ITEM_TITLE: &str = "Title Tag";
pub const ITEM_META_DESCRIPTION: &str = "Meta Description";
pub const ITEM_OPEN_GRAPH: &str = "Open Graph Tags";
pub const ITEM_LOAD_TIME: &str = "Load Time";
pub const ITEM_HTML_SIZE: &str = "HTML Size";
pub const ITEM_VIEWPORT: &str = "Mobile Viewport";
pub const ITEM_IMAGE_ALT: &str = "Image Alt Text";
pub const ITEM_HTML_LANG: &str = "Language Attribute";
pub const ITEM_ARIA: &str = "ARIA Attributes";

const TECHNICAL_RULES: &[Rule] = &[
    Rule { name: ITEM_HTTPS, max: 5, detect: detect_https },
    Rule { name: ITEM_STRUCTURED_DATA, max: 5, detect: detect_structured_data },
    Rule { name: ITEM_INTERNAL_LINKS, max: 5, detect: detect_internal_links },
    Rule { name: ITEM_CANONICAL, max: 5, detect: detect_canonical },
];

const CONTENT_RULES: &[Rule] = &[
    Rule { name: ITEM_H1, max: 5, detect: detect_h1 },
    Rule { name: ITEM_SUBHEADINGS, max: 3, detect: detect_subheadings },
    Rule { name: ITEM_CONTENT_LENGTH, max: 7, detect: detect_content_length },
    Rule { name: ITEM_TITLE_KEYWORD, max: 5, detect: detect_title_keyword },
];

const META_RULES: &[Rule] = &[
    Rule { name: ITEM_TITLE, max: 8, detect: detect_title },
    Rule { name: ITEM_META_DESCRIPTION, max: 8, detect: detect_meta_description },
    Rule { name: ITEM_OPEN_GRAPH, max: 4, detect: detect_open_graph },
];

const PERFORMANCE_RULES: &[Rule] = &[
    Rule { name: ITEM_LOAD_TIME, max: 10, detect: detect_load_time },
    Rule { name: ITEM_HTML_SIZE, max: 5, detect: detect_html_size },
    Rule { name: ITEM_VIEWPORT, max: 5, detect: detect_viewport },
];

const ACCESSIBILITY_RULES: &[Rule] = &[
    Rule { name: ITEM_IMAGE_ALT, max: 10, detect: detect_image_alt },
    Rule { name: ITEM_HTML_LANG, max: 5, detect: detect_html_lang },
    Rule { name: ITEM_ARIA, max: 5, detect: detect_aria },
];

/// Evaluate all SEO rules against one page.
pub fn evaluate(page: &PageInput) -> SeoBreakdown {
    SeoBreakdown {
        technical: run_rules(TECHNICAL_RULES, page),
        content: run_rules(CONTENT_RULES, page),
        meta: run_rules(META_RULES, page),
        performance: run_rules(PERFORMANCE_RULES, page),
        accessibility: run_rules(ACCESSIBILITY_RULES, page),
    }
}

/// Check the 20-points-per-category / 100-total budget invariant.
pub fn validate_point_budgets() -> Result<()> {
    validate_budgets(
        "seo",
        &[
            ("technical", TECHNICAL_RULES),
            ("content", CONTENT_RULES),
            ("meta", META_RULES),
            ("performance", PERFORMANCE_RULES),
            ("accessibility", ACCESSIBILITY_RULES),
        ],
    )
}

// ====== Technical ======

fn detect_https(page: &PageInput) -> Verdict {
    if page.url.starts_with("https://") {
        Verdict::pass(5, "Page is served over HTTPS")
    } else {
        Verdict::fail(
            0,
            "Page is not served over HTTPS",
            "Serve the page over HTTPS; both search and answer engines prefer secure pages",
        )
    }
}

fn detect_structured_data(page: &PageInput) -> Verdict {
    if !page.structured_data.is_empty() || detectors::has_structured_data_markup(page.markup()) {
        Verdict::pass(5, "Structured data detected")
    } else {
        Verdict::warning(
            0,
            "No structured data found",
            "Add JSON-LD structured data describing the page content",
        )
    }
}

fn detect_internal_links(page: &PageInput) -> Verdict {
    let count = page.internal_links.unwrap_or(0);
    if count >= 3 {
        Verdict::pass(5, format!("Page has {} internal links", count))
    } else if count > 0 {
        Verdict::warning(
            count.min(4),
            format!("Page only has {} internal links", count),
            "Add at least 3 relevant internal links to related pages",
        )
    } else {
        Verdict::warning(
            0,
            "Page has no internal links",
            "Add at least 3 relevant internal links to related pages",
        )
    }
}

fn detect_canonical(page: &PageInput) -> Verdict {
    if detectors::has_canonical(page.markup()) {
        Verdict::pass(5, "Canonical tag present")
    } else {
        Verdict::warning(
            0,
            "Page has no canonical tag",
            "Add a canonical tag to prevent duplicate content issues",
        )
    }
}

// ====== Content ======

fn detect_h1(page: &PageInput) -> Verdict {
    match page.h1.len() {
        1 => Verdict::pass(5, "Page has exactly one H1"),
        0 => Verdict::fail(
            0,
            "Page has no H1 heading",
            "Add one H1 tag with the main keyword near the top",
        ),
        count => Verdict::warning(
            3,
            format!("Page has {} H1 tags", count),
            "Use only one H1 tag per page",
        ),
    }
}

fn detect_subheadings(page: &PageInput) -> Verdict {
    match page.h2.len() {
        0 => Verdict::warning(
            0,
            "Page has no H2 subheadings",
            "Break the content up with H2 subheadings",
        ),
        1 => Verdict::warning(
            2,
            "Page only has one H2 subheading",
            "Break the content up with H2 subheadings",
        ),
        count => Verdict::pass(3, format!("Page has {} H2 subheadings", count)),
    }
}

fn detect_content_length(page: &PageInput) -> Verdict {
    let words = page.word_count.unwrap_or(0);
    let reason = format!("Page has {} words", words);
    let fix = "Expand the content; comprehensive pages of 1500+ words rank and get quoted more often";
    if words >= 1500 {
        Verdict::pass(7, reason)
    } else if words >= 800 {
        Verdict::pass(5, reason)
    } else if words >= 300 {
        Verdict::warning(3, reason, fix)
    } else if words >= 100 {
        Verdict::warning(1, reason, fix)
    } else {
        Verdict::fail(0, format!("Page only has {} words", words), fix)
    }
}

fn detect_title_keyword(page: &PageInput) -> Verdict {
    let title = page.title.as_deref().unwrap_or("");
    if detectors::title_keyword_in_h1(title, &page.h1) {
        Verdict::pass(5, "Title and H1 share a keyword")
    } else {
        Verdict::warning(
            0,
            "Title and H1 do not share a keyword",
            "Align the H1 with the title's main keyword",
        )
    }
}

// ====== Meta ======

fn detect_title(page: &PageInput) -> Verdict {
    let title = page.title.as_deref().unwrap_or("").trim();
    if title.is_empty() {
        return Verdict::fail(
            0,
            "Page has no title tag",
            "Add a unique, descriptive title tag (50-60 characters)",
        );
    }
    let len = title.len();
    let fix = "Adjust the title to 50-60 characters with the main keyword first";
    if (50..=60).contains(&len) {
        Verdict::pass(8, format!("Title length is optimal ({} characters)", len))
    } else if (30..=70).contains(&len) {
        Verdict::warning(6, format!("Title is {} characters (aim for 50-60)", len), fix)
    } else {
        Verdict::warning(3, format!("Title is {} characters (aim for 50-60)", len), fix)
    }
}

fn detect_meta_description(page: &PageInput) -> Verdict {
    let description = page.meta_description.as_deref().unwrap_or("").trim();
    if description.is_empty() {
        return Verdict::fail(
            0,
            "Page has no meta description",
            "Add a compelling meta description (120-160 characters)",
        );
    }
    let len = description.len();
    let fix = "Adjust the meta description to 120-160 characters with a call to action";
    if (120..=160).contains(&len) {
        Verdict::pass(8, format!("Description length is optimal ({} characters)", len))
    } else if (70..=180).contains(&len) {
        Verdict::warning(5, format!("Description is {} characters (aim for 120-160)", len), fix)
    } else {
        Verdict::warning(2, format!("Description is {} characters (aim for 120-160)", len), fix)
    }
}

fn detect_open_graph(page: &PageInput) -> Verdict {
    if detectors::has_open_graph(page.markup()) {
        Verdict::pass(4, "Open Graph tags present")
    } else {
        Verdict::warning(
            0,
            "Page has no Open Graph tags",
            "Add og:title, og:description and og:image tags for rich link previews",
        )
    }
}

// ====== Performance ======

fn detect_load_time(page: &PageInput) -> Verdict {
    let fix = "Optimize images, enable caching and reduce server response time";
    let Some(ms) = page.load_time_ms else {
        return Verdict::fail(0, "Load time was not measured", fix);
    };
    let reason = format!("Page loaded in {:.0}ms", ms);
    if ms <= 1000.0 {
        Verdict::pass(10, reason)
    } else if ms <= 2000.0 {
        Verdict::pass(8, reason)
    } else if ms <= 3000.0 {
        Verdict::warning(5, format!("Page loaded in {:.0}ms (aim for under 2000ms)", ms), fix)
    } else if ms <= 5000.0 {
        Verdict::warning(2, format!("Page loaded in {:.0}ms (aim for under 2000ms)", ms), fix)
    } else {
        Verdict::fail(0, format!("Page took {:.0}ms to load", ms), fix)
    }
}

fn detect_html_size(page: &PageInput) -> Verdict {
    let fix = "Reduce HTML size below 100KB by trimming inline scripts and markup";
    let size = page.html_size.or_else(|| {
        let markup = page.markup();
        (!markup.is_empty()).then(|| markup.len() as i64)
    });
    let Some(bytes) = size else {
        return Verdict::fail(0, "HTML size is unknown", fix);
    };
    let kb = bytes / 1024;
    if bytes <= 100_000 {
        Verdict::pass(5, format!("HTML size is {}KB", kb))
    } else if bytes <= 200_000 {
        Verdict::warning(3, format!("HTML size is {}KB (aim for under 100KB)", kb), fix)
    } else {
        Verdict::warning(1, format!("HTML size is {}KB (aim for under 100KB)", kb), fix)
    }
}

fn detect_viewport(page: &PageInput) -> Verdict {
    if detectors::has_viewport(page.markup()) {
        Verdict::pass(5, "Viewport meta tag present")
    } else {
        Verdict::fail(
            0,
            "Page has no viewport meta tag",
            "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">",
        )
    }
}

// ====== Accessibility ======

fn detect_image_alt(page: &PageInput) -> Verdict {
    let total = page.images.len() as i64;
    if total == 0 {
        return Verdict::pass(10, "No images on page");
    }
    let with_alt = page
        .images
        .iter()
        .filter(|img| img.alt.as_deref().is_some_and(|alt| !alt.trim().is_empty()))
        .count() as i64;
    let score = (with_alt as f64 / total as f64 * 10.0).round() as i64;
    let reason = format!("{} of {} images have alt text", with_alt, total);
    let fix = "Add descriptive alt text to every image";
    if with_alt == total {
        Verdict::pass(10, reason)
    } else if with_alt > 0 {
        Verdict::warning(score, reason, fix)
    } else {
        Verdict::fail(0, reason, fix)
    }
}

fn detect_html_lang(page: &PageInput) -> Verdict {
    if detectors::has_html_lang(page.markup()) {
        Verdict::pass(5, "html lang attribute present")
    } else {
        Verdict::warning(
            0,
            "Page html tag has no lang attribute",
            "Declare the page language with <html lang=\"...\">",
        )
    }
}

fn detect_aria(page: &PageInput) -> Verdict {
    if detectors::has_aria_markup(page.markup()) {
        Verdict::pass(5, "ARIA attributes detected")
    } else {
        Verdict::warning(
            0,
            "No ARIA attributes or roles found",
            "Add ARIA roles and attributes to interactive elements",
        )
    }
}
