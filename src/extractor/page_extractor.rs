//! Builds a [`PageInput`] snapshot from raw HTML.
//!
//! Convenience for callers that already hold a fetched document: the
//! crawler stays the owner of fetching and timing, so `load_time_ms` is
//! left unset here.

use std::sync::OnceLock;

use scraper::{Html, Selector};
use url::Url;

use crate::domain::{ImageElement, PageInput};

pub struct PageExtractor;

impl PageExtractor {
    /// Parse raw markup into a page snapshot for the given URL.
    pub fn extract(url: &str, html: &str) -> PageInput {
        let document = Html::parse_document(html);
        let (internal_links, external_links) = Self::count_links(&document, url);

        PageInput {
            url: url.to_string(),
            title: Self::extract_title(&document),
            meta_description: Self::extract_meta_description(&document),
            h1: Self::extract_headings(&document, Level::H1),
            h2: Self::extract_headings(&document, Level::H2),
            h3: Self::extract_headings(&document, Level::H3),
            word_count: Some(Self::count_words(&document)),
            images: Self::extract_images(&document),
            internal_links: Some(internal_links),
            external_links: Some(external_links),
            load_time_ms: None,
            html_size: Some(html.len() as i64),
            structured_data: Self::extract_structured_data(&document),
            html: Some(html.to_string()),
            text: Some(Self::extract_text(&document)),
        }
    }

    fn extract_title(document: &Html) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("title").unwrap());
        document
            .select(selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn extract_meta_description(document: &Html) -> Option<String> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector =
            SELECTOR.get_or_init(|| Selector::parse("meta[name='description']").unwrap());
        document
            .select(selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn extract_headings(document: &Html, level: Level) -> Vec<String> {
        static H1: OnceLock<Selector> = OnceLock::new();
        static H2: OnceLock<Selector> = OnceLock::new();
        static H3: OnceLock<Selector> = OnceLock::new();
        let selector = match level {
            Level::H1 => H1.get_or_init(|| Selector::parse("h1").unwrap()),
            Level::H2 => H2.get_or_init(|| Selector::parse("h2").unwrap()),
            Level::H3 => H3.get_or_init(|| Selector::parse("h3").unwrap()),
        };
        document
            .select(selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn count_words(document: &Html) -> i64 {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("body").unwrap());
        document
            .select(selector)
            .next()
            .map(|body| body.text().collect::<String>().split_whitespace().count() as i64)
            .unwrap_or(0)
    }

    /// Body text with the source whitespace kept, so paragraph breaks
    /// survive for the text-level detectors.
    fn extract_text(document: &Html) -> String {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("body").unwrap());
        document
            .select(selector)
            .next()
            .map(|body| body.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    fn extract_images(document: &Html) -> Vec<ImageElement> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("img[src]").unwrap());
        document
            .select(selector)
            .filter_map(|el| {
                let src = el.value().attr("src")?.trim().to_string();
                if src.is_empty() {
                    return None;
                }
                Some(ImageElement {
                    src,
                    alt: el.value().attr("alt").map(|s| s.trim().to_string()),
                })
            })
            .collect()
    }

    fn count_links(document: &Html, base_url: &str) -> (i64, i64) {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("a[href]").unwrap());
        let base = Url::parse(base_url).ok();

        let mut internal = 0;
        let mut external = 0;
        for link in document.select(selector) {
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            match base.as_ref().and_then(|b| b.join(href).ok()) {
                Some(resolved)
                    if base.as_ref().map(|b| b.host_str()) == Some(resolved.host_str()) =>
                {
                    internal += 1;
                }
                Some(_) => external += 1,
                // Unresolvable base or href: treat as external, same as
                // the crawler does for unparsable targets
                None => external += 1,
            }
        }
        (internal, external)
    }

    fn extract_structured_data(document: &Html) -> Vec<serde_json::Value> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR
            .get_or_init(|| Selector::parse("script[type='application/ld+json']").unwrap());
        document
            .select(selector)
            .filter_map(|el| {
                let raw = el.text().collect::<String>();
                serde_json::from_str(&raw).ok()
            })
            .collect()
    }
}

enum Level {
    H1,
    H2,
    H3,
}
