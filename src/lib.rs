//! Deterministic page-quality scoring for SEOINSIKT.
//!
//! Two independent 0-100 scores per page - classic SEO fitness and AIO
//! (answer-engine) quotability - built from declarative rule tables, plus
//! site-level aggregation. Pure and synchronous: no I/O, no state, no
//! clock; identical input always yields an identical result.

pub mod domain;
pub mod error;
pub mod extractor;
pub mod service;
pub mod test_utils;

pub use domain::{AnalysisResult, PageInput, SiteAudit};
pub use extractor::PageExtractor;
pub use service::{analyze_page, audit_site};
