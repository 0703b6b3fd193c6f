//! Site-level aggregation: run the page analyzer across a set of page
//! snapshots and roll the results up for the dashboard.

use rayon::prelude::*;
use tracing::info;

use crate::domain::{AnalysisResult, IssueCounts, PageInput, SiteAudit};
use crate::service::page_analyzer::analyze_page;

/// How many pooled fixes the site audit surfaces per dimension.
const TOP_FIX_LIMIT: usize = 5;

/// Analyze every page and aggregate: averaged scores, summed issue
/// counts, and deduplicated top fixes pooled across pages.
///
/// Pages are independent, so analysis fans out across threads; the
/// indexed collect keeps results in input order, which keeps the fix
/// pools and averages deterministic. Zero pages yields a zeroed audit,
/// not an error.
pub fn audit_site(pages: &[PageInput]) -> SiteAudit {
    let results: Vec<AnalysisResult> = pages.par_iter().map(analyze_page).collect();

    let pages_analyzed = results.len() as i64;
    let issues = results.iter().fold(IssueCounts::default(), |mut sum, r| {
        sum.critical += r.issues.critical;
        sum.warnings += r.issues.warnings;
        sum.passed += r.issues.passed;
        sum
    });

    let top_seo_fixes = pool_fixes(results.iter().map(|r| &r.seo_recommendations));
    let top_aio_fixes = pool_fixes(results.iter().map(|r| &r.aio_recommendations));

    let audit = SiteAudit {
        pages_analyzed,
        avg_seo_score: average(results.iter().map(|r| r.seo_score)),
        avg_aio_score: average(results.iter().map(|r| r.aio_score)),
        avg_combined_score: average(results.iter().map(|r| r.combined_score)),
        issues,
        top_seo_fixes,
        top_aio_fixes,
        pages: results,
    };

    info!(
        "[SITE] {} pages - seo={} aio={} combined={} critical={}",
        audit.pages_analyzed,
        audit.avg_seo_score,
        audit.avg_aio_score,
        audit.avg_combined_score,
        audit.issues.critical
    );

    audit
}

fn average(scores: impl Iterator<Item = i64>) -> i64 {
    let (sum, count) = scores.fold((0i64, 0i64), |(sum, count), s| (sum + s, count + 1));
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as i64
}

/// Pool per-page fix lists into one deduplicated top list, first-seen
/// order preserved.
fn pool_fixes<'a>(lists: impl Iterator<Item = &'a Vec<String>>) -> Vec<String> {
    let mut pooled: Vec<String> = Vec::new();
    for list in lists {
        for fix in list {
            if !pooled.contains(fix) {
                pooled.push(fix.clone());
            }
        }
    }
    pooled.truncate(TOP_FIX_LIMIT);
    pooled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;

    #[test]
    fn test_zero_pages_yields_zeroed_audit() {
        let audit = audit_site(&[]);
        assert_eq!(audit.pages_analyzed, 0);
        assert_eq!(audit.avg_seo_score, 0);
        assert_eq!(audit.avg_aio_score, 0);
        assert_eq!(audit.avg_combined_score, 0);
        assert!(audit.top_seo_fixes.is_empty());
        assert!(audit.pages.is_empty());
    }

    #[test]
    fn test_averages_match_individual_results() {
        let pages = vec![
            fixtures::healthy_page(),
            fixtures::bare_page(),
            fixtures::healthy_page(),
        ];
        let audit = audit_site(&pages);

        assert_eq!(audit.pages_analyzed, 3);
        let expected_seo = {
            let sum: i64 = audit.pages.iter().map(|p| p.seo_score).sum();
            (sum as f64 / 3.0).round() as i64
        };
        assert_eq!(audit.avg_seo_score, expected_seo);
    }

    #[test]
    fn test_issue_counts_are_summed() {
        let pages = vec![fixtures::bare_page(), fixtures::bare_page()];
        let audit = audit_site(&pages);
        let per_page = audit.pages[0].issues;
        assert_eq!(audit.issues.critical, per_page.critical * 2);
        assert_eq!(audit.issues.warnings, per_page.warnings * 2);
    }

    #[test]
    fn test_fixes_are_deduplicated_first_seen() {
        // Two identical bare pages produce identical fix lists; the pool
        // must contain each fix once.
        let pages = vec![fixtures::bare_page(), fixtures::bare_page()];
        let audit = audit_site(&pages);

        assert!(!audit.top_seo_fixes.is_empty());
        assert!(audit.top_seo_fixes.len() <= 5);
        let mut deduped = audit.top_seo_fixes.clone();
        deduped.dedup();
        assert_eq!(audit.top_seo_fixes, deduped);
        assert_eq!(audit.top_seo_fixes, audit.pages[0].seo_recommendations);
    }

    #[test]
    fn test_result_order_follows_input_order() {
        let pages = vec![fixtures::bare_page(), fixtures::healthy_page()];
        let audit = audit_site(&pages);
        assert_eq!(audit.pages[0].url, pages[0].url);
        assert_eq!(audit.pages[1].url, pages[1].url);
    }

    #[test]
    fn test_repeated_audits_are_identical() {
        let pages = vec![fixtures::healthy_page(), fixtures::bare_page()];
        let first = serde_json::to_string(&audit_site(&pages)).unwrap();
        let second = serde_json::to_string(&audit_site(&pages)).unwrap();
        assert_eq!(first, second);
    }
}
