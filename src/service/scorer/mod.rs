//! Rule-table scoring core.
//!
//! Both evaluators are declarative tables of [`Rule`]s - name, point
//! budget, detect function - grouped into five categories of 20 points
//! each. Keeping the weights in tables makes the budget invariant
//! mechanically checkable and every rule independently testable.

pub mod aio;
pub mod detectors;
pub mod seo;

use crate::domain::{PageInput, ScoreItem, Status};
use crate::error::{Result, RuleTableError};

/// Points every category budgets.
pub const CATEGORY_BUDGET: i64 = 20;
/// Points every full breakdown budgets.
pub const DIMENSION_BUDGET: i64 = 100;

/// What a rule's detect function reports for one page.
pub(crate) struct Verdict {
    pub score: i64,
    pub status: Status,
    pub reason: String,
    pub fix: Option<&'static str>,
    pub metric: Option<f64>,
}

impl Verdict {
    pub(crate) fn pass(score: i64, reason: impl Into<String>) -> Self {
        Self {
            score,
            status: Status::Pass,
            reason: reason.into(),
            fix: None,
            metric: None,
        }
    }

    pub(crate) fn warning(score: i64, reason: impl Into<String>, fix: &'static str) -> Self {
        Self {
            score,
            status: Status::Warning,
            reason: reason.into(),
            fix: Some(fix),
            metric: None,
        }
    }

    pub(crate) fn fail(score: i64, reason: impl Into<String>, fix: &'static str) -> Self {
        Self {
            score,
            status: Status::Fail,
            reason: reason.into(),
            fix: Some(fix),
            metric: None,
        }
    }

    pub(crate) fn with_metric(mut self, metric: f64) -> Self {
        self.metric = Some(metric);
        self
    }
}

/// One scoring rule: a named check with a fixed point budget.
pub(crate) struct Rule {
    pub name: &'static str,
    pub max: i64,
    pub detect: fn(&PageInput) -> Verdict,
}

/// Run a category's rules against a page. Scores are clamped to the
/// rule's budget so a detect bug can never break the item invariant.
pub(crate) fn run_rules(rules: &[Rule], page: &PageInput) -> Vec<ScoreItem> {
    rules
        .iter()
        .map(|rule| {
            let verdict = (rule.detect)(page);
            ScoreItem {
                name: rule.name.to_string(),
                score: verdict.score.clamp(0, rule.max),
                max_score: rule.max,
                status: verdict.status,
                reason: verdict.reason,
                how_to_fix: verdict.fix.map(str::to_string),
                metric: verdict.metric,
            }
        })
        .collect()
}

/// Check that each category budgets exactly 20 points and the whole
/// dimension budgets 100.
pub(crate) fn validate_budgets(
    dimension: &'static str,
    categories: &[(&'static str, &[Rule])],
) -> Result<()> {
    let mut dimension_total = 0;
    for &(category, rules) in categories {
        let total: i64 = rules.iter().map(|r| r.max).sum();
        if total != CATEGORY_BUDGET {
            return Err(RuleTableError::CategoryBudget {
                category,
                expected: CATEGORY_BUDGET,
                actual: total,
            });
        }
        dimension_total += total;
    }
    if dimension_total != DIMENSION_BUDGET {
        return Err(RuleTableError::DimensionBudget {
            dimension,
            expected: DIMENSION_BUDGET,
            actual: dimension_total,
        });
    }
    Ok(())
}

/// Roll a category's items into a 0-20 score. An empty rule list scores
/// 0, never NaN.
pub fn calculate_category_score(items: &[ScoreItem]) -> i64 {
    weighted_score(items.iter(), CATEGORY_BUDGET)
}

/// Roll a full breakdown's items into a 0-100 score.
pub fn calculate_total_score<'a>(items: impl Iterator<Item = &'a ScoreItem>) -> i64 {
    weighted_score(items, DIMENSION_BUDGET)
}

fn weighted_score<'a>(items: impl Iterator<Item = &'a ScoreItem>, scale: i64) -> i64 {
    let (score, max) = items.fold((0i64, 0i64), |(score, max), item| {
        (score + item.score, max + item.max_score)
    });
    if max == 0 {
        return 0;
    }
    (score as f64 / max as f64 * scale as f64).round() as i64
}

/// Top unresolved fixes, ranked by points lost (descending, stable on
/// ties) and truncated to `limit`.
pub fn top_recommendations<'a>(
    items: impl Iterator<Item = &'a ScoreItem>,
    limit: usize,
) -> Vec<String> {
    let mut candidates: Vec<&ScoreItem> = items
        .filter(|item| item.status != Status::Pass)
        .filter(|item| item.how_to_fix.as_deref().is_some_and(|fix| !fix.is_empty()))
        .collect();
    candidates.sort_by_key(|item| std::cmp::Reverse(item.max_score - item.score));
    candidates
        .into_iter()
        .take(limit)
        .filter_map(|item| item.how_to_fix.clone())
        .collect()
}
