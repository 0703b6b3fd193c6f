//! Error types for the scoring engine.
//!
//! Scoring itself never fails - malformed or partial input degrades to
//! worst-case scores. The only fallible surface is the mechanical rule
//! table validator, which guards the per-category point budgets.

use thiserror::Error;

/// Violations of the rule table point budgets.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleTableError {
    /// A category's max scores do not sum to the 20-point budget
    #[error("category '{category}' budgets {actual} points, expected {expected}")]
    CategoryBudget {
        category: &'static str,
        expected: i64,
        actual: i64,
    },

    /// A full breakdown's max scores do not sum to 100
    #[error("{dimension} rule table budgets {actual} points, expected {expected}")]
    DimensionBudget {
        dimension: &'static str,
        expected: i64,
        actual: i64,
    },
}

/// Result type alias using RuleTableError.
pub type Result<T> = std::result::Result<T, RuleTableError>;
