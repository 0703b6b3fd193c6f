pub mod models;

pub use models::{
    AioBreakdown, AioCategoryScores, AioFactors, AnalysisResult, ImageElement, IssueCounts,
    PageInput, PageSummary, ScoreItem, SeoBreakdown, SeoCategoryScores, SiteAudit, Status,
};
