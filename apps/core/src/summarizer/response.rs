//! Response shapes of the summarizer.

use serde::Serialize;

use super::summary::Mover;
use crate::fuzzy::{LevelLabel, TrendLabel};
use crate::nlu::BudgetRequest;

/// Inclusive year span of the answered window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearSpan {
    pub start: i32,
    pub end: i32,
}

/// Detail block of a single-department answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryDetail {
    pub level: LevelLabel,
    pub level_mu: f64,
    pub trend: TrendLabel,
    pub trend_mu: f64,
    pub share_last_pct: f64,
    pub slope_pp_per_year: f64,
    pub slope_pct_of_mean: f64,
    pub years: YearSpan,
}

/// One case per answer shape. Serialized without a tag, so each variant
/// produces exactly its own keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BudgetResponse {
    /// Biggest movers across all departments.
    Movers {
        message: String,
        request: BudgetRequest,
        top_increases: Vec<Mover>,
        top_decreases: Vec<Mover>,
    },
    /// Trend and level of one department.
    DepartmentDetail {
        message: String,
        request: BudgetRequest,
        department: String,
        summary: SummaryDetail,
    },
    /// Nothing to summarize in the requested window.
    NoData { message: String, request: BudgetRequest },
    /// The requested topic maps to no known department.
    UnknownTopic { message: String, request: BudgetRequest },
}

impl BudgetResponse {
    pub fn message(&self) -> &str {
        match self {
            BudgetResponse::Movers { message, .. }
            | BudgetResponse::DepartmentDetail { message, .. }
            | BudgetResponse::NoData { message, .. }
            | BudgetResponse::UnknownTopic { message, .. } => message,
        }
    }

    pub fn request(&self) -> &BudgetRequest {
        match self {
            BudgetResponse::Movers { request, .. }
            | BudgetResponse::DepartmentDetail { request, .. }
            | BudgetResponse::NoData { request, .. }
            | BudgetResponse::UnknownTopic { request, .. } => request,
        }
    }

    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BudgetResponse::Movers { .. } => "movers",
            BudgetResponse::DepartmentDetail { .. } => "department_detail",
            BudgetResponse::NoData { .. } => "no_data",
            BudgetResponse::UnknownTopic { .. } => "unknown_topic",
        }
    }
}
