//! Summary Engine - composes answers from budget data and a calibration.
//!
//! Two answer shapes:
//! 1. `field = "all"`: biggest movers across departments
//! 2. a specific topic: trend and level of the matching department

use tracing::{debug, info};

use super::response::{BudgetResponse, SummaryDetail, YearSpan};
use super::summary::{
    department_slopes, summarize, top_decreases, top_increases, DepartmentSummary, Mover,
};
use crate::catalog::DepartmentCatalog;
use crate::fuzzy::CalibrationSet;
use crate::models::BudgetDataset;
use crate::nlu::{BudgetRequest, Verbosity, ALL_TOPICS};

/// Number of departments named per direction in a movers answer.
const TOP_MOVERS: usize = 2;

pub const NO_DATA_MESSAGE: &str = "No data available for the requested timeline.";
pub const NO_SPENDING_MESSAGE: &str = "No spending data found for the requested timeline.";
/// Movers answer for a window where no department has a slope.
pub const NO_MOVERS_MESSAGE: &str = "No department has two or more years in this window.";

/// Renders responses for budget requests.
pub struct SummaryEngine {
    catalog: DepartmentCatalog,
    spending_only: bool,
}

impl Default for SummaryEngine {
    fn default() -> Self {
        Self::new(DepartmentCatalog::zurich(), true)
    }
}

impl SummaryEngine {
    pub fn new(catalog: DepartmentCatalog, spending_only: bool) -> Self {
        Self {
            catalog,
            spending_only,
        }
    }

    /// Batch summaries of every department in `dataset`.
    pub fn summaries(
        &self,
        dataset: &BudgetDataset,
        calibration: &CalibrationSet,
    ) -> Vec<DepartmentSummary> {
        summarize(dataset, self.spending_only, calibration)
    }

    /// Answer a request over the full dataset.
    pub fn answer(
        &self,
        dataset: &BudgetDataset,
        calibration: &CalibrationSet,
        request: &BudgetRequest,
    ) -> BudgetResponse {
        let window = match request.timeline.start_year() {
            Some(start) => dataset.since(start),
            None => dataset.clone(),
        };
        let Some((start_year, end_year)) = window.year_range() else {
            info!("No rows for timeline {:?}", request.timeline);
            return no_data(NO_DATA_MESSAGE, request);
        };

        let summaries = self.summaries(&window, calibration);
        if summaries.is_empty() {
            info!("No spending rows for timeline {:?}", request.timeline);
            return no_data(NO_SPENDING_MESSAGE, request);
        }

        let span = YearSpan {
            start: start_year,
            end: end_year,
        };
        let movers = department_slopes(&window, self.spending_only);
        let field = request.field.trim().to_lowercase();

        let response = if field == ALL_TOPICS {
            self.movers_answer(request, &movers, span)
        } else {
            self.department_answer(request, &field, &summaries, &movers, span)
        };
        debug!("Answered field '{}' with {}", field, response.kind());
        response
    }

    fn movers_answer(
        &self,
        request: &BudgetRequest,
        movers: &[Mover],
        span: YearSpan,
    ) -> BudgetResponse {
        let increases = top_increases(movers, TOP_MOVERS);
        let decreases = top_decreases(movers, TOP_MOVERS);

        if increases.is_empty() {
            return BudgetResponse::Movers {
                message: NO_MOVERS_MESSAGE.to_string(),
                request: request.clone(),
                top_increases: increases,
                top_decreases: decreases,
            };
        }

        let mut message = format!(
            "Between {} and {}, the biggest increases are in {}.",
            span.start,
            span.end,
            describe_movers(&increases)
        );
        if request.generalization_level >= Verbosity::Normal && !decreases.is_empty() {
            message.push_str(&format!(" Decreases are led by {}.", describe_movers(&decreases)));
        }

        BudgetResponse::Movers {
            message,
            request: request.clone(),
            top_increases: increases,
            top_decreases: decreases,
        }
    }

    fn department_answer(
        &self,
        request: &BudgetRequest,
        field: &str,
        summaries: &[DepartmentSummary],
        movers: &[Mover],
        span: YearSpan,
    ) -> BudgetResponse {
        let available: Vec<&str> = summaries.iter().map(|s| s.department.as_str()).collect();
        let Some(department) = self.resolve_department(field, &available) else {
            return BudgetResponse::UnknownTopic {
                message: format!(
                    "Unknown field '{}'. Try one of: all, education, healthcare, transport, energy.",
                    field
                ),
                request: request.clone(),
            };
        };

        let Some(summary) = summaries
            .iter()
            .filter(|s| s.department == department)
            .max_by_key(|s| s.last_year)
        else {
            return no_data(
                &format!("No data found for '{}' in the requested timeline.", department),
                request,
            );
        };

        let extra = if request.generalization_level >= Verbosity::Normal && !movers.is_empty() {
            let names: Vec<String> = top_increases(movers, TOP_MOVERS)
                .into_iter()
                .map(|m| m.department)
                .collect();
            format!(" Meanwhile, the biggest increases are in {}.", names.join(", "))
        } else {
            String::new()
        };

        let message = format!(
            "Since {}, {} is {} and currently {} ({:.1}% in {}, {:+.2} pp/yr).{}",
            span.start,
            department,
            summary.trend_label,
            summary.level_label,
            summary.share_last_pct,
            span.end,
            summary.slope_pp_per_year,
            extra
        );

        BudgetResponse::DepartmentDetail {
            message,
            request: request.clone(),
            department,
            summary: SummaryDetail {
                level: summary.level_label,
                level_mu: summary.level_mu,
                trend: summary.trend_label,
                trend_mu: summary.trend_mu,
                share_last_pct: summary.share_last_pct,
                slope_pp_per_year: summary.slope_pp_per_year,
                slope_pct_of_mean: summary.slope_pct_of_mean,
                years: span,
            },
        }
    }

    /// Topic alias first, then case-insensitive substring of a known name.
    pub fn resolve_department(&self, query: &str, available: &[&str]) -> Option<String> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return None;
        }
        if let Some(name) = self.catalog.department_for_topic(&q) {
            return Some(name.to_string());
        }
        available
            .iter()
            .find(|name| name.to_lowercase().contains(&q))
            .map(|name| name.to_string())
    }
}

fn describe_movers(movers: &[Mover]) -> String {
    movers
        .iter()
        .map(|m| format!("{} ({:+.2} pp/yr)", m.department, m.slope_pp_per_year))
        .collect::<Vec<_>>()
        .join(", ")
}

fn no_data(message: &str, request: &BudgetRequest) -> BudgetResponse {
    BudgetResponse::NoData {
        message: message.to_string(),
        request: request.clone(),
    }
}
