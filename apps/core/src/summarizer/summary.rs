//! Per-department statistics and their linguistic summary sentences.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::fuzzy::calibration::{slope_pct_of_mean, CalibrationSet};
use crate::fuzzy::{label_level, label_trend, theil_sen_slope, LevelLabel, TrendLabel};
use crate::models::BudgetDataset;

/// Statistics and labels of one department over a dataset slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentSummary {
    pub department: String,
    pub last_year: i32,
    pub share_last_pct: f64,
    /// Percentage points per year.
    pub slope_pp_per_year: f64,
    pub slope_pct_of_mean: f64,
    pub level_label: LevelLabel,
    pub level_mu: f64,
    pub trend_label: TrendLabel,
    pub trend_mu: f64,
    pub sentence: String,
}

/// A department's slope inside the requested window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    #[serde(rename = "departement")]
    pub department: String,
    pub slope_pp_per_year: f64,
    pub last_share: f64,
}

/// Summarize every department of `dataset`.
///
/// Ordered by latest year, then latest share, both descending.
pub fn summarize(
    dataset: &BudgetDataset,
    spending_only: bool,
    calibration: &CalibrationSet,
) -> Vec<DepartmentSummary> {
    let mut summaries: Vec<DepartmentSummary> = dataset
        .department_series(spending_only)
        .into_iter()
        .filter_map(|(department, points)| {
            let &(first_year, first_share) = points.first()?;
            let &(last_year, last_share) = points.last()?;
            let (years, shares): (Vec<i32>, Vec<f64>) = points.into_iter().unzip();

            // Relative slope keeps small and large departments comparable
            let slope = theil_sen_slope(&years, &shares);
            let relative = slope_pct_of_mean(slope, &shares);

            let level = label_level(last_share, &calibration.level_mfs);
            let trend = label_trend(relative, &calibration.trend_mfs);

            let sentence = format!(
                "{}: share is {} and {} ({:+.2} pp/yr; {}→{}: {:.2}%→{:.2}%).",
                department,
                level.label.label().to_uppercase(),
                trend.label.label().to_uppercase(),
                slope,
                first_year,
                last_year,
                first_share,
                last_share
            );

            Some(DepartmentSummary {
                department,
                last_year,
                share_last_pct: last_share,
                slope_pp_per_year: slope,
                slope_pct_of_mean: relative,
                level_label: level.label,
                level_mu: level.degree,
                trend_label: trend.label,
                trend_mu: trend.degree,
                sentence,
            })
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.last_year.cmp(&a.last_year).then_with(|| {
            b.share_last_pct
                .partial_cmp(&a.share_last_pct)
                .unwrap_or(Ordering::Equal)
        })
    });
    summaries
}

/// Slope of every department with at least two yearly points.
pub fn department_slopes(dataset: &BudgetDataset, spending_only: bool) -> Vec<Mover> {
    dataset
        .department_series(spending_only)
        .into_iter()
        .filter(|(_, points)| points.len() >= 2)
        .map(|(department, points)| {
            let last_share = points.last().map_or(0.0, |(_, share)| *share);
            let (years, shares): (Vec<i32>, Vec<f64>) = points.into_iter().unzip();
            Mover {
                department,
                slope_pp_per_year: theil_sen_slope(&years, &shares),
                last_share,
            }
        })
        .collect()
}

/// The `n` steepest risers, steepest first.
pub fn top_increases(movers: &[Mover], n: usize) -> Vec<Mover> {
    let mut sorted = movers.to_vec();
    sorted.sort_by(|a, b| b.slope_pp_per_year.total_cmp(&a.slope_pp_per_year));
    sorted.truncate(n);
    sorted
}

/// The `n` steepest fallers, steepest first.
pub fn top_decreases(movers: &[Mover], n: usize) -> Vec<Mover> {
    let mut sorted = movers.to_vec();
    sorted.sort_by(|a, b| a.slope_pp_per_year.total_cmp(&b.slope_pp_per_year));
    sorted.truncate(n);
    sorted
}

/// Sentences of the latest year, at most `n`.
pub fn latest_sentences(summaries: &[DepartmentSummary], n: usize) -> Vec<&str> {
    let Some(latest) = summaries.iter().map(|s| s.last_year).max() else {
        return vec![];
    };
    summaries
        .iter()
        .filter(|s| s.last_year == latest)
        .take(n)
        .map(|s| s.sentence.as_str())
        .collect()
}
