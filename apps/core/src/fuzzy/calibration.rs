//! Distribution-driven calibration of the membership functions.
//!
//! Level trapezoids come from share quantiles, trend trapezoids from the
//! median and MAD of percent-of-mean slopes. Fewer than
//! [`MIN_CALIBRATION_SAMPLES`] finite samples fall back to fixed defaults.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::membership::{LevelMfs, MembershipFunction, TrendMfs};
use super::trend::{median, theil_sen_slope};
use crate::error::Result;
use crate::models::BudgetDataset;

/// Minimum number of finite samples needed to fit trapezoids.
pub const MIN_CALIBRATION_SAMPLES: usize = 5;

/// Nudge applied when a quantile does not exceed its predecessor.
const QUANTILE_EPSILON: f64 = 1e-6;
/// Floor added to the MAD so a constant sample still has a scale.
const MAD_EPSILON: f64 = 1e-9;

pub const DEFAULT_LEVEL_MFS: LevelMfs = LevelMfs {
    low: MembershipFunction::new(0.0, 0.0, 7.5, 12.5),
    medium: MembershipFunction::new(10.0, 15.0, 22.5, 30.0),
    high: MembershipFunction::new(20.0, 27.5, 100.0, 100.0),
};

pub const DEFAULT_TREND_MFS: TrendMfs = TrendMfs {
    falling: MembershipFunction::new(-100.0, -4.0, -2.0, -0.5),
    stable: MembershipFunction::new(-1.5, -1.0, 1.0, 1.5),
    rising: MembershipFunction::new(0.5, 2.0, 4.0, 100.0),
};

/// All six trapezoids plus the year range they were fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSet {
    #[serde(default, deserialize_with = "lenient_year_range")]
    pub source_years: Option<[i32; 2]>,
    pub level_mfs: LevelMfs,
    pub trend_mfs: TrendMfs,
}

impl Default for CalibrationSet {
    fn default() -> Self {
        Self {
            source_years: None,
            level_mfs: DEFAULT_LEVEL_MFS,
            trend_mfs: DEFAULT_TREND_MFS,
        }
    }
}

fn lenient_year_range<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<[i32; 2]>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value::<[i32; 2]>(value).ok())
}

fn finite(samples: &[f64]) -> Vec<f64> {
    samples.iter().copied().filter(|x| x.is_finite()).collect()
}

/// Linear-interpolation quantile of an ascending slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// `value` if it exceeds `floor`, otherwise `floor` plus a tiny epsilon.
fn above(value: f64, floor: f64) -> f64 {
    if value > floor {
        value
    } else {
        floor + QUANTILE_EPSILON
    }
}

/// Fit low/medium/high on the 10/30/50/70/90th percentiles of shares.
pub fn calibrate_level_mfs_from_quantiles(share_pcts: &[f64]) -> LevelMfs {
    let mut s = finite(share_pcts);
    if s.len() < MIN_CALIBRATION_SAMPLES {
        return DEFAULT_LEVEL_MFS;
    }
    s.sort_by(|a, b| a.total_cmp(b));
    let [q10, q30, q50, q70, q90] = [0.10, 0.30, 0.50, 0.70, 0.90].map(|q| quantile(&s, q));

    let q30_up = above(q30, q10);
    let q50_up = above(q50, q30);
    let q70_up = above(q70, q50);

    LevelMfs {
        low: MembershipFunction::new(0.0, 0.0, q10, q30_up),
        medium: MembershipFunction::new(q10, q30_up, q50_up, q70_up),
        high: MembershipFunction::new(q50, q70_up, q90, 100.0),
    }
}

/// Median absolute deviation from the median, floored by a tiny epsilon.
/// An empty sample has scale `1.0`.
pub fn mad(samples: &[f64]) -> f64 {
    let x = finite(samples);
    let Some(m) = median(&x) else {
        return 1.0;
    };
    let deviations: Vec<f64> = x.iter().map(|v| (v - m).abs()).collect();
    median(&deviations).unwrap_or(0.0) + MAD_EPSILON
}

/// Fit falling/stable/rising around the median slope with MAD scale.
pub fn calibrate_trend_mfs_from_mad(slopes_pct_of_mean: &[f64]) -> TrendMfs {
    calibrate_trend_mfs_with(slopes_pct_of_mean, 1.0, 2.0)
}

/// Same as [`calibrate_trend_mfs_from_mad`] with explicit scale factors.
pub fn calibrate_trend_mfs_with(
    slopes_pct_of_mean: &[f64],
    k_stable: f64,
    k_rise: f64,
) -> TrendMfs {
    let x = finite(slopes_pct_of_mean);
    if x.len() < MIN_CALIBRATION_SAMPLES {
        return DEFAULT_TREND_MFS;
    }
    let m = median(&x).unwrap_or(0.0);
    let s = mad(&x);

    let fall_start = m - k_stable * s;
    let rise_start = m + k_stable * s;
    let fall_full = m - k_rise * s;
    let rise_full = m + k_rise * s;

    TrendMfs {
        falling: MembershipFunction::new(-100.0, fall_full, fall_start, m),
        // Outer corners use the rise factor on both sides
        stable: MembershipFunction::new(m - k_rise * s, fall_start, rise_start, m + k_rise * s),
        rising: MembershipFunction::new(m, rise_start, rise_full, 100.0),
    }
}

/// Flat list of every row's share of its yearly total.
pub fn compute_share_distribution(dataset: &BudgetDataset, spending_only: bool) -> Vec<f64> {
    dataset
        .shares(spending_only)
        .into_iter()
        .map(|row| row.share_pct)
        .collect()
}

/// Slope relative to the mean level, in percent. Zero mean gives zero.
pub fn slope_pct_of_mean(slope: f64, shares: &[f64]) -> f64 {
    if shares.is_empty() {
        return 0.0;
    }
    let mean = shares.iter().sum::<f64>() / shares.len() as f64;
    if mean == 0.0 {
        0.0
    } else {
        slope / mean * 100.0
    }
}

/// One percent-of-mean slope per department with at least two yearly points.
pub fn compute_trend_distribution(dataset: &BudgetDataset, spending_only: bool) -> Vec<f64> {
    dataset
        .department_series(spending_only)
        .values()
        .filter(|points| points.len() >= 2)
        .map(|points| {
            let (years, shares): (Vec<i32>, Vec<f64>) = points.iter().copied().unzip();
            slope_pct_of_mean(theil_sen_slope(&years, &shares), &shares)
        })
        .collect()
}

/// Fit a full calibration set on a reference dataset.
pub fn compute_calibration(reference: &BudgetDataset, spending_only: bool) -> CalibrationSet {
    let share_samples = compute_share_distribution(reference, spending_only);
    let trend_samples = compute_trend_distribution(reference, spending_only);
    debug!(
        "Calibrating on {} share samples and {} trend samples",
        share_samples.len(),
        trend_samples.len()
    );
    CalibrationSet {
        source_years: reference.year_range().map(|(lo, hi)| [lo, hi]),
        level_mfs: calibrate_level_mfs_from_quantiles(&share_samples),
        trend_mfs: calibrate_trend_mfs_from_mad(&trend_samples),
    }
}

/// Persist a calibration set as pretty JSON, creating parent directories.
pub fn save_calibration(path: &Path, calibration: &CalibrationSet) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let payload = serde_json::to_string_pretty(calibration)?;
    fs::write(path, payload)?;
    info!("Saved calibration to {}", path.display());
    Ok(())
}

/// Load a persisted calibration set.
///
/// Returns `None` when the file is missing, unreadable, or does not carry
/// exactly the six labelled four-number trapezoids.
pub fn load_calibration(path: &Path) -> Option<CalibrationSet> {
    if !path.exists() {
        debug!("No calibration file at {}", path.display());
        return None;
    }
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Cannot read calibration file {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str::<CalibrationSet>(&content) {
        Ok(calibration) => Some(calibration),
        Err(e) => {
            warn!("Ignoring invalid calibration file {}: {}", path.display(), e);
            None
        }
    }
}

/// Holds the active calibration for the lifetime of its owner.
///
/// The active set is resolved once (memory, then file, then reference
/// data, then defaults) and reused until [`CalibrationStore::recompute`]
/// or [`CalibrationStore::reset`].
#[derive(Debug, Clone)]
pub struct CalibrationStore {
    path: Option<PathBuf>,
    spending_only: bool,
    active: Option<CalibrationSet>,
}

impl CalibrationStore {
    /// Store backed by a calibration file.
    pub fn new(path: impl Into<PathBuf>, spending_only: bool) -> Self {
        Self {
            path: Some(path.into()),
            spending_only,
            active: None,
        }
    }

    /// Store that never touches the filesystem.
    pub fn in_memory(spending_only: bool) -> Self {
        Self {
            path: None,
            spending_only,
            active: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn active(&self) -> Option<&CalibrationSet> {
        self.active.as_ref()
    }

    /// Forget the active calibration. The persisted file is left alone.
    pub fn reset(&mut self) {
        self.active = None;
    }

    /// The active calibration, resolving it on first use.
    pub fn ensure(&mut self, reference: Option<&BudgetDataset>) -> &CalibrationSet {
        if self.active.is_none() {
            let resolved = self.resolve(reference);
            self.active = Some(resolved);
        }
        self.active.get_or_insert_with(CalibrationSet::default)
    }

    fn resolve(&self, reference: Option<&BudgetDataset>) -> CalibrationSet {
        if let Some(loaded) = self.path.as_deref().and_then(load_calibration) {
            info!("Using persisted calibration");
            return loaded;
        }
        let Some(reference) = reference.filter(|r| !r.is_empty()) else {
            info!("No reference data, using default membership functions");
            return CalibrationSet::default();
        };
        let calibration = compute_calibration(reference, self.spending_only);
        if let Some(path) = self.path.as_deref() {
            if let Err(e) = save_calibration(path, &calibration) {
                warn!("Calibration computed but not persisted: {}", e);
            }
        }
        calibration
    }

    /// Refit on `reference`, overwrite the persisted file and activate the result.
    pub fn recompute(&mut self, reference: &BudgetDataset) -> Result<&CalibrationSet> {
        let calibration = compute_calibration(reference, self.spending_only);
        if let Some(path) = self.path.as_deref() {
            save_calibration(path, &calibration)?;
        }
        info!("Recomputed calibration for years {:?}", calibration.source_years);
        Ok(&*self.active.insert(calibration))
    }
}
