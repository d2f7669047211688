//! Trapezoidal membership functions and fuzzy labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trapezoid `[a, b, c, d]` with `a <= b <= c <= d`.
///
/// Serialized as a plain four-number array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct MembershipFunction {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl From<[f64; 4]> for MembershipFunction {
    fn from([a, b, c, d]: [f64; 4]) -> Self {
        Self { a, b, c, d }
    }
}

impl From<MembershipFunction> for [f64; 4] {
    fn from(mf: MembershipFunction) -> Self {
        mf.breakpoints()
    }
}

impl MembershipFunction {
    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    pub fn breakpoints(&self) -> [f64; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// Degree of membership of `x`, in `[0, 1]`.
    pub fn membership(&self, x: f64) -> f64 {
        let Self { a, b, c, d } = *self;
        if x <= a || x >= d {
            return 0.0;
        }
        if b <= x && x <= c {
            return 1.0;
        }
        if a < x && x < b {
            return (x - a) / (b - a);
        }
        if c < x && x < d {
            return (d - x) / (d - c);
        }
        0.0
    }
}

/// Share level label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelLabel {
    Low,
    Medium,
    High,
}

impl LevelLabel {
    /// Evaluation order; on equal membership the earlier label wins.
    pub const ALL: [LevelLabel; 3] = [LevelLabel::Low, LevelLabel::Medium, LevelLabel::High];

    pub fn label(&self) -> &'static str {
        match self {
            LevelLabel::Low => "low",
            LevelLabel::Medium => "medium",
            LevelLabel::High => "high",
        }
    }
}

impl fmt::Display for LevelLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Share trend label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendLabel {
    Falling,
    Stable,
    Rising,
}

impl TrendLabel {
    /// Evaluation order; on equal membership the earlier label wins.
    pub const ALL: [TrendLabel; 3] = [TrendLabel::Falling, TrendLabel::Stable, TrendLabel::Rising];

    pub fn label(&self) -> &'static str {
        match self {
            TrendLabel::Falling => "falling",
            TrendLabel::Stable => "stable",
            TrendLabel::Rising => "rising",
        }
    }
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The three level trapezoids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelMfs {
    pub low: MembershipFunction,
    pub medium: MembershipFunction,
    pub high: MembershipFunction,
}

impl LevelMfs {
    pub fn get(&self, label: LevelLabel) -> &MembershipFunction {
        match label {
            LevelLabel::Low => &self.low,
            LevelLabel::Medium => &self.medium,
            LevelLabel::High => &self.high,
        }
    }
}

/// The three trend trapezoids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrendMfs {
    pub falling: MembershipFunction,
    pub stable: MembershipFunction,
    pub rising: MembershipFunction,
}

impl TrendMfs {
    pub fn get(&self, label: TrendLabel) -> &MembershipFunction {
        match label {
            TrendLabel::Falling => &self.falling,
            TrendLabel::Stable => &self.stable,
            TrendLabel::Rising => &self.rising,
        }
    }
}

/// Best label for a value and its membership degree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Labeled<L> {
    pub label: L,
    pub degree: f64,
}

fn best_of<L: Copy>(labels: &[L], degree: impl Fn(L) -> f64) -> Labeled<L> {
    let mut best = Labeled {
        label: labels[0],
        degree: degree(labels[0]),
    };
    for &label in &labels[1..] {
        let mu = degree(label);
        if mu > best.degree {
            best = Labeled { label, degree: mu };
        }
    }
    best
}

/// Label a share percentage as low/medium/high.
pub fn label_level(share_pct: f64, mfs: &LevelMfs) -> Labeled<LevelLabel> {
    best_of(&LevelLabel::ALL, |label| mfs.get(label).membership(share_pct))
}

/// Label a percent-of-mean slope as falling/stable/rising.
pub fn label_trend(slope_pct_of_mean: f64, mfs: &TrendMfs) -> Labeled<TrendLabel> {
    best_of(&TrendLabel::ALL, |label| mfs.get(label).membership(slope_pct_of_mean))
}
