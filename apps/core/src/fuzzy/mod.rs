//! # Fuzzy Module
//!
//! Linguistic labels for department spending.
//!
//! ## Components
//! - `membership`: trapezoids and the level/trend labelers
//! - `trend`: Theil-Sen slope estimator
//! - `calibration`: fitting trapezoids to the data, persistence, calibration store

pub mod calibration;
pub mod membership;
pub mod trend;

pub use calibration::{CalibrationSet, CalibrationStore, DEFAULT_LEVEL_MFS, DEFAULT_TREND_MFS};
pub use membership::{
    label_level, label_trend, Labeled, LevelLabel, LevelMfs, MembershipFunction, TrendLabel,
    TrendMfs,
};
pub use trend::theil_sen_slope;
