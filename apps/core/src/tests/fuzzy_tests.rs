//! Fuzzy Module Tests
//!
//! Membership properties, calibration over a fixture dataset and the
//! lifecycle of the persisted calibration file.

use std::fs;

use tempfile::TempDir;

use super::fixtures::{mixed_coverage_dataset, zurich_like_dataset};
use crate::fuzzy::calibration::{
    calibrate_trend_mfs_from_mad, compute_calibration, compute_trend_distribution,
    load_calibration, save_calibration, CalibrationStore, DEFAULT_LEVEL_MFS, DEFAULT_TREND_MFS,
};
use crate::fuzzy::{
    label_level, label_trend, CalibrationSet, LevelLabel, MembershipFunction, TrendLabel,
};
use crate::models::BudgetDataset;

fn assert_same_functions(left: &CalibrationSet, right: &CalibrationSet) {
    let pairs = [
        (left.level_mfs.low, right.level_mfs.low),
        (left.level_mfs.medium, right.level_mfs.medium),
        (left.level_mfs.high, right.level_mfs.high),
        (left.trend_mfs.falling, right.trend_mfs.falling),
        (left.trend_mfs.stable, right.trend_mfs.stable),
        (left.trend_mfs.rising, right.trend_mfs.rising),
    ];
    for (l, r) in pairs {
        for (x, y) in l.breakpoints().into_iter().zip(r.breakpoints()) {
            assert!((x - y).abs() < 1e-9, "{:?} != {:?}", l, r);
        }
    }
}

const VALID_DOCUMENT: &str = r#"{
    "source_years": [2019, 2024],
    "level_mfs": {"low": [0, 0, 5, 10], "medium": [5, 10, 15, 20], "high": [15, 20, 100, 100]},
    "trend_mfs": {"falling": [-100, -5, -3, -1], "stable": [-2, -1, 1, 2], "rising": [1, 3, 5, 100]}
}"#;

#[cfg(test)]
mod membership_tests {
    use super::*;

    fn sample_points() -> Vec<f64> {
        (-60..=60).map(|i| i as f64 * 2.5).collect()
    }

    #[test]
    fn test_degrees_stay_in_unit_interval() {
        let trapezoids = [
            MembershipFunction::new(0.0, 0.0, 7.5, 12.5),
            MembershipFunction::new(10.0, 15.0, 22.5, 30.0),
            MembershipFunction::new(20.0, 27.5, 100.0, 100.0),
            MembershipFunction::new(-1.5, -1.0, 1.0, 1.5),
            MembershipFunction::new(3.0, 3.0, 3.0, 3.0),
        ];
        for mf in trapezoids {
            for x in sample_points() {
                let mu = mf.membership(x);
                assert!((0.0..=1.0).contains(&mu), "{:?} at {} gave {}", mf, x, mu);
            }
        }
    }

    #[test]
    fn test_ramps_are_monotone() {
        let mf = MembershipFunction::new(10.0, 15.0, 22.5, 30.0);
        let rising: Vec<f64> = (0..=30)
            .map(|i| mf.membership(10.0 + i as f64 * 5.0 / 30.0))
            .collect();
        assert!(rising.windows(2).all(|w| w[0] <= w[1]));

        let falling: Vec<f64> = (0..=30)
            .map(|i| mf.membership(22.5 + i as f64 * 7.5 / 30.0))
            .collect();
        assert!(falling.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_labels_for_default_functions() {
        let labels: Vec<LevelLabel> = [2.0, 18.0, 60.0]
            .iter()
            .map(|x| label_level(*x, &DEFAULT_LEVEL_MFS).label)
            .collect();
        assert_eq!(labels, vec![LevelLabel::Low, LevelLabel::Medium, LevelLabel::High]);

        let labels: Vec<TrendLabel> = [-10.0, 0.0, 3.0]
            .iter()
            .map(|x| label_trend(*x, &DEFAULT_TREND_MFS).label)
            .collect();
        assert_eq!(labels, vec![TrendLabel::Falling, TrendLabel::Stable, TrendLabel::Rising]);
    }

    #[test]
    fn test_label_degree_in_unit_interval() {
        for x in [-500.0, -1.2, 0.7, 12.0, 26.0, 250.0, f64::NAN] {
            let level = label_level(x, &DEFAULT_LEVEL_MFS);
            let trend = label_trend(x, &DEFAULT_TREND_MFS);
            assert!((0.0..=1.0).contains(&level.degree), "level degree at {}", x);
            assert!((0.0..=1.0).contains(&trend.degree), "trend degree at {}", x);
        }
    }
}

#[cfg(test)]
mod calibration_tests {
    use super::*;

    #[test]
    fn test_fixture_calibration_is_ordered() {
        let calibration = compute_calibration(&zurich_like_dataset(), true);
        assert_eq!(calibration.source_years, Some([2019, 2024]));

        for mf in [
            calibration.level_mfs.low,
            calibration.level_mfs.medium,
            calibration.level_mfs.high,
        ] {
            let [a, b, c, d] = mf.breakpoints();
            assert!(a <= b && b <= c && c <= d, "unordered trapezoid {:?}", mf);
        }
        assert_eq!(calibration.level_mfs.low.breakpoints()[0], 0.0);
        assert_eq!(calibration.level_mfs.high.breakpoints()[3], 100.0);
    }

    #[test]
    fn test_too_few_departments_keep_default_trend() {
        // Four spending departments give four slopes
        let calibration = compute_calibration(&zurich_like_dataset(), true);
        assert_eq!(calibration.trend_mfs, DEFAULT_TREND_MFS);
        assert_ne!(calibration.level_mfs, DEFAULT_LEVEL_MFS);
    }

    #[test]
    fn test_trend_distribution_is_percent_of_mean() {
        // Solo has one year and is skipped, Zero has a zero mean
        let samples = compute_trend_distribution(&mixed_coverage_dataset(), false);
        let expected = [3.184878, -5.818354, -11.001789, 10.736391, -16.736445, 0.0];
        assert_eq!(samples.len(), expected.len());
        for (sample, want) in samples.iter().zip(expected) {
            assert!((sample - want).abs() < 1e-5, "{} != {}", sample, want);
        }
    }

    #[test]
    fn test_spending_only_drops_zero_rows_from_trend() {
        let samples = compute_trend_distribution(&mixed_coverage_dataset(), true);
        assert_eq!(samples.len(), 5);
        assert!(samples.iter().all(|s| *s != 0.0));
    }

    #[test]
    fn test_enough_departments_fit_trend() {
        let dataset = mixed_coverage_dataset();
        let samples = compute_trend_distribution(&dataset, false);
        let calibration = compute_calibration(&dataset, false);

        assert_eq!(calibration.trend_mfs, calibrate_trend_mfs_from_mad(&samples));
        assert_ne!(calibration.trend_mfs, DEFAULT_TREND_MFS);
        assert_eq!(calibration.source_years, Some([2020, 2022]));

        // Centred on the median slope with MAD scale
        let median = -2.909177;
        let scale = 7.093334;
        let [_, b, c, d] = calibration.trend_mfs.falling.breakpoints();
        assert!((d - median).abs() < 1e-5);
        assert!((c - (median - scale)).abs() < 1e-5);
        assert!((b - (median - 2.0 * scale)).abs() < 1e-5);
        assert_eq!(calibration.trend_mfs.rising.breakpoints()[3], 100.0);
    }

    #[test]
    fn test_empty_reference_gives_defaults() {
        let calibration = compute_calibration(&BudgetDataset::default(), true);
        assert_eq!(calibration.level_mfs, DEFAULT_LEVEL_MFS);
        assert_eq!(calibration.trend_mfs, DEFAULT_TREND_MFS);
    }
}

#[cfg(test)]
mod persistence_tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("label_calibration.json");
        let calibration = compute_calibration(&zurich_like_dataset(), true);

        save_calibration(&path, &calibration).unwrap();
        let loaded = load_calibration(&path).expect("calibration should load");
        assert_same_functions(&loaded, &calibration);
        assert_eq!(loaded.source_years, Some([2019, 2024]));
    }

    #[test]
    fn test_persisted_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("label_calibration.json");
        save_calibration(&path, &CalibrationSet::default()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["level_mfs"]["medium"], serde_json::json!([10.0, 15.0, 22.5, 30.0]));
        assert_eq!(value["trend_mfs"]["stable"], serde_json::json!([-1.5, -1.0, 1.0, 1.5]));
        assert!(value["source_years"].is_null());
    }

    #[test]
    fn test_valid_document_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("label_calibration.json");
        fs::write(&path, VALID_DOCUMENT).unwrap();

        let loaded = load_calibration(&path).unwrap();
        assert_eq!(loaded.level_mfs.low, MembershipFunction::new(0.0, 0.0, 5.0, 10.0));
        assert_eq!(loaded.trend_mfs.rising, MembershipFunction::new(1.0, 3.0, 5.0, 100.0));
    }

    #[test]
    fn test_invalid_documents_are_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("label_calibration.json");

        let documents = vec![
            "not json at all".to_string(),
            "[]".to_string(),
            r#"{"level_mfs": {"low": [0, 0, 5, 10], "medium": [5, 10, 15, 20], "high": [15, 20, 100, 100]}}"#
                .to_string(),
            VALID_DOCUMENT.replace(r#""medium": [5, 10, 15, 20]"#, r#""medium": [5, 10, 15]"#),
            VALID_DOCUMENT.replace(
                r#""high": [15, 20, 100, 100]"#,
                r#""high": [15, 20, "x", 100]"#,
            ),
            VALID_DOCUMENT.replace(r#""falling""#, r#""dropping""#),
            VALID_DOCUMENT.replace(
                r#""rising": [1, 3, 5, 100]"#,
                r#""rising": [1, 3, 5, 100], "soaring": [5, 6, 7, 8]"#,
            ),
        ];

        for document in documents {
            fs::write(&path, &document).unwrap();
            assert!(load_calibration(&path).is_none(), "accepted: {}", document);
        }
    }

    #[test]
    fn test_missing_file_is_absent() {
        let dir = TempDir::new().unwrap();
        assert!(load_calibration(&dir.path().join("missing.json")).is_none());
    }

    #[test]
    fn test_bad_source_years_are_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("label_calibration.json");
        fs::write(&path, VALID_DOCUMENT.replace("[2019, 2024]", r#""2019-2024""#)).unwrap();

        let loaded = load_calibration(&path).unwrap();
        assert_eq!(loaded.source_years, None);
    }
}

#[cfg(test)]
mod store_tests {
    use super::*;

    #[test]
    fn test_ensure_fits_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("label_calibration.json");
        let mut store = CalibrationStore::new(&path, true);
        let dataset = zurich_like_dataset();

        let active = *store.ensure(Some(&dataset));
        assert_eq!(active.source_years, Some([2019, 2024]));
        assert!(path.exists());
        assert_same_functions(&load_calibration(&path).unwrap(), &active);
    }

    #[test]
    fn test_persisted_file_wins_over_reference() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("label_calibration.json");
        fs::write(&path, VALID_DOCUMENT).unwrap();

        let mut store = CalibrationStore::new(&path, true);
        let active = store.ensure(Some(&zurich_like_dataset()));
        assert_eq!(active.level_mfs.low, MembershipFunction::new(0.0, 0.0, 5.0, 10.0));
    }

    #[test]
    fn test_no_file_no_reference_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("label_calibration.json");
        let mut store = CalibrationStore::new(&path, true);

        assert_eq!(*store.ensure(None), CalibrationSet::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_active_is_kept_until_reset() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("label_calibration.json");
        let mut store = CalibrationStore::new(&path, true);

        assert_eq!(*store.ensure(None), CalibrationSet::default());
        fs::write(&path, VALID_DOCUMENT).unwrap();
        assert_eq!(*store.ensure(None), CalibrationSet::default());

        store.reset();
        assert!(store.active().is_none());
        assert_eq!(
            store.ensure(None).level_mfs.low,
            MembershipFunction::new(0.0, 0.0, 5.0, 10.0)
        );
    }

    #[test]
    fn test_recompute_overwrites_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("label_calibration.json");
        fs::write(&path, VALID_DOCUMENT).unwrap();
        let mut store = CalibrationStore::new(&path, true);
        let dataset = zurich_like_dataset();

        let fresh = *store.recompute(&dataset).unwrap();
        assert_eq!(fresh, compute_calibration(&dataset, true));
        assert_same_functions(&load_calibration(&path).unwrap(), &fresh);
        assert_eq!(store.active(), Some(&fresh));
    }

    #[test]
    fn test_in_memory_store_never_writes() {
        let mut store = CalibrationStore::in_memory(true);
        let dataset = zurich_like_dataset();
        assert!(store.path().is_none());
        assert_eq!(store.ensure(Some(&dataset)).source_years, Some([2019, 2024]));
        assert!(store.recompute(&dataset).is_ok());
    }
}
