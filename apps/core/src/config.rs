//! Runtime settings.
//!
//! Defaults mirror the Zurich budget deployment. Every value can be
//! overridden through the environment (or a `.env` file).

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::info;
use validator::Validate;

const ENV_CALIBRATION_PATH: &str = "BUDGET_CALIBRATION_PATH";
const ENV_FIRST_YEAR: &str = "BUDGET_FIRST_YEAR";
const ENV_LAST_YEAR: &str = "BUDGET_LAST_YEAR";
const ENV_SPENDING_ONLY: &str = "BUDGET_SPENDING_ONLY";

/// Settings shared by the parser, calibrator and summarizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Settings {
    /// Where the fitted membership functions are persisted.
    pub calibration_path: PathBuf,
    /// First budget year the dataset covers.
    #[validate(range(min = 1900, max = 2099))]
    pub first_year: i32,
    /// Last budget year the dataset covers (inclusive).
    #[validate(range(min = 1900, max = 2099))]
    pub last_year: i32,
    /// Restrict share computations to positive amounts (spending).
    pub spending_only: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            calibration_path: PathBuf::from("data").join("label_calibration.json"),
            first_year: 2019,
            last_year: 2024,
            spending_only: true,
        }
    }
}

impl Settings {
    /// Load settings from the environment, falling back to defaults per key.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut settings = Settings::default();
        if let Ok(path) = env::var(ENV_CALIBRATION_PATH) {
            if !path.trim().is_empty() {
                settings.calibration_path = PathBuf::from(path);
            }
        }
        if let Some(year) = read_var::<i32>(ENV_FIRST_YEAR)? {
            settings.first_year = year;
        }
        if let Some(year) = read_var::<i32>(ENV_LAST_YEAR)? {
            settings.last_year = year;
        }
        if let Some(flag) = read_var::<bool>(ENV_SPENDING_ONLY)? {
            settings.spending_only = flag;
        }

        settings.check()?;
        info!(
            "Settings loaded: years {}-{}, calibration at {}",
            settings.first_year,
            settings.last_year,
            settings.calibration_path.display()
        );
        Ok(settings)
    }

    /// Validate field ranges and cross-field constraints.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if self.first_year > self.last_year {
            return Err(AppError::Config(format!(
                "first year {} is after last year {}",
                self.first_year, self.last_year
            )));
        }
        Ok(())
    }

    /// Ascending list of budget years available to the parser.
    pub fn available_years(&self) -> Vec<i32> {
        (self.first_year..=self.last_year).collect()
    }
}

fn read_var<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {:?}", key, raw))),
        _ => Ok(None),
    }
}
