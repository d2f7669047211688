use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One row of yearly department spending, as delivered by the data loader.
///
/// Field aliases accept the German column names of the Zurich open data export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRecord {
    /// Numeric department key of the source system.
    #[serde(alias = "departement_key")]
    pub department_key: i64,
    /// Official department name.
    #[serde(alias = "departement_name")]
    pub department_name: String,
    /// Budget year.
    #[serde(alias = "jahr")]
    pub year: i32,
    /// Signed amount; positive values are spending.
    #[serde(alias = "betrag")]
    pub amount: f64,
}

impl BudgetRecord {
    pub fn new(department_key: i64, department_name: &str, year: i32, amount: f64) -> Self {
        Self {
            department_key,
            department_name: department_name.to_string(),
            year,
            amount,
        }
    }
}

/// A department's share of the citywide total for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareRow {
    pub department: String,
    pub year: i32,
    pub share_pct: f64,
}

/// Read-only view over budget rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetDataset {
    records: Vec<BudgetRecord>,
}

impl BudgetDataset {
    pub fn new(records: Vec<BudgetRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[BudgetRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows with `year >= start`.
    pub fn since(&self, start: i32) -> BudgetDataset {
        Self::new(
            self.records
                .iter()
                .filter(|r| r.year >= start)
                .cloned()
                .collect(),
        )
    }

    /// `(min, max)` year over all rows.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some((min, max))
    }

    /// Share of the yearly total for every row, in row order.
    ///
    /// With `spending_only` the negative and zero rows are dropped before
    /// the yearly totals are formed. A year whose total is zero yields
    /// shares of zero.
    pub fn shares(&self, spending_only: bool) -> Vec<ShareRow> {
        let rows: Vec<&BudgetRecord> = self
            .records
            .iter()
            .filter(|r| !spending_only || r.amount > 0.0)
            .collect();

        let mut totals: HashMap<i32, f64> = HashMap::new();
        for r in &rows {
            *totals.entry(r.year).or_insert(0.0) += r.amount;
        }

        rows.into_iter()
            .map(|r| {
                let total = totals.get(&r.year).copied().unwrap_or(0.0);
                let share_pct = if total == 0.0 { 0.0 } else { r.amount / total * 100.0 };
                ShareRow {
                    department: r.department_name.clone(),
                    year: r.year,
                    share_pct,
                }
            })
            .collect()
    }

    /// Per-department `(year, share)` series sorted by year, departments in
    /// name order.
    pub fn department_series(&self, spending_only: bool) -> BTreeMap<String, Vec<(i32, f64)>> {
        let mut series: BTreeMap<String, Vec<(i32, f64)>> = BTreeMap::new();
        for row in self.shares(spending_only) {
            series
                .entry(row.department)
                .or_default()
                .push((row.year, row.share_pct));
        }
        for points in series.values_mut() {
            points.sort_by_key(|(year, _)| *year);
        }
        series
    }
}

impl From<Vec<BudgetRecord>> for BudgetDataset {
    fn from(records: Vec<BudgetRecord>) -> Self {
        Self::new(records)
    }
}
