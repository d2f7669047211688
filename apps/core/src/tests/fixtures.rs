//! Shared test data.

use crate::models::{BudgetDataset, BudgetRecord};

pub const EDUCATION: &str = "Schul- und Sportdepartement";
pub const FINANCE: &str = "Finanzdepartement";
pub const SECURITY: &str = "Sicherheitsdepartement";
pub const HOUSING: &str = "Hochbaudepartement";
pub const ADMINISTRATION: &str = "Behörden und Gesamtverwaltung";

/// Six years of four spending departments plus one revenue-only department.
///
/// Education grows steadily, finance shrinks, security is flat in amount
/// and housing wobbles.
pub fn zurich_like_dataset() -> BudgetDataset {
    let series: [(i64, &str, [f64; 6]); 5] = [
        (1, EDUCATION, [300.0, 310.0, 330.0, 350.0, 370.0, 400.0]),
        (2, FINANCE, [200.0, 195.0, 190.0, 180.0, 175.0, 170.0]),
        (3, SECURITY, [150.0; 6]),
        (4, HOUSING, [100.0, 102.0, 101.0, 103.0, 102.0, 104.0]),
        (5, ADMINISTRATION, [-20.0; 6]),
    ];
    let mut records = Vec::new();
    for (key, name, amounts) in series {
        for (offset, amount) in amounts.into_iter().enumerate() {
            records.push(BudgetRecord::new(key, name, 2019 + offset as i32, amount));
        }
    }
    BudgetDataset::new(records)
}

/// Seven departments over 2020-2022 with uneven coverage.
///
/// Five departments move at different rates, `Solo` has a single year and
/// `Zero` books nothing, so its mean share is zero.
pub fn mixed_coverage_dataset() -> BudgetDataset {
    let rows: [(i64, &str, &[(i32, f64)]); 7] = [
        (1, "Alpha", &[(2020, 100.0), (2021, 110.0), (2022, 120.0)]),
        (2, "Bravo", &[(2020, 100.0), (2021, 100.0), (2022, 100.0)]),
        (3, "Charlie", &[(2020, 100.0), (2021, 95.0), (2022, 90.0)]),
        (4, "Delta", &[(2020, 50.0), (2021, 60.0), (2022, 70.0)]),
        (5, "Echo", &[(2020, 50.0), (2021, 45.0), (2022, 40.0)]),
        (6, "Solo", &[(2022, 30.0)]),
        (7, "Zero", &[(2020, 0.0), (2021, 0.0), (2022, 0.0)]),
    ];
    let mut records = Vec::new();
    for (key, name, points) in rows {
        for &(year, amount) in points {
            records.push(BudgetRecord::new(key, name, year, amount));
        }
    }
    BudgetDataset::new(records)
}
