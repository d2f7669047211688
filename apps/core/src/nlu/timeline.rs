//! Timeline extraction.
//!
//! Resolution order, first match wins:
//! 1. "since/from" + an explicit year: earliest year mentioned
//! 2. "last N years": overrides 1, anchored on the latest available year
//! 3. two or more distinct years: the smallest one
//! 4. a recency word ("recently", "kürzlich"): the last three available years
//! 5. otherwise unrestricted

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use super::request::Timeline;

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").expect("Invalid regex: year pattern"));

static SINCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(since|seit|from)\b").expect("Invalid regex: since pattern"));

static LAST_N_YEARS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(last|letzte|letzten)\s+(\d{1,2})\s+(years|jahre)\b")
        .expect("Invalid regex: last n years pattern")
});

static RECENT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"\b(recently|lately|recent)\b").expect("Invalid regex: English recency words"),
        Regex::new(r"\b(kuerzlich|in letzter zeit)\b")
            .expect("Invalid regex: German recency words"),
    ]
});

/// Width of the window opened by a recency word.
const RECENT_WINDOW_YEARS: i32 = 3;

/// Result of timeline extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineResult {
    pub timeline: Timeline,
    pub since: Option<i32>,
}

/// All distinct years mentioned in normalized text, ascending.
pub fn extract_years(t_norm: &str) -> Vec<i32> {
    YEAR_PATTERN
        .find_iter(t_norm)
        .filter_map(|m| m.as_str().parse::<i32>().ok())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Resolve the time window of normalized text.
///
/// `years_available` must be ascending. `allow_recent_window` is turned off
/// by the caller when a citywide comparison was asked for.
pub fn parse_timeline(
    t_norm: &str,
    years_available: &[i32],
    allow_recent_window: bool,
) -> TimelineResult {
    let years = extract_years(t_norm);
    let bounds = years_available
        .iter()
        .min()
        .zip(years_available.iter().max())
        .map(|(lo, hi)| (*lo, *hi));

    let mut since = None;

    if SINCE_PATTERN.is_match(t_norm) {
        since = years.first().copied();
    }

    if let (Some(caps), Some((first, last))) = (LAST_N_YEARS_PATTERN.captures(t_norm), bounds) {
        if let Some(n) = caps.get(2).and_then(|m| m.as_str().parse::<i32>().ok()) {
            since = Some(first.max(last - (n - 1)));
        }
    }

    if since.is_none() && years.len() >= 2 {
        since = years.first().copied();
    }

    if since.is_none() && allow_recent_window {
        if let Some((first, last)) = bounds {
            if RECENT_PATTERNS.iter().any(|p| p.is_match(t_norm)) {
                since = Some(first.max(last - (RECENT_WINDOW_YEARS - 1)));
            }
        }
    }

    TimelineResult {
        timeline: Timeline::from_start(since),
        since,
    }
}
