//! Citywide comparison intent.
//!
//! Detects questions about the whole budget ("who are the winners",
//! "wo steigen die Ausgaben") rather than a single topic.

use regex::Regex;
use std::sync::LazyLock;

static CITYWIDE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // English
        Regex::new(r"\bacross\b.*\bcity\b").expect("Invalid regex: across city"),
        Regex::new(r"\b(whole city|city budget)\b").expect("Invalid regex: whole city"),
        Regex::new(r"\b(spending more|more on)\b").expect("Invalid regex: spending more"),
        Regex::new(r"\bbiggest (increase|decreases?)\b").expect("Invalid regex: biggest change"),
        Regex::new(r"\b(winners|losers|movers?|shift)\b").expect("Invalid regex: movers"),
        // German
        Regex::new(r"\b(wo steigen|am staerksten|verlieren am meisten)\b")
            .expect("Invalid regex: German comparison phrases"),
    ]
});

/// True when normalized text asks for a cross-department comparison.
pub fn detect_citywide_intent(t_norm: &str) -> bool {
    CITYWIDE_PATTERNS.iter().any(|p| p.is_match(t_norm))
}
