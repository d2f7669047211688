//! Verbosity detection (EN + DE).
//!
//! Brief markers win over detail markers. Patterns run on normalized text,
//! so umlaut spellings are already folded to digraphs.

use regex::Regex;
use std::sync::LazyLock;

use super::request::Verbosity;

// NOTE: expect() is acceptable here, the patterns are compile-time constants
static BRIEF_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"\b(brief|short|quick)\b").expect("Invalid regex: English brief words"),
        Regex::new(r"\b(kurz|kurze|uebersicht)\b").expect("Invalid regex: German brief words"),
    ]
});

static DETAIL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"\b(detailed|details|detail|breakdown|explain)\b")
            .expect("Invalid regex: English detail words"),
        Regex::new(r"\b(ausfuehrlich|erklaer(en)?)\b").expect("Invalid regex: German detail words"),
        // Asking for winners and losers implies a full ranking
        Regex::new(r"\b(winners|losers)\b").expect("Invalid regex: ranking words"),
    ]
});

/// Classify the requested level of detail of normalized text.
pub fn parse_verbosity(t_norm: &str) -> Verbosity {
    if BRIEF_PATTERNS.iter().any(|p| p.is_match(t_norm)) {
        return Verbosity::Brief;
    }
    if DETAIL_PATTERNS.iter().any(|p| p.is_match(t_norm)) {
        return Verbosity::Detailed;
    }
    Verbosity::Normal
}
