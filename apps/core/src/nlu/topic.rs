//! Topic classification.
//!
//! Two tiers:
//! 1. Direct match of an official department name (near certain)
//! 2. An ordered rule table of `(pattern, topic, score)`; a topic keeps the
//!    best score of its matching rules, close runner-ups make the answer
//!    ambiguous.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::normalize::{has_phrase, normalize};
use super::request::{TopicCandidate, ALL_TOPICS};
use crate::catalog::DepartmentCatalog;

/// Confidence of an unambiguous department-name match.
pub const DEPARTMENT_MATCH_CONFIDENCE: f64 = 0.99;
/// Confidence of a department-name match that needed disambiguation.
pub const SHARED_DEPARTMENT_CONFIDENCE: f64 = 0.90;
/// Confidence reported when no rule matched at all.
pub const NO_MATCH_CONFIDENCE: f64 = 0.20;
/// Upper bound of the confidence reported for an ambiguous result.
pub const AMBIGUOUS_CONFIDENCE_CAP: f64 = 0.40;
/// Runner-ups closer than this to the best topic make the result ambiguous.
pub const AMBIGUITY_MARGIN: f64 = 0.05;

/// Multi-word transport phrases checked before the table.
const TRANSPORT_PHRASES: &[&str] = &["public transport", "public transportation", "roads"];
const TRANSPORT_PHRASE_SCORE: f64 = 0.99;

/// Outcome of topic classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicResult {
    pub topic: String,
    pub confidence: f64,
    /// Every topic that scored, best first.
    pub candidates: Vec<TopicCandidate>,
}

impl TopicResult {
    fn single(topic: &str, confidence: f64) -> Self {
        Self {
            topic: topic.to_string(),
            confidence,
            candidates: vec![TopicCandidate::new(topic, confidence)],
        }
    }
}

/// One row of the rule table.
struct TopicRule {
    pattern: Regex,
    topic: &'static str,
    score: f64,
}

fn rule(pattern: &str, topic: &'static str, score: f64) -> TopicRule {
    TopicRule {
        pattern: Regex::new(pattern).expect("Invalid regex: topic rule"),
        topic,
        score,
    }
}

static TOPIC_RULES: LazyLock<Vec<TopicRule>> = LazyLock::new(|| {
    vec![
        rule(
            r"\beducation\b|\bschools?\b|\bbildung\b|\bbildungs\w*\b|\bschule\b",
            "education",
            0.95,
        ),
        rule(r"\bsport\b", "education", 0.70),
        rule(r"\bhealth\b|\bhealthcare\b|\bgesundheit\b|\bmedizin\b", "healthcare", 0.95),
        rule(r"\bumwelt\b", "healthcare", 0.70),
        rule(r"\btransport\b|\btraffic\b|\bverkehr\b|\bverkehrs\w*\b", "transport", 0.95),
        rule(
            r"\bpublic\s+transport\b|\broads?\b|\btram\b|\bentsorgung\b|\btiefbau\b",
            "transport",
            0.95,
        ),
        rule(r"\benergy\b|\benergie\b|\bstrom\b|\bwasser\b|\butilities\b", "energy", 0.95),
        rule(
            r"\bdigital\b|\bdigitale?\b|\binfrastruktur\b|\binfrastructure\b",
            "digital infrastructure",
            0.95,
        ),
        rule(r"\bsecurity\b|\bsafety\b|\bsicherheit\b|\bpolizei\b|\bpolice\b", "security", 0.95),
        rule(r"\bhousing\b|\bwohnen\b|\bwohnraum\b|\bconstruction\b|\bhochbau\b", "housing", 0.95),
        rule(r"\bpresidency\b|\bpraesidial\b|\bpraesidialdepartement\b", "presidency", 0.95),
        rule(
            r"\badministration\b|\bverwaltung\b|\bbehoerden\b|\bgesamtverwaltung\b",
            "administration",
            0.95,
        ),
        rule(r"\badministrative\b", "administration", 0.85),
        rule(r"\bfinance\b|\bfinanz(en)?\b", "finance", 0.95),
    ]
});

/// Keeps the best score per topic, in first-seen order.
#[derive(Default)]
struct Scoreboard {
    scores: Vec<(&'static str, f64)>,
}

impl Scoreboard {
    fn register(&mut self, topic: &'static str, score: f64) {
        match self.scores.iter_mut().find(|(t, _)| *t == topic) {
            Some(entry) => entry.1 = entry.1.max(score),
            None => self.scores.push((topic, score)),
        }
    }

    /// Best first. Equal scores keep first-seen order.
    fn ranked(mut self) -> Vec<(&'static str, f64)> {
        self.scores
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        self.scores
    }
}

/// Look for an official department name inside normalized text.
pub fn match_department_name(t_norm: &str, catalog: &DepartmentCatalog) -> Option<TopicResult> {
    for department in catalog.departments() {
        let name_norm = normalize(&department.name);
        if name_norm.is_empty() || !t_norm.contains(&name_norm) {
            continue;
        }
        if department.topics.len() == 1 {
            return Some(TopicResult::single(&department.topics[0], DEPARTMENT_MATCH_CONFIDENCE));
        }
        if let Some(topic) = department.pick_topic(t_norm) {
            return Some(TopicResult::single(topic, SHARED_DEPARTMENT_CONFIDENCE));
        }
    }
    None
}

/// Rule-table topic classifier.
pub struct TopicClassifier {
    rules: &'static [TopicRule],
}

impl Default for TopicClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TopicClassifier {
    pub fn new() -> Self {
        Self {
            rules: TOPIC_RULES.as_slice(),
        }
    }

    /// Score normalized text against the rule table.
    pub fn classify(&self, t_norm: &str) -> TopicResult {
        let mut board = Scoreboard::default();

        if TRANSPORT_PHRASES.iter().any(|p| has_phrase(t_norm, p)) {
            board.register("transport", TRANSPORT_PHRASE_SCORE);
        }
        for rule in self.rules {
            if rule.pattern.is_match(t_norm) {
                board.register(rule.topic, rule.score);
            }
        }

        let hits = board.ranked();
        let Some(&(best_topic, best_score)) = hits.first() else {
            return TopicResult::single(ALL_TOPICS, NO_MATCH_CONFIDENCE);
        };

        let candidates = hits
            .iter()
            .map(|(topic, score)| TopicCandidate::new(topic, *score))
            .collect();

        let ambiguous = hits
            .get(1)
            .is_some_and(|(_, runner_up)| best_score - runner_up < AMBIGUITY_MARGIN);
        if ambiguous {
            return TopicResult {
                topic: ALL_TOPICS.to_string(),
                confidence: best_score.min(AMBIGUOUS_CONFIDENCE_CAP),
                candidates,
            };
        }

        TopicResult {
            topic: best_topic.to_string(),
            confidence: best_score,
            candidates,
        }
    }
}
