//! Request Parser - Main orchestrator for the NLU module.
//!
//! Coordinates verbosity, citywide intent, timeline and topic extraction
//! into one [`ParsedRequest`].
//!
//! Topic resolution is two-tier:
//! 1. Direct department-name match
//! 2. Rule-table classifier, downgraded to `"all"` below [`MIN_TOPIC_CONFIDENCE`]

use tracing::debug;

use super::citywide::detect_citywide_intent;
use super::normalize::normalize;
use super::request::{ParsedRequest, TopicCandidate, ALL_TOPICS};
use super::timeline::parse_timeline;
use super::topic::{match_department_name, TopicClassifier, TopicResult};
use super::verbosity::parse_verbosity;
use crate::catalog::DepartmentCatalog;

/// Confidence attached to a citywide comparison answer.
pub const CITYWIDE_CONFIDENCE: f64 = 0.95;
/// Classifier results below this are reported as `"all"`.
pub const MIN_TOPIC_CONFIDENCE: f64 = 0.5;

/// Turns free-text questions into structured requests.
pub struct RequestParser {
    topic_classifier: TopicClassifier,
    catalog: DepartmentCatalog,
    years_available: Vec<i32>,
}

impl RequestParser {
    /// `years_available` is sorted ascending here.
    pub fn new(catalog: DepartmentCatalog, mut years_available: Vec<i32>) -> Self {
        years_available.sort_unstable();
        years_available.dedup();
        Self {
            topic_classifier: TopicClassifier::new(),
            catalog,
            years_available,
        }
    }

    pub fn catalog(&self) -> &DepartmentCatalog {
        &self.catalog
    }

    pub fn years_available(&self) -> &[i32] {
        &self.years_available
    }

    /// Parse a question into a structured request.
    pub fn parse(&self, question: &str) -> ParsedRequest {
        let t_norm = normalize(question);

        let generalization_level = parse_verbosity(&t_norm);
        let citywide = detect_citywide_intent(&t_norm);
        let timeline = parse_timeline(&t_norm, &self.years_available, !citywide).timeline;

        let topic = if citywide {
            TopicResult {
                topic: ALL_TOPICS.to_string(),
                confidence: CITYWIDE_CONFIDENCE,
                candidates: vec![TopicCandidate::new(ALL_TOPICS, CITYWIDE_CONFIDENCE)],
            }
        } else {
            self.resolve_topic(&t_norm)
        };

        debug!(
            "Parsed '{}': field={} ({:.2}), level={}, citywide={}",
            t_norm, topic.topic, topic.confidence, generalization_level, citywide
        );

        ParsedRequest {
            timeline,
            field: topic.topic,
            generalization_level,
            field_confidence: topic.confidence,
            field_candidates: topic.candidates,
        }
    }

    fn resolve_topic(&self, t_norm: &str) -> TopicResult {
        if let Some(direct) = match_department_name(t_norm, &self.catalog) {
            return direct;
        }
        let mut result = self.topic_classifier.classify(t_norm);
        if result.confidence < MIN_TOPIC_CONFIDENCE {
            result.topic = ALL_TOPICS.to_string();
        }
        result
    }
}
