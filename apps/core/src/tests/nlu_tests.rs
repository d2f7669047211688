//! NLU Module Tests
//!
//! Utterance-level tests for normalization, the slot parsers and the
//! request parser orchestrator.

use crate::catalog::DepartmentCatalog;
use crate::nlu::normalize::{has_phrase, normalize};
use crate::nlu::{ParsedRequest, RequestParser, Timeline, TopicClassifier, Verbosity};

fn parser() -> RequestParser {
    RequestParser::new(DepartmentCatalog::zurich(), (2019..=2024).collect())
}

fn parse(question: &str) -> ParsedRequest {
    parser().parse(question)
}

#[cfg(test)]
mod normalize_tests {
    use super::*;

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = vec![
            "Education since 2019?",
            "Wie viel gibt die Stadt für Bildung aus?",
            "Präsidialdepartement -- Übersicht!!",
            "  tabs\tand\nnewlines  ",
            "ÄÖÜß",
            "",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "Not idempotent for '{}'", input);
            assert!(
                once.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '),
                "Unexpected character in '{}'",
                once
            );
        }
    }

    #[test]
    fn test_phrase_needs_word_boundaries() {
        let t = normalize("Public transportation in Zurich");
        assert!(!has_phrase(&t, "transport"));
        assert!(has_phrase(&t, "public transportation"));
        assert!(has_phrase(&t, "zurich"));
    }
}

#[cfg(test)]
mod parser_tests {
    use super::*;

    #[test]
    fn test_reference_utterances() {
        let cases = vec![
            ("short overview of transport spending", "transport", Verbosity::Brief, Timeline::All),
            ("Education since 2019?", "education", Verbosity::Normal, Timeline::Since(2019)),
            (
                "Wie viel gibt die Stadt für Bildung aus?",
                "education",
                Verbosity::Normal,
                Timeline::All,
            ),
            ("Polizei budget last 3 years", "security", Verbosity::Normal, Timeline::Since(2022)),
            (
                "kurze Übersicht Verkehr seit 2020",
                "transport",
                Verbosity::Brief,
                Timeline::Since(2020),
            ),
            (
                "What changed recently in healthcare?",
                "healthcare",
                Verbosity::Normal,
                Timeline::Since(2022),
            ),
            (
                "Explain the housing budget between 2020 and 2023",
                "housing",
                Verbosity::Detailed,
                Timeline::Since(2020),
            ),
        ];

        for (question, field, level, timeline) in cases {
            let request = parse(question);
            assert_eq!(request.field, field, "field for '{}'", question);
            assert_eq!(request.generalization_level, level, "level for '{}'", question);
            assert_eq!(request.timeline, timeline, "timeline for '{}'", question);
        }
    }

    #[test]
    fn test_citywide_questions() {
        let questions = vec![
            "So what are they spending more on now?",
            "Who are the winners and losers?",
            "Where was the biggest increase across the city?",
            "Wo steigen die Ausgaben am stärksten?",
        ];
        for question in questions {
            let request = parse(question);
            assert_eq!(request.field, "all", "Expected citywide for '{}'", question);
            assert_eq!(request.field_confidence, 0.95);
            assert_eq!(request.field_candidates.len(), 1);
        }
    }

    #[test]
    fn test_citywide_ignores_topic_words() {
        // "education" would match the rule table, the citywide intent wins
        let request = parse("Are we spending more on education or finance?");
        assert_eq!(request.field, "all");
    }

    #[test]
    fn test_shared_department_name() {
        let request = parse("Departement der Industriellen Betriebe");
        assert_eq!(request.field, "energy");
        assert_eq!(request.field_confidence, 0.90);

        let request = parse("Departement der Industriellen Betriebe: digitale Projekte");
        assert_eq!(request.field, "digital infrastructure");
    }

    #[test]
    fn test_official_name_beats_rules() {
        let request = parse("Tell me about the Tiefbau- und Entsorgungsdepartement");
        assert_eq!(request.field, "transport");
        assert_eq!(request.field_confidence, 0.99);
        assert_eq!(request.field_candidates.len(), 1);
    }

    #[test]
    fn test_ambiguous_topics_become_all() {
        let request = parse("health and housing");
        assert_eq!(request.field, "all");
        assert_eq!(request.field_confidence, 0.40);
        assert_eq!(request.field_candidates.len(), 2);
    }

    #[test]
    fn test_confidences_and_candidate_order() {
        let questions = vec![
            "",
            "???",
            "energie und sport",
            "roads, tram and public transport",
            "Finanzen seit 2021",
            "administrative costs vs police",
        ];
        for question in questions {
            let request = parse(question);
            assert!(
                (0.0..=1.0).contains(&request.field_confidence),
                "confidence for '{}'",
                question
            );
            for pair in request.field_candidates.windows(2) {
                assert!(
                    pair[0].confidence >= pair[1].confidence,
                    "candidates not sorted for '{}'",
                    question
                );
            }
            for candidate in &request.field_candidates {
                assert!((0.0..=1.0).contains(&candidate.confidence));
            }
        }
    }

    #[test]
    fn test_wire_format() {
        let request = parse("Education since 2019?");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["timeline"], serde_json::json!({"since": 2019}));
        assert_eq!(value["field"], "education");
        assert_eq!(value["generalization_level"], 1);
        assert_eq!(value["field_candidates"][0]["field"], "education");
    }
}

#[cfg(test)]
mod topic_classifier_tests {
    use super::*;

    #[test]
    fn test_transportation_is_not_transport() {
        let classifier = TopicClassifier::new();
        let result = classifier.classify(&normalize("transportation costs"));
        assert_eq!(result.topic, "all");
        assert_eq!(result.confidence, 0.20);
    }

    #[test]
    fn test_german_topic_words() {
        let classifier = TopicClassifier::new();
        let cases = vec![
            ("gesundheit", "healthcare"),
            ("wohnraum", "housing"),
            ("verkehrsbetriebe", "transport"),
            ("strom und wasser", "energy"),
            ("gesamtverwaltung", "administration"),
        ];
        for (text, topic) in cases {
            let result = classifier.classify(text);
            assert_eq!(result.topic, topic, "Expected {} for '{}'", topic, text);
        }
    }
}
