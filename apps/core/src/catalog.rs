//! Department catalog.
//!
//! Maps the English topics users ask about onto official department
//! names. One department may serve several topics.

use serde::{Deserialize, Serialize};

use crate::nlu::normalize::has_phrase;

/// A department and the topics that resolve to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Official display name as it appears in the budget data.
    pub name: String,
    /// Canonical topics served by this department, primary topic first.
    pub topics: Vec<String>,
    /// Normalized whole-word keywords that select the second topic when
    /// the department serves more than one.
    #[serde(default)]
    pub secondary_keywords: Vec<String>,
}

impl Department {
    pub fn new(name: &str, topics: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            topics: topics.iter().map(|t| t.to_string()).collect(),
            secondary_keywords: vec![],
        }
    }

    pub fn with_secondary_keywords(mut self, keywords: &[&str]) -> Self {
        self.secondary_keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Pick a topic for this department given normalized text.
    ///
    /// Returns `None` for a multi-topic department that has no way to
    /// choose between its topics.
    pub fn pick_topic(&self, t_norm: &str) -> Option<&str> {
        match self.topics.len() {
            0 => None,
            1 => Some(self.topics[0].as_str()),
            _ if self.secondary_keywords.is_empty() => None,
            _ => {
                if self.secondary_keywords.iter().any(|k| has_phrase(t_norm, k)) {
                    Some(self.topics[1].as_str())
                } else {
                    Some(self.topics[0].as_str())
                }
            }
        }
    }
}

/// Ordered list of known departments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentCatalog {
    departments: Vec<Department>,
}

impl Default for DepartmentCatalog {
    fn default() -> Self {
        Self::zurich()
    }
}

impl DepartmentCatalog {
    pub fn new(departments: Vec<Department>) -> Self {
        Self { departments }
    }

    /// The City of Zurich departments.
    pub fn zurich() -> Self {
        Self::new(vec![
            Department::new("Schul- und Sportdepartement", &["education"]),
            Department::new("Gesundheits- und Umweltdepartement", &["healthcare"]),
            Department::new("Tiefbau- und Entsorgungsdepartement", &["transport"]),
            Department::new(
                "Departement der Industriellen Betriebe",
                &["energy", "digital infrastructure"],
            )
            .with_secondary_keywords(&["digital", "digitale", "infrastruktur", "infrastructure"]),
            Department::new("Sicherheitsdepartement", &["security"]),
            Department::new("Hochbaudepartement", &["housing"]),
            Department::new("Präsidialdepartement", &["presidency"]),
            Department::new("Behörden und Gesamtverwaltung", &["administration"]),
            Department::new("Finanzdepartement", &["finance"]),
        ])
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    /// Official department name for a canonical topic.
    pub fn department_for_topic(&self, topic: &str) -> Option<&str> {
        self.departments
            .iter()
            .find(|d| d.topics.iter().any(|t| t == topic))
            .map(|d| d.name.as_str())
    }

    pub fn department_names(&self) -> Vec<&str> {
        self.departments.iter().map(|d| d.name.as_str()).collect()
    }

    /// `(topic, department)` pairs in catalog order.
    pub fn topic_map(&self) -> Vec<(&str, &str)> {
        self.departments
            .iter()
            .flat_map(|d| d.topics.iter().map(move |t| (t.as_str(), d.name.as_str())))
            .collect()
    }
}
