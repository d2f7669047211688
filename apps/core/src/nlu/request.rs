//! Structured request types shared by the parser and the summarizer.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// Topic value meaning "every department".
pub const ALL_TOPICS: &str = "all";

/// Time window of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeline {
    /// No restriction.
    #[default]
    All,
    /// Only years `>=` the given start year.
    Since(i32),
}

impl Timeline {
    pub fn start_year(&self) -> Option<i32> {
        match self {
            Timeline::All => None,
            Timeline::Since(year) => Some(*year),
        }
    }

    pub fn from_start(start: Option<i32>) -> Self {
        start.map_or(Timeline::All, Timeline::Since)
    }

    /// Lenient interpretation of a loosely typed timeline value.
    ///
    /// Accepts `"all"`, `{"since": year}`, a bare year or a digit string.
    /// Anything else means no restriction.
    pub fn from_value(value: &Value) -> Self {
        let start = match value {
            Value::Object(map) => map.get("since").and_then(year_from_value),
            other => year_from_value(other),
        };
        Timeline::from_start(start)
    }
}

/// A year from a number or digit string. Whole-number floats are accepted,
/// values outside the `i32` range are not.
fn year_from_value(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => year_from_number(n),
        Value::String(s) => parse_digits(s),
        _ => None,
    }
}

fn year_from_number(n: &Number) -> Option<i32> {
    if let Some(y) = n.as_i64() {
        return i32::try_from(y).ok();
    }
    let f = n.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX) {
        Some(f as i32)
    } else {
        None
    }
}

fn parse_digits(s: &str) -> Option<i32> {
    let s = s.trim();
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

impl Serialize for Timeline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Timeline::All => serializer.serialize_str(ALL_TOPICS),
            Timeline::Since(year) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("since", year)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Timeline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Timeline::from_value(&value))
    }
}

/// Requested answer detail (the "generalization level").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    Brief = 0,
    #[default]
    Normal = 1,
    Detailed = 2,
}

impl Verbosity {
    pub fn level(&self) -> u8 {
        *self as u8
    }

    pub fn from_level(level: i64) -> Self {
        match level {
            i64::MIN..=0 => Verbosity::Brief,
            1 => Verbosity::Normal,
            _ => Verbosity::Detailed,
        }
    }

    /// Lenient interpretation: integers, floats and numeric strings are
    /// accepted, anything else falls back to `Normal`.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .map_or(Verbosity::Normal, Verbosity::from_level),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map_or(Verbosity::Normal, Verbosity::from_level),
            _ => Verbosity::Normal,
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

impl Serialize for Verbosity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.level())
    }
}

impl<'de> Deserialize<'de> for Verbosity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Verbosity::from_value(&value))
    }
}

/// A scored topic guess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicCandidate {
    pub field: String,
    pub confidence: f64,
}

impl TopicCandidate {
    pub fn new(field: &str, confidence: f64) -> Self {
        Self {
            field: field.to_string(),
            confidence,
        }
    }
}

/// Output of the request parser. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRequest {
    pub timeline: Timeline,
    /// Canonical topic or `"all"`.
    pub field: String,
    pub generalization_level: Verbosity,
    /// Confidence of the topic decision, in `[0, 1]`.
    pub field_confidence: f64,
    /// Ranked candidates, highest confidence first.
    pub field_candidates: Vec<TopicCandidate>,
}

fn default_field() -> String {
    ALL_TOPICS.to_string()
}

fn lenient_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(default_field))
}

/// Input of the summarizer. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRequest {
    #[serde(default)]
    pub timeline: Timeline,
    #[serde(default = "default_field", deserialize_with = "lenient_field")]
    pub field: String,
    #[serde(default)]
    pub generalization_level: Verbosity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_candidates: Vec<TopicCandidate>,
}

impl Default for BudgetRequest {
    fn default() -> Self {
        Self {
            timeline: Timeline::All,
            field: default_field(),
            generalization_level: Verbosity::Normal,
            field_confidence: None,
            field_candidates: vec![],
        }
    }
}

impl BudgetRequest {
    pub fn new(timeline: Timeline, field: &str, generalization_level: Verbosity) -> Self {
        Self {
            timeline,
            field: field.to_string(),
            generalization_level,
            ..Self::default()
        }
    }
}

impl From<ParsedRequest> for BudgetRequest {
    fn from(parsed: ParsedRequest) -> Self {
        Self {
            timeline: parsed.timeline,
            field: parsed.field,
            generalization_level: parsed.generalization_level,
            field_confidence: Some(parsed.field_confidence),
            field_candidates: parsed.field_candidates,
        }
    }
}
