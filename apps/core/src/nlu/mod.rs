//! # NLU Module
//!
//! Rule-based slot filling for budget questions. No model, only lexical
//! patterns over normalized text.
//!
//! ## Components
//! - `normalize`: text canonicalization and whole-word matching
//! - `verbosity`: requested level of detail
//! - `timeline`: time window extraction
//! - `citywide`: cross-department comparison intent
//! - `topic`: department-name match and rule-table classifier
//! - `request`: request data structures
//! - `parser`: main orchestrator

pub mod citywide;
pub mod normalize;
pub mod parser;
pub mod request;
pub mod timeline;
pub mod topic;
pub mod verbosity;

pub use parser::RequestParser;
pub use request::{BudgetRequest, ParsedRequest, Timeline, TopicCandidate, Verbosity, ALL_TOPICS};
pub use topic::{TopicClassifier, TopicResult};
