//! Budget Brain Core
//!
//! Answers free-text questions about a municipal budget with fuzzy
//! linguistic summaries of department spending shares and trends.
//!
//! ## Modules
//! - `nlu`: question → structured request
//! - `fuzzy`: membership functions, calibration, robust trend
//! - `summarizer`: request → response over budget rows
//! - `service`: both halves wired together

pub mod catalog;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod models;
pub mod nlu;
pub mod service;
pub mod summarizer;
pub mod telemetry;

pub use catalog::{Department, DepartmentCatalog};
pub use config::Settings;
pub use error::{AppError, Result};
pub use models::{BudgetDataset, BudgetRecord};
pub use nlu::{BudgetRequest, ParsedRequest, RequestParser};
pub use service::{BudgetAssistant, QuestionAnswer};
pub use summarizer::{BudgetResponse, SummaryEngine};

#[cfg(test)]
mod tests;
