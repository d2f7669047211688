//! # Summarizer Module
//!
//! Turns budget rows into fuzzy linguistic summaries.
//!
//! ## Components
//! - `summary`: per-department statistics, sentences and movers
//! - `response`: answer shapes
//! - `engine`: main orchestrator

pub mod engine;
pub mod response;
pub mod summary;

pub use engine::SummaryEngine;
pub use response::{BudgetResponse, SummaryDetail, YearSpan};
pub use summary::{DepartmentSummary, Mover};
