//! Test Module
//!
//! Cross-module test suite for the budget brain.
//!
//! ## Test Categories
//! - `nlu_tests`: normalization, slot parsers and the request parser
//! - `fuzzy_tests`: membership properties, calibration and its persistence
//! - `summarizer_tests`: response shapes over fixture datasets
//! - `integration_tests`: question → answer workflows through `BudgetAssistant`

mod fixtures;

pub mod fuzzy_tests;
pub mod nlu_tests;
