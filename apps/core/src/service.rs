//! Question answering over a loaded budget dataset.
//!
//! Bridges the request parser and the summary engine, and owns the
//! calibration context for its lifetime.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;

use crate::catalog::DepartmentCatalog;
use crate::config::Settings;
use crate::error::Result;
use crate::fuzzy::{CalibrationSet, CalibrationStore};
use crate::models::BudgetDataset;
use crate::nlu::{BudgetRequest, ParsedRequest, RequestParser};
use crate::summarizer::summary::latest_sentences;
use crate::summarizer::{BudgetResponse, DepartmentSummary, SummaryEngine};

/// A parsed and answered question.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionAnswer {
    pub raw_question: String,
    /// UTC timestamp, RFC 3339 with seconds precision.
    pub asked_at: String,
    pub nlu_interpretation: ParsedRequest,
    /// Echoes the interpretation under `request`.
    pub response: BudgetResponse,
}

/// Parser, engine, data and calibration wired together.
pub struct BudgetAssistant {
    parser: RequestParser,
    engine: SummaryEngine,
    dataset: BudgetDataset,
    calibration: CalibrationStore,
}

impl BudgetAssistant {
    pub fn new(
        parser: RequestParser,
        engine: SummaryEngine,
        dataset: BudgetDataset,
        calibration: CalibrationStore,
    ) -> Self {
        Self {
            parser,
            engine,
            dataset,
            calibration,
        }
    }

    /// Assistant for the Zurich catalog configured from `settings`.
    pub fn from_settings(settings: &Settings, dataset: BudgetDataset) -> Self {
        let catalog = DepartmentCatalog::zurich();
        Self::new(
            RequestParser::new(catalog.clone(), settings.available_years()),
            SummaryEngine::new(catalog, settings.spending_only),
            dataset,
            CalibrationStore::new(settings.calibration_path.clone(), settings.spending_only),
        )
    }

    pub fn dataset(&self) -> &BudgetDataset {
        &self.dataset
    }

    pub fn parser(&self) -> &RequestParser {
        &self.parser
    }

    /// Active calibration, fitted on the full dataset on first use.
    pub fn calibration(&mut self) -> &CalibrationSet {
        self.calibration.ensure(Some(&self.dataset))
    }

    /// Refit the membership functions and overwrite the persisted file.
    pub fn recalibrate(&mut self) -> Result<&CalibrationSet> {
        self.calibration.recompute(&self.dataset)
    }

    pub fn answer_request(&mut self, request: &BudgetRequest) -> BudgetResponse {
        let calibration = self.calibration.ensure(Some(&self.dataset));
        self.engine.answer(&self.dataset, calibration, request)
    }

    pub fn answer_question(&mut self, question: &str) -> QuestionAnswer {
        let parsed = self.parser.parse(question);
        let response = self.answer_request(&BudgetRequest::from(parsed.clone()));
        info!("Question answered as {}", response.kind());
        QuestionAnswer {
            raw_question: question.to_string(),
            asked_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            nlu_interpretation: parsed,
            response,
        }
    }

    /// Summaries of every department over the full dataset.
    pub fn summaries(&mut self) -> Vec<DepartmentSummary> {
        let calibration = self.calibration.ensure(Some(&self.dataset));
        self.engine.summaries(&self.dataset, calibration)
    }

    /// Up to `n` summary sentences of the latest year.
    pub fn latest_sentences(&mut self, n: usize) -> Vec<String> {
        let summaries = self.summaries();
        latest_sentences(&summaries, n)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
