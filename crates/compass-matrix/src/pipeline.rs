//! One analysis run: document and question sheet in, answer text out.
//!
//! [`Pipeline::run`] sequences the stages and stops at the first failure or
//! empty result with a typed [`PipelineError`]. [`Pipeline::analyze`] is the
//! single presenter turning either outcome into an [`AnalysisReport`].

use std::time::Duration;

use crate::config::ModelConfig;
use crate::csv_out::write_table_csv_to_string;
use crate::error::PipelineError;
use crate::extract::{ExtractionReport, extract_tables_from_bytes};
use crate::invoke::{ModelTransport, invoke_model};
use crate::options::ExtractOptions;
use crate::prompt::build_prompt;
use crate::questions::read_questions_from_bytes;

pub const WAITING_FOR_INPUTS: &str = "Please upload a PDF and an Excel file";
pub const MISSING_QUESTIONS: &str =
    "Please ensure the Excel file contains questions in a 'Questions' column.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            text: text.into(),
        }
    }
}

/// How far a run got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    WaitingForInputs,
    Answered,
    NoTables,
    NoQuestions,
    Failed,
}

/// The uploaded inputs and settings of a single run.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInput<'a> {
    pub document: &'a [u8],
    pub questions: &'a [u8],
    pub config: &'a ModelConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRun {
    pub extraction: ExtractionReport,
    pub question_count: usize,
    pub prompt_chars: usize,
    pub answer: String,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub outcome: Outcome,
    pub messages: Vec<StatusMessage>,
    /// Raw model text, empty unless the run was answered.
    pub answer: String,
    pub elapsed: Option<Duration>,
    pub table_rows: usize,
    pub question_count: usize,
}

impl AnalysisReport {
    /// The report shown before both files have been provided.
    #[must_use]
    pub fn waiting() -> Self {
        Self {
            outcome: Outcome::WaitingForInputs,
            messages: vec![StatusMessage::info(WAITING_FOR_INPUTS)],
            answer: String::new(),
            elapsed: None,
            table_rows: 0,
            question_count: 0,
        }
    }
}

pub struct Pipeline<T> {
    transport: T,
    extract_options: ExtractOptions,
}

impl<T: ModelTransport> Pipeline<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            extract_options: ExtractOptions::default(),
        }
    }

    #[must_use]
    pub fn with_extract_options(mut self, extract_options: ExtractOptions) -> Self {
        self.extract_options = extract_options;
        self
    }

    /// Runs every stage in order, recording progress into `log`.
    pub async fn run(
        &self,
        input: &AnalysisInput<'_>,
        log: &mut Vec<StatusMessage>,
    ) -> Result<AnalysisRun, PipelineError> {
        log.push(StatusMessage::info("Extracting tables from PDF..."));
        let (rows, extraction) = extract_tables_from_bytes(input.document, &self.extract_options)?;
        if rows.is_empty() {
            return Err(PipelineError::NoTables);
        }
        log.push(StatusMessage::success("Tables extracted successfully!"));

        let csv_blob = write_table_csv_to_string(&rows)?;
        tracing::debug!(rows = rows.len(), bytes = csv_blob.len(), "serialized tables");

        let questions = read_questions_from_bytes(input.questions)?;
        if questions.is_empty() {
            return Err(PipelineError::NoQuestions);
        }

        let prompt = build_prompt(&csv_blob, &questions, input.config.include_explanation);
        log.push(StatusMessage::info("Sending prompt to AI model..."));
        let answer = invoke_model(&self.transport, &prompt, input.config).await?;
        log.push(StatusMessage::info(format!(
            "Model execution completed in {:.2} seconds",
            answer.elapsed.as_secs_f64()
        )));
        log.push(StatusMessage::success("AI model response received!"));

        Ok(AnalysisRun {
            extraction,
            question_count: questions.len(),
            prompt_chars: prompt.chars().count(),
            answer: answer.text,
            elapsed: answer.elapsed,
        })
    }

    /// Runs the pipeline and renders any stage failure as a status message.
    pub async fn analyze(&self, input: &AnalysisInput<'_>) -> AnalysisReport {
        let mut messages = Vec::new();
        match self.run(input, &mut messages).await {
            Ok(run) => {
                tracing::debug!(
                    tables = run.extraction.table_count,
                    questions = run.question_count,
                    prompt_chars = run.prompt_chars,
                    "analysis answered"
                );
                AnalysisReport {
                    outcome: Outcome::Answered,
                    messages,
                    answer: run.answer,
                    elapsed: Some(run.elapsed),
                    table_rows: run.extraction.row_count,
                    question_count: run.question_count,
                }
            }
            Err(error) => {
                tracing::warn!(%error, "analysis stopped");
                let (outcome, notices) = present_failure(&error);
                messages.extend(notices);
                AnalysisReport {
                    outcome,
                    messages,
                    answer: String::new(),
                    elapsed: None,
                    table_rows: 0,
                    question_count: 0,
                }
            }
        }
    }
}

/// A failed stage reports its error, then the same notice the empty result of
/// that stage would have produced.
fn present_failure(error: &PipelineError) -> (Outcome, Vec<StatusMessage>) {
    let no_tables = || StatusMessage::error("No tables found in the PDF.");
    let missing_questions = || StatusMessage::info(MISSING_QUESTIONS);

    match error {
        PipelineError::Extraction(error) => (
            Outcome::NoTables,
            vec![
                StatusMessage::error(format!("Error extracting tables: {error}")),
                no_tables(),
            ],
        ),
        PipelineError::NoTables => (Outcome::NoTables, vec![no_tables()]),
        PipelineError::Serialization(error) => (
            Outcome::Failed,
            vec![StatusMessage::error(format!("Error writing to CSV: {error}"))],
        ),
        PipelineError::QuestionLoad(error) => (
            Outcome::NoQuestions,
            vec![
                StatusMessage::error(format!("Error reading questions from Excel file: {error}")),
                missing_questions(),
            ],
        ),
        PipelineError::NoQuestions => (Outcome::NoQuestions, vec![missing_questions()]),
        PipelineError::Invocation(error) => (
            Outcome::Failed,
            vec![StatusMessage::error(format!("Error invoking AI model: {error}"))],
        ),
    }
}
