use compass_matrix::pipeline::{AnalysisReport, Outcome, StatusLevel, StatusMessage};
use compass_matrix::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, MAX_MAX_TOKENS, ModelChoice};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BEDROCK_REGION: &str = "us-east-1";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeView {
    WaitingForInputs,
    Answered,
    NoTables,
    NoQuestions,
    Failed,
}

impl From<Outcome> for OutcomeView {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::WaitingForInputs => Self::WaitingForInputs,
            Outcome::Answered => Self::Answered,
            Outcome::NoTables => Self::NoTables,
            Outcome::NoQuestions => Self::NoQuestions,
            Outcome::Failed => Self::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LevelView {
    Info,
    Success,
    Error,
}

impl From<StatusLevel> for LevelView {
    fn from(level: StatusLevel) -> Self {
        match level {
            StatusLevel::Info => Self::Info,
            StatusLevel::Success => Self::Success,
            StatusLevel::Error => Self::Error,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusView {
    pub level: LevelView,
    pub message: String,
}

impl From<&StatusMessage> for StatusView {
    fn from(status: &StatusMessage) -> Self {
        Self {
            level: status.level.into(),
            message: status.text.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResponse {
    pub outcome: OutcomeView,
    pub model: String,
    pub statuses: Vec<StatusView>,
    pub answer: String,
    pub elapsed_seconds: Option<f64>,
    pub table_rows: usize,
    pub question_count: usize,
}

impl AnalysisResponse {
    pub fn from_report(report: &AnalysisReport, model: ModelChoice) -> Self {
        Self {
            outcome: report.outcome.into(),
            model: model.id().to_string(),
            statuses: report.messages.iter().map(StatusView::from).collect(),
            answer: report.answer.clone(),
            elapsed_seconds: report.elapsed.map(|elapsed| elapsed.as_secs_f64()),
            table_rows: report.table_rows,
            question_count: report.question_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelChoiceView {
    pub label: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelsResponse {
    pub models: Vec<ModelChoiceView>,
    pub default_model: String,
    pub default_max_tokens: u32,
    pub max_max_tokens: u32,
    pub default_temperature: f64,
}

impl ModelsResponse {
    pub fn current() -> Self {
        Self {
            models: ModelChoice::ALL
                .iter()
                .map(|choice| ModelChoiceView {
                    label: choice.label().to_string(),
                    id: choice.id().to_string(),
                })
                .collect(),
            default_model: ModelChoice::default().id().to_string(),
            default_max_tokens: DEFAULT_MAX_TOKENS,
            max_max_tokens: MAX_MAX_TOKENS,
            default_temperature: DEFAULT_TEMPERATURE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}
