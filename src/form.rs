use std::collections::HashMap;

use compass_matrix::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, ModelChoice, ModelConfig};
use worker::{FormEntry, Request};

use crate::error::ApiError;

pub const DOCUMENT_FIELD: &str = "document";
pub const QUESTIONS_FIELD: &str = "questions";

/// One submitted analysis form. Files are absent when not uploaded.
#[derive(Debug, Default)]
pub struct AnalysisForm {
    pub document: Option<Vec<u8>>,
    pub questions: Option<Vec<u8>>,
    pub fields: HashMap<String, String>,
}

impl AnalysisForm {
    /// Both uploads, or `None` while either is still missing.
    pub fn uploads(&self) -> Option<(&[u8], &[u8])> {
        Some((self.document.as_deref()?, self.questions.as_deref()?))
    }
}

pub async fn read_analysis_form(req: &mut Request) -> Result<AnalysisForm, ApiError> {
    let form_data = req
        .form_data()
        .await
        .map_err(|error| ApiError::BadRequest(format!("expected multipart form data: {error}")))?;

    let mut form = AnalysisForm::default();
    for name in ["model", "max_tokens", "temperature", "include_explanation"] {
        if let Some(FormEntry::Field(value)) = form_data.get(name) {
            form.fields.insert(name.to_string(), value);
        }
    }

    form.document = read_upload(form_data.get(DOCUMENT_FIELD)).await?;
    form.questions = read_upload(form_data.get(QUESTIONS_FIELD)).await?;
    Ok(form)
}

async fn read_upload(entry: Option<FormEntry>) -> Result<Option<Vec<u8>>, ApiError> {
    let Some(FormEntry::File(file)) = entry else {
        return Ok(None);
    };

    let bytes = file.bytes().await?;
    Ok((!bytes.is_empty()).then_some(bytes))
}

pub fn parse_flag(value: &str) -> bool {
    let lowered = value.trim().to_ascii_lowercase();
    matches!(lowered.as_str(), "on" | "true" | "1" | "yes")
}

fn non_blank<'a>(fields: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    fields
        .get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

/// Builds the run configuration, falling back to defaults for blank fields.
pub fn parse_model_config(fields: &HashMap<String, String>) -> Result<ModelConfig, ApiError> {
    let model = non_blank(fields, "model")
        .map(str::parse::<ModelChoice>)
        .transpose()?
        .unwrap_or_default();
    let max_tokens = non_blank(fields, "max_tokens")
        .map(str::parse::<u32>)
        .transpose()?
        .unwrap_or(DEFAULT_MAX_TOKENS);
    let temperature = non_blank(fields, "temperature")
        .map(str::parse::<f64>)
        .transpose()?
        .unwrap_or(DEFAULT_TEMPERATURE);
    let include_explanation = fields
        .get("include_explanation")
        .is_some_and(|value| parse_flag(value));

    Ok(ModelConfig::new(
        model,
        max_tokens,
        temperature,
        include_explanation,
    )?)
}
