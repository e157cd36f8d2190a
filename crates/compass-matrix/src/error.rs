use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to load PDF: {0}")]
    PdfLoad(#[from] lopdf::Error),

    #[error("invalid page selection: {0}")]
    InvalidPageSelection(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("no pages available after applying selection")]
    NoPagesSelected,
}

#[derive(Debug, Error)]
pub enum FormFieldError {
    #[error("failed to read PDF structure: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("failed to decrypt PDF with an empty password: {0}")]
    Decrypt(String),
}

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Error)]
pub enum QuestionLoadError {
    #[error("failed to open workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("workbook contains no worksheets")]
    NoWorksheet,

    #[error("worksheet has no '{0}' column")]
    MissingColumn(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown model '{0}'")]
    UnknownModel(String),

    #[error("max tokens must be within {min}..={max}, got {value}")]
    MaxTokensOutOfRange { value: u32, min: u32, max: u32 },

    #[error("temperature must be within 0.0..=1.0, got {0}")]
    TemperatureOutOfRange(f64),
}

#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("failed to encode request envelope: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("model endpoint returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed response envelope: {0}")]
    MalformedResponse(String),

    #[error("response envelope has no text content block")]
    EmptyContent,
}

/// A stage failure that ends an analysis run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("table extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("no tables found in the document")]
    NoTables,

    #[error("table serialization failed: {0}")]
    Serialization(#[from] SerializeError),

    #[error("question loading failed: {0}")]
    QuestionLoad(#[from] QuestionLoadError),

    #[error("no questions found")]
    NoQuestions,

    #[error("model invocation failed: {0}")]
    Invocation(#[from] InvocationError),
}
