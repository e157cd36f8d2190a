mod config;
mod csv_out;
mod error;
mod extract;
mod form_fields;
mod invoke;
mod model;
mod options;
mod pdf_reader;
pub mod pipeline;
mod prompt;
mod questions;
mod table_detect;
mod table_parse;
mod warning;

pub use config::{
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, MAX_MAX_TOKENS, MIN_MAX_TOKENS, ModelChoice,
    ModelConfig,
};
pub use csv_out::{read_csv_as_string, write_table_csv, write_table_csv_to_string};
pub use error::{
    ConfigError, ExtractError, FormFieldError, InvocationError, PipelineError, QuestionLoadError,
    SerializeError,
};
pub use extract::{
    ExtractionReport, extract_tables, extract_tables_from_bytes, extract_tables_from_path,
};
pub use form_fields::{FormFields, extract_form_fields};
pub use invoke::{
    ANTHROPIC_BEDROCK_VERSION, InvokeRequest, ModelAnswer, ModelTransport, TransportResponse,
    extract_answer_text, invoke_model,
};
pub use model::{Row, TableData};
pub use options::{ExtractOptions, PageSelection};
pub use pdf_reader::PdfSource;
pub use prompt::{QUESTIONS_SEPARATOR, THOUSAND_SEPARATOR_INSTRUCTION, build_prompt};
pub use questions::{QUESTIONS_COLUMN, read_questions, read_questions_from_bytes};
pub use warning::ExtractWarning;
