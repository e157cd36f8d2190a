use std::fmt::Write;

use compass_matrix::pipeline::{AnalysisReport, StatusLevel};
use compass_matrix::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, MAX_MAX_TOKENS, MIN_MAX_TOKENS, ModelChoice};

const PAGE_STYLE: &str = "body{font-family:sans-serif;max-width:52rem;margin:2rem auto;padding:0 1rem}\
label{display:block;margin:.75rem 0 .25rem}\
.status{padding:.5rem .75rem;margin:.5rem 0;border-radius:4px}\
.info{background:#e8f0fe}.success{background:#e6f4ea}.error{background:#fce8e6}\
pre{background:#f6f8fa;padding:1rem;white-space:pre-wrap;word-break:break-word}";

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{PAGE_STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape_html(title)
    )
}

fn level_class(level: StatusLevel) -> &'static str {
    match level {
        StatusLevel::Info => "info",
        StatusLevel::Success => "success",
        StatusLevel::Error => "error",
    }
}

fn upload_form(selected: ModelChoice) -> String {
    let mut options = String::new();
    for choice in ModelChoice::ALL {
        let marker = if choice == selected { " selected" } else { "" };
        let _ = writeln!(
            options,
            "<option value=\"{}\"{marker}>{}</option>",
            escape_html(choice.id()),
            escape_html(choice.label())
        );
    }

    format!(
        "<form method=\"post\" action=\"/analyze\" enctype=\"multipart/form-data\">\n\
         <label for=\"document\">Upload PDF</label>\n\
         <input type=\"file\" id=\"document\" name=\"document\" accept=\"application/pdf,.pdf\">\n\
         <label for=\"questions\">Upload Excel file with questions</label>\n\
         <input type=\"file\" id=\"questions\" name=\"questions\" accept=\".xlsx\">\n\
         <label for=\"model\">Select Model</label>\n\
         <select id=\"model\" name=\"model\">\n{options}</select>\n\
         <label for=\"max_tokens\">Max Tokens</label>\n\
         <input type=\"number\" id=\"max_tokens\" name=\"max_tokens\" min=\"{MIN_MAX_TOKENS}\" max=\"{MAX_MAX_TOKENS}\" value=\"{DEFAULT_MAX_TOKENS}\">\n\
         <label for=\"temperature\">Temperature</label>\n\
         <input type=\"number\" id=\"temperature\" name=\"temperature\" min=\"0\" max=\"1\" step=\"0.01\" value=\"{DEFAULT_TEMPERATURE:.2}\">\n\
         <label><input type=\"checkbox\" name=\"include_explanation\"> Include Explanation</label>\n\
         <p><button type=\"submit\">Analyze</button></p>\n\
         </form>\n"
    )
}

pub fn render_index() -> String {
    let body = format!(
        "<h1>Compass Matrix PDF Analyzer</h1>\n{}",
        upload_form(ModelChoice::default())
    );
    page("Compass Matrix PDF Analyzer", &body)
}

/// Status messages in order, followed by the answer when there is one.
pub fn render_report(report: &AnalysisReport, model: ModelChoice) -> String {
    let mut body = String::from("<h1>Compass Matrix PDF Analyzer</h1>\n");

    for status in &report.messages {
        let _ = writeln!(
            body,
            "<div class=\"status {}\">{}</div>",
            level_class(status.level),
            escape_html(&status.text)
        );
    }

    if !report.answer.is_empty() {
        let _ = writeln!(
            body,
            "<h2>Model Response</h2>\n<pre id=\"answer\">{}</pre>",
            escape_html(&report.answer)
        );
    }

    body.push_str(&upload_form(model));
    page("Compass Matrix PDF Analyzer", &body)
}

pub fn render_error(message: &str) -> String {
    let body = format!(
        "<h1>Compass Matrix PDF Analyzer</h1>\n<div class=\"status error\">{}</div>\n{}",
        escape_html(message),
        upload_form(ModelChoice::default())
    );
    page("Compass Matrix PDF Analyzer", &body)
}
