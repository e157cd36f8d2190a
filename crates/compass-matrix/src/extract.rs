use std::path::Path;

use crate::error::ExtractError;
use crate::model::{DetectedTable, PageText, TableData};
use crate::options::ExtractOptions;
use crate::pdf_reader::{PdfSource, read_pdf_pages};
use crate::table_detect::{LOW_CONFIDENCE_THRESHOLD, detect_tables};
use crate::warning::ExtractWarning;

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionReport {
    pub row_count: usize,
    pub table_count: usize,
    pub warnings: Vec<ExtractWarning>,
}

fn ragged_table_warnings(tables: &[DetectedTable]) -> Vec<ExtractWarning> {
    tables
        .iter()
        .filter(|table| table.confidence < LOW_CONFIDENCE_THRESHOLD)
        .map(|table| ExtractWarning::RaggedTable {
            page: table.page,
            rows: table.rows.len(),
            confidence: table.confidence,
        })
        .collect()
}

fn tables_from_pages(
    pages: &[PageText],
    document_text: Option<&str>,
    options: &ExtractOptions,
) -> (TableData, ExtractionReport) {
    let mut warnings = Vec::new();
    let mut tables = detect_tables(pages, options.min_cols);

    // Whole-document text cannot be narrowed to a page selection.
    if tables.is_empty()
        && options.pages.is_none()
        && let Some(text) = document_text.filter(|text| !text.trim().is_empty())
    {
        let whole_document = [PageText {
            page_number: 1,
            text: text.to_string(),
        }];
        let retried = detect_tables(&whole_document, options.min_cols);
        if !retried.is_empty() {
            warnings.push(ExtractWarning::DocumentTextFallback {
                tables: retried.len(),
            });
            tables = retried;
        }
    }

    warnings.extend(ragged_table_warnings(&tables));
    if tables.is_empty() {
        warnings.push(ExtractWarning::NoTablesDetected);
    }

    for warning in &warnings {
        tracing::warn!(page = ?warning.page(), "{warning}");
    }

    let table_count = tables.len();
    let rows = tables
        .into_iter()
        .flat_map(|table| table.rows)
        .collect::<TableData>();

    let report = ExtractionReport {
        row_count: rows.len(),
        table_count,
        warnings,
    };
    (rows, report)
}

/// Collects the rows of every table in the document, in page order and then
/// detection order within a page.
pub fn extract_tables(
    source: PdfSource<'_>,
    options: &ExtractOptions,
) -> Result<(TableData, ExtractionReport), ExtractError> {
    if options.min_cols < 2 {
        return Err(ExtractError::InvalidOption(
            "min_cols must be at least 2".to_string(),
        ));
    }

    let document = source.load()?;
    let document_text = source.extract_text();
    let pages = read_pdf_pages(&document, document_text.as_deref(), options.pages.as_ref())?;
    tracing::debug!(pages = pages.len(), "read document pages");
    Ok(tables_from_pages(&pages, document_text.as_deref(), options))
}

pub fn extract_tables_from_path(
    input_pdf: &Path,
    options: &ExtractOptions,
) -> Result<(TableData, ExtractionReport), ExtractError> {
    if !input_pdf.is_file() {
        return Err(ExtractError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("'{}' is not a readable file", input_pdf.display()),
        )));
    }
    extract_tables(PdfSource::Path(input_pdf), options)
}

pub fn extract_tables_from_bytes(
    input_pdf: &[u8],
    options: &ExtractOptions,
) -> Result<(TableData, ExtractionReport), ExtractError> {
    extract_tables(PdfSource::Bytes(input_pdf), options)
}

#[cfg(test)]
mod tests {
    use super::tables_from_pages;
    use crate::model::PageText;
    use crate::options::ExtractOptions;
    use crate::warning::ExtractWarning;

    fn pages(texts: &[&str]) -> Vec<PageText> {
        texts
            .iter()
            .zip(1..)
            .map(|(text, page_number)| PageText {
                page_number,
                text: (*text).to_string(),
            })
            .collect()
    }

    #[test]
    fn concatenates_rows_across_pages_without_padding() {
        let pages = pages(&[
            "Segment  Revenue  Margin\nRetail  120  4.1",
            "Region  Headcount\nNordics  700",
        ]);
        let (rows, report) = tables_from_pages(&pages, None, &ExtractOptions::default());
        assert_eq!(report.table_count, 2);
        assert_eq!(report.row_count, 4);
        assert_eq!(rows[1], vec!["Retail", "120", "4.1"]);
        assert_eq!(rows[2], vec!["Region", "Headcount"]);
    }

    #[test]
    fn ragged_table_is_kept_with_a_warning() {
        let pages = pages(&["Item  2023  2024  Change\nRevenue  120\nCost  80  85  5  6\nNet  40"]);
        let (rows, report) = tables_from_pages(&pages, None, &ExtractOptions::default());
        assert_eq!(rows.len(), 4);
        assert!(matches!(
            report.warnings.as_slice(),
            [ExtractWarning::RaggedTable { page: 1, rows: 4, .. }]
        ));
    }

    #[test]
    fn reports_when_nothing_is_found() {
        let pages = pages(&["The board met four times during the year."]);
        let (rows, report) = tables_from_pages(&pages, None, &ExtractOptions::default());
        assert!(rows.is_empty());
        assert_eq!(report.warnings, vec![ExtractWarning::NoTablesDetected]);
    }

    #[test]
    fn retries_with_document_text() {
        let pages = pages(&["Quarterly summary."]);
        let (rows, report) = tables_from_pages(
            &pages,
            Some("Quarter  Sales\nQ1  10\nQ2  12"),
            &ExtractOptions::default(),
        );
        assert_eq!(rows.len(), 3);
        assert_eq!(
            report.warnings[0],
            ExtractWarning::DocumentTextFallback { tables: 1 }
        );
    }

    #[test]
    fn page_selection_disables_document_text_retry() {
        let pages = pages(&["Notes to the accounts."]);
        let options = ExtractOptions {
            pages: Some("2".parse().expect("selection")),
            ..ExtractOptions::default()
        };
        let (rows, report) = tables_from_pages(
            &pages,
            Some("Notes to the accounts.\u{000C}Quarter  Sales\nQ1  10\nQ2  12"),
            &options,
        );
        assert!(rows.is_empty());
        assert_eq!(report.warnings, vec![ExtractWarning::NoTablesDetected]);
    }
}
