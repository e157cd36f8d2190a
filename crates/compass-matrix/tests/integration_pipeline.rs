mod common;

use std::process::Command;

use compass_matrix::{
    ExtractOptions, PdfSource, QUESTIONS_COLUMN, QuestionLoadError, extract_form_fields,
    extract_tables_from_path, read_questions, read_questions_from_bytes,
};
use tempfile::tempdir;

#[test]
fn extracts_single_table_rows_in_order() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("single.pdf");

    common::create_test_pdf(
        &input,
        &[vec!["Name  Age  Score", "Alice  30  98", "Bob  22  87"]],
    )
    .expect("PDF fixture should be created");

    let (rows, report) = extract_tables_from_path(&input, &ExtractOptions::default())
        .expect("extraction should succeed");

    assert_eq!(report.table_count, 1, "report: {report:?}");
    assert_eq!(report.row_count, 3, "rows: {rows:?}");
    assert_eq!(rows[0], vec!["Name", "Age", "Score"]);
    assert_eq!(rows[1], vec!["Alice", "30", "98"]);
}

#[test]
fn appends_tables_from_multiple_pages() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("multi.pdf");

    common::create_test_pdf(
        &input,
        &[
            vec!["City  Pop  Rank", "A  10  1", "B  20  2"],
            vec!["Product  Qty", "Pen  3", "Book  1"],
        ],
    )
    .expect("PDF fixture should be created");

    let (rows, report) = extract_tables_from_path(&input, &ExtractOptions::default())
        .expect("extraction should succeed");

    assert_eq!(report.table_count, 2, "report: {report:?}");
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[3], vec!["Product", "Qty"]);
    assert_eq!(rows[5], vec!["Book", "1"]);
}

#[test]
fn returns_no_rows_for_non_table_pdf() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("notable.pdf");

    common::create_test_pdf(
        &input,
        &[vec!["This is plain narrative text without columns."]],
    )
    .expect("PDF fixture should be created");

    let (rows, report) = extract_tables_from_path(&input, &ExtractOptions::default())
        .expect("extraction should succeed");
    assert!(rows.is_empty());
    assert_eq!(report.table_count, 0);
}

#[test]
fn returns_no_rows_for_cover_page_pdf() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("cover.pdf");

    common::create_test_pdf(
        &input,
        &[vec![
            "Annual Report 2024",
            "Prepared by the Finance Team",
            "Confidential draft",
        ]],
    )
    .expect("PDF fixture should be created");

    let (rows, report) = extract_tables_from_path(&input, &ExtractOptions::default())
        .expect("extraction should succeed");
    assert!(rows.is_empty(), "rows: {rows:?}");
    assert_eq!(report.table_count, 0);
}

#[test]
fn selected_page_without_table_does_not_borrow_other_pages() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("selected.pdf");

    common::create_test_pdf(
        &input,
        &[
            vec!["Segment  Revenue", "Retail  120", "Wholesale  80"],
            vec!["Notes to the accounts."],
        ],
    )
    .expect("PDF fixture should be created");

    let options = ExtractOptions {
        pages: Some("2".parse().expect("selection")),
        ..ExtractOptions::default()
    };
    let (rows, _) = extract_tables_from_path(&input, &options).expect("extraction should succeed");
    assert!(rows.is_empty(), "rows: {rows:?}");
}

#[test]
fn unreadable_document_is_an_error() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("broken.pdf");
    std::fs::write(&input, b"definitely not a pdf").expect("write");

    assert!(extract_tables_from_path(&input, &ExtractOptions::default()).is_err());
    assert!(
        extract_tables_from_path(&dir.path().join("absent.pdf"), &ExtractOptions::default())
            .is_err()
    );
}

#[test]
fn reads_only_text_form_fields() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("form.pdf");
    common::create_form_pdf(&input).expect("form fixture should be created");

    let fields = extract_form_fields(PdfSource::Path(&input)).expect("fields should be read");

    assert_eq!(fields.len(), 3, "fields: {fields:?}");
    assert_eq!(fields["company"], "Acme Corp");
    assert_eq!(fields["address.city"], "Oslo");
    assert_eq!(fields["notes"], "");
    assert!(!fields.contains_key("agree"));
}

#[test]
fn reads_fields_of_form_encrypted_with_empty_user_password() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("encrypted-form.pdf");
    common::create_encrypted_form_pdf(&input).expect("encrypted form fixture should be created");

    let fields = extract_form_fields(PdfSource::Path(&input)).expect("fields should be read");

    assert_eq!(fields.len(), 2, "fields: {fields:?}");
    assert_eq!(fields["company"], "Acme Corp");
    assert_eq!(fields["totals.revenue"], "1,250.00");
}

#[test]
fn document_without_form_has_no_fields() {
    let bytes = common::test_pdf_bytes(&[vec!["Name  Age", "Alice  30"]]).expect("fixture");
    let fields = extract_form_fields(PdfSource::Bytes(&bytes)).expect("fields should be read");
    assert!(fields.is_empty());
}

#[test]
fn reads_questions_in_row_order_skipping_empty_cells() {
    let dir = tempdir().expect("tempdir should be created");
    let path = dir.path().join("questions.xlsx");
    common::create_questions_xlsx(
        &path,
        &[
            vec![Some("Id"), Some(QUESTIONS_COLUMN)],
            vec![Some("1"), Some("1. What is total revenue?")],
            vec![Some("2"), None],
            vec![Some("3"), Some("3. What is net margin?")],
        ],
    )
    .expect("xlsx fixture should be created");

    let questions = read_questions(&path).expect("questions should load");
    assert_eq!(
        questions,
        vec!["1. What is total revenue?", "3. What is net margin?"]
    );

    let bytes = std::fs::read(&path).expect("read fixture");
    assert_eq!(
        read_questions_from_bytes(&bytes).expect("questions should load from memory"),
        questions
    );
}

#[test]
fn missing_questions_column_is_reported() {
    let dir = tempdir().expect("tempdir should be created");
    let path = dir.path().join("wrong.xlsx");
    common::create_questions_xlsx(
        &path,
        &[vec![Some("Prompt")], vec![Some("What is revenue?")]],
    )
    .expect("xlsx fixture should be created");

    assert!(matches!(
        read_questions(&path),
        Err(QuestionLoadError::MissingColumn(column)) if column == QUESTIONS_COLUMN
    ));
}

#[test]
fn garbage_workbook_is_an_error() {
    assert!(matches!(
        read_questions_from_bytes(b"not a workbook"),
        Err(QuestionLoadError::Workbook(_))
    ));
}

#[test]
fn cli_exits_with_code_2_when_no_tables() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("cli-empty.pdf");
    let output = dir.path().join("cli-empty.csv");

    common::create_test_pdf(&input, &[vec!["No table here"]])
        .expect("PDF fixture should be created");

    let status = Command::new(env!("CARGO_BIN_EXE_compass-matrix"))
        .args([
            "extract",
            "-i",
            &input.to_string_lossy(),
            "-o",
            &output.to_string_lossy(),
        ])
        .status()
        .expect("CLI should run");

    assert_eq!(status.code(), Some(2));
    assert!(!output.exists());
}

#[test]
fn cli_prompt_writes_blob_and_questions() {
    let dir = tempdir().expect("tempdir should be created");
    let document = dir.path().join("report.pdf");
    let questions = dir.path().join("questions.xlsx");
    let output = dir.path().join("prompt.txt");

    common::create_test_pdf(
        &document,
        &[vec!["Name  Age  Score", "Alice  30  98", "Bob  22  87"]],
    )
    .expect("PDF fixture should be created");
    common::create_default_questions_xlsx(&questions, &["Q1", "Q2"])
        .expect("xlsx fixture should be created");

    let status = Command::new(env!("CARGO_BIN_EXE_compass-matrix"))
        .args([
            "prompt",
            "-d",
            &document.to_string_lossy(),
            "-q",
            &questions.to_string_lossy(),
            "-o",
            &output.to_string_lossy(),
        ])
        .status()
        .expect("CLI should run");
    assert_eq!(status.code(), Some(0));

    let prompt = std::fs::read_to_string(&output).expect("prompt should be written");
    assert!(prompt.contains("Alice,30,98\nBob,22,87\n"), "prompt: {prompt:?}");
    assert!(prompt.ends_with("Q1Q2"), "prompt: {prompt:?}");
    assert!(!prompt.contains("confidence_score"));
}
