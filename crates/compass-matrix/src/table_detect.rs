use crate::model::{DetectedTable, PageText, Row};
use crate::table_parse::{modal_width, soft_split_line_into_cells, split_line_into_cells};

pub(crate) const LOW_CONFIDENCE_THRESHOLD: f32 = 0.60;

#[allow(clippy::cast_precision_loss)]
fn table_confidence(rows: &[Row]) -> f32 {
    if rows.len() < 2 {
        return 0.0;
    }

    let modal = modal_width(rows);
    if modal == 0 {
        return 0.0;
    }

    let consistent =
        rows.iter().filter(|row| row.len() == modal).count() as f32 / rows.len() as f32;
    let max_width = rows.iter().map(Vec::len).max().unwrap_or(modal);
    let min_width = rows.iter().map(Vec::len).min().unwrap_or(modal);
    let uniformity = 1.0 - ((max_width - min_width) as f32 / max_width as f32);

    (consistent * 0.75 + uniformity * 0.25).clamp(0.0, 1.0)
}

/// A candidate table row and whether it came from single-space splitting.
struct CandidateRow {
    cells: Row,
    soft: bool,
}

fn has_digit(cell: &str) -> bool {
    cell.chars().any(|ch| ch.is_ascii_digit())
}

/// Splits on wide gaps first. Single spaces only separate cells when most
/// cells after the label are figures, so headings and prose stay whole.
fn row_cells(line: &str, min_cols: usize) -> Option<CandidateRow> {
    let cells = split_line_into_cells(line);
    if cells.len() >= min_cols {
        return Some(CandidateRow { cells, soft: false });
    }

    let soft_cells = soft_split_line_into_cells(line);
    if soft_cells.len() < min_cols {
        return None;
    }

    let looks_like_sentence = ['.', '!', '?']
        .iter()
        .any(|punctuation| line.trim_end().ends_with(*punctuation));
    let values = &soft_cells[1..];
    let figures = values.iter().filter(|cell| has_digit(cell)).count();
    (!looks_like_sentence && figures * 2 > values.len()).then_some(CandidateRow {
        cells: soft_cells,
        soft: true,
    })
}

/// Runs split only on single spaces must also agree on width.
fn is_table_run(rows: &[CandidateRow]) -> bool {
    if rows.len() < 2 {
        return false;
    }
    if rows.iter().any(|row| !row.soft) {
        return true;
    }
    let width = rows[0].cells.len();
    rows.iter().all(|row| row.cells.len() == width)
}

/// A table is a run of at least two consecutive lines with `min_cols` cells.
fn detect_tables_in_page(page: &PageText, min_cols: usize) -> Vec<DetectedTable> {
    let mut tables = Vec::new();
    let mut current_rows: Vec<CandidateRow> = Vec::new();

    let flush_current = |rows: &mut Vec<CandidateRow>, tables: &mut Vec<DetectedTable>| {
        let run = std::mem::take(rows);
        if !is_table_run(&run) {
            return;
        }
        let rows = run.into_iter().map(|row| row.cells).collect::<Vec<_>>();
        tables.push(DetectedTable {
            page: page.page_number,
            confidence: table_confidence(&rows),
            rows,
        });
    };

    for line in page.text.lines() {
        match row_cells(line, min_cols) {
            Some(row) => current_rows.push(row),
            None => flush_current(&mut current_rows, &mut tables),
        }
    }

    flush_current(&mut current_rows, &mut tables);
    tables
}

pub(crate) fn detect_tables(pages: &[PageText], min_cols: usize) -> Vec<DetectedTable> {
    pages
        .iter()
        .flat_map(|page| detect_tables_in_page(page, min_cols.max(2)))
        .collect()
}
