use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};

use crate::error::QuestionLoadError;

/// Header of the spreadsheet column holding the questions.
pub const QUESTIONS_COLUMN: &str = "Questions";

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(text) if text.is_empty() => None,
        Data::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn questions_from_workbook<RS: Read + Seek>(
    workbook: &mut Xlsx<RS>,
) -> Result<Vec<String>, QuestionLoadError> {
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(QuestionLoadError::NoWorksheet)??;

    let mut rows = range.rows();
    let column = rows
        .next()
        .and_then(|header| {
            header
                .iter()
                .position(|cell| matches!(cell, Data::String(name) if name == QUESTIONS_COLUMN))
        })
        .ok_or_else(|| QuestionLoadError::MissingColumn(QUESTIONS_COLUMN.to_string()))?;

    Ok(rows
        .filter_map(|row| row.get(column).and_then(cell_text))
        .collect())
}

/// Reads the `Questions` column of the first worksheet, skipping empty cells.
pub fn read_questions(path: &Path) -> Result<Vec<String>, QuestionLoadError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let questions = questions_from_workbook(&mut workbook)?;
    tracing::debug!(count = questions.len(), path = %path.display(), "read questions");
    Ok(questions)
}

pub fn read_questions_from_bytes(bytes: &[u8]) -> Result<Vec<String>, QuestionLoadError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))?;
    let questions = questions_from_workbook(&mut workbook)?;
    tracing::debug!(count = questions.len(), "read questions from upload");
    Ok(questions)
}
