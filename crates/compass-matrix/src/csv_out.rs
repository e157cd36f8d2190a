use std::fs;
use std::io::Write;
use std::path::Path;

use csv::{Terminator, WriterBuilder};

use crate::error::SerializeError;
use crate::model::Row;

fn write_rows<W: Write>(writer: W, rows: &[Row]) -> Result<W, SerializeError> {
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    writer
        .into_inner()
        .map_err(|error| SerializeError::Io(error.into_error()))
}

/// Writes one CSV record per row, without a header. Rows keep their own width.
pub fn write_table_csv(path: &Path, rows: &[Row]) -> Result<(), SerializeError> {
    let file = fs::File::create(path)?;
    write_rows(file, rows)?.sync_all()?;
    Ok(())
}

pub fn write_table_csv_to_string(rows: &[Row]) -> Result<String, SerializeError> {
    let bytes = write_rows(Vec::new(), rows)?;
    Ok(String::from_utf8(bytes)?)
}

/// Returns the file content as one blob; the rows are not parsed back.
pub fn read_csv_as_string(path: &Path) -> Result<String, SerializeError> {
    Ok(fs::read_to_string(path)?)
}
