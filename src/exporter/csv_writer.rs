//! CSV file output.
//!
//! UTF-8, comma-delimited, header row first. Quoting follows RFC 4180 via the
//! `csv` crate (fields containing commas, quotes or newlines are quoted).

use std::path::{Path, PathBuf};

use csv::{QuoteStyle, WriterBuilder};

use crate::errors::{ExportError, Result};
use crate::export_catalog::Cell;

/// Write `header` and `rows` to `output_dir/file_name`, truncating any
/// existing file. Returns the path written.
pub fn write_table(
    output_dir: &Path,
    file_name: &str,
    header: &[&str],
    rows: &[Vec<Cell>],
) -> Result<PathBuf> {
    let path = output_dir.join(file_name);
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_path(&path)
        .map_err(|e| ExportError::csv(&path, e))?;

    writer
        .write_record(header)
        .map_err(|e| ExportError::csv(&path, e))?;

    for row in rows {
        writer
            .write_record(row.iter().map(|cell| cell.to_string()))
            .map_err(|e| ExportError::csv(&path, e))?;
    }

    writer.flush().map_err(|e| ExportError::io(&path, e))?;
    Ok(path)
}
