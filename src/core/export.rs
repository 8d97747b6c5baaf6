// SegmentLens - core/export.rs
//
// CSV and JSON export of filtered rows.
// Core layer: writes to any Write trait object.

use crate::util::constants::MAX_EXPORT_ROWS;
use crate::util::error::ExportError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

fn check_size(count: usize) -> Result<(), ExportError> {
    if count > MAX_EXPORT_ROWS {
        return Err(ExportError::TooManyRows {
            count,
            max: MAX_EXPORT_ROWS,
        });
    }
    Ok(())
}

/// Export rows to CSV. The header row is derived from the record's field
/// names; absent optional values are written as empty cells.
pub fn export_csv<T: Serialize, W: Write>(
    rows: &[T],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_size(rows.len())?;

    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row).map_err(|e| ExportError::Csv {
            path: export_path.to_path_buf(),
            source: e,
        })?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(rows = rows.len(), path = %export_path.display(), "CSV export written");
    Ok(rows.len())
}

/// Export rows to JSON format (array of objects).
pub fn export_json<T: Serialize, W: Write>(
    rows: &[T],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_size(rows.len())?;

    serde_json::to_writer_pretty(writer, rows).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(rows = rows.len(), path = %export_path.display(), "JSON export written");
    Ok(rows.len())
}
