use polars::prelude::*;
use std::fs::File;
use std::path::Path;

use crate::error::{CleaningError, CleaningResult};

/// Write a DataFrame as comma-separated UTF-8 text with a header row.
///
/// No row index column is emitted. Dates are written as `YYYY-MM-DD` and
/// missing values as empty fields.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> CleaningResult<()> {
    let mut file = File::create(path).map_err(|e| {
        CleaningError::FilesystemError(format!("Failed to create {}: {}", path.display(), e))
    })?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(df)
        .map_err(|e| {
            CleaningError::FilesystemError(format!("Failed to write {}: {}", path.display(), e))
        })?;

    Ok(())
}
