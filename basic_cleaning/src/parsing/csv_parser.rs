use polars::prelude::*;
use std::path::Path;

use crate::error::{CleaningError, CleaningResult};

/// Cell values read as missing, in addition to empty cells.
pub const NA_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Parse a listings CSV file into a Polars DataFrame.
///
/// The file must have a header row. Column types are inferred from the whole
/// file so a text value late in a numeric-looking column does not fail the
/// read. Empty cells and the [`NA_VALUES`] markers become nulls, so a column
/// such as `reviews_per_month` with `NA` entries is still numeric.
/// Dates are left as text; see [`crate::transformations::coerce_dates`].
pub fn parse_listings_csv(csv_path: &Path) -> CleaningResult<DataFrame> {
    let null_values = NullValues::AllColumns(
        NA_VALUES
            .iter()
            .map(|v| PlSmallStr::from_static(v))
            .collect(),
    );

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|opts| opts.with_null_values(Some(null_values.clone())))
        .try_into_reader_with_file_path(Some(csv_path.into()))
        .and_then(|reader| reader.finish())
        .map_err(|e| {
            CleaningError::ParseError(format!("Failed to parse {}: {}", csv_path.display(), e))
        })?;

    tracing::debug!(
        rows = df.height(),
        columns = df.width(),
        "Parsed {}",
        csv_path.display()
    );

    Ok(df)
}

/// Names of all columns, in file order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}
