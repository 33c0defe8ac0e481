use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Formats tried after the preferred one when inferring a date column's format.
pub const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%d-%m-%Y",
    "%B %d, %Y",
    "%d %B %Y",
];

/// Replace every missing value in `column` with `fill_value`.
///
/// Missing covers nulls and, for float columns, NaN. The fill value is cast
/// to the column's type so an integer column stays integer and a float column
/// stays float. Text columns (what the CSV reader infers for an all-empty
/// column) receive the text form of the value.
pub fn impute_missing(df: &DataFrame, column: &str, fill_value: i64) -> PolarsResult<DataFrame> {
    let dtype = df.column(column)?.dtype().clone();
    let expr = match dtype {
        DataType::String => col(column).fill_null(lit(fill_value.to_string())),
        other if other.is_float() => {
            let fill = lit(fill_value).cast(other);
            col(column).fill_nan(fill.clone()).fill_null(fill)
        }
        other => col(column).fill_null(lit(fill_value).cast(other)),
    };

    df.clone().lazy().with_column(expr).collect()
}

fn parse_date(value: &str, format: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(value, format)
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(value, format))
        .ok()
}

/// First format, `preferred` then [`FALLBACK_DATE_FORMATS`], that parses the
/// first parseable value of the column.
pub fn infer_date_format<'a>(values: &StringChunked, preferred: &'a str) -> Option<&'a str> {
    let fallbacks: &[&'a str] = FALLBACK_DATE_FORMATS;
    let candidates = std::iter::once(preferred).chain(fallbacks.iter().copied());

    values.into_iter().flatten().map(str::trim).find_map(|value| {
        candidates
            .clone()
            .find(|format| parse_date(value, format).is_some())
    })
}

/// Parse `column` as calendar dates.
///
/// The column's format is inferred once, trying `preferred_format` first, and
/// then applied to every value. Values with a time of day keep only the date.
/// Parsing is permissive: any value that does not match becomes null instead
/// of failing the whole column.
pub fn coerce_dates(df: &DataFrame, column: &str, preferred_format: &str) -> PolarsResult<DataFrame> {
    let text = df.column(column)?.cast(&DataType::String)?;
    let values = text.str()?;

    let format = infer_date_format(values, preferred_format);
    match format {
        Some(f) => tracing::debug!("Parsing {} with format {}", column, f),
        None => tracing::debug!("No date format matches {}", column),
    }

    let dates = DateChunked::from_naive_date_options(
        column.into(),
        values
            .into_iter()
            .map(|v| v.zip(format).and_then(|(v, f)| parse_date(v.trim(), f))),
    );

    let mut out = df.clone();
    out.with_column(dates.into_series())?;
    Ok(out)
}
