use polars::prelude::*;

use crate::core::GeoBounds;

/// Closed-interval predicate over a column read as `Float64`.
///
/// The cast is non-strict, so text that is not a number counts as missing.
/// Missing values compare as null and never satisfy the predicate.
fn between(column: &str, min_value: f64, max_value: f64) -> Expr {
    let value = col(column).cast(DataType::Float64);
    value
        .clone()
        .gt_eq(lit(min_value))
        .and(value.lt_eq(lit(max_value)))
}

/// Keep rows where `min_value <= column <= max_value`.
pub fn filter_by_range(
    df: &DataFrame,
    column: &str,
    min_value: f64,
    max_value: f64,
) -> PolarsResult<DataFrame> {
    df.clone()
        .lazy()
        .filter(between(column, min_value, max_value))
        .collect()
}

/// Keep rows whose coordinates fall inside `bounds`.
pub fn filter_by_bounds(
    df: &DataFrame,
    longitude_column: &str,
    latitude_column: &str,
    bounds: &GeoBounds,
) -> PolarsResult<DataFrame> {
    let inside = between(longitude_column, bounds.min_longitude, bounds.max_longitude).and(
        between(latitude_column, bounds.min_latitude, bounds.max_latitude),
    );

    df.clone().lazy().filter(inside).collect()
}
