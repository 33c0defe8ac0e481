use polars::prelude::*;

use super::cleaning::{coerce_dates, impute_missing};
use super::filtering::{filter_by_bounds, filter_by_range};
use crate::core::{GeoBounds, ListingColumn, PriceRange};

/// Format tried first when parsing `last_review` values.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// One cleaning rule together with the columns it needs.
///
/// A step whose required columns are not all present in the dataset is not
/// applicable and leaves the dataset unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum CleaningStep {
    ImputeMissing {
        column: ListingColumn,
        fill_value: i64,
    },
    FilterPrice(PriceRange),
    FilterGeoBounds(GeoBounds),
    CoerceDates {
        column: ListingColumn,
        format: String,
    },
}

impl CleaningStep {
    /// The fixed cleaning sequence: impute, price, geography, dates.
    pub fn standard(price_range: PriceRange, date_format: &str) -> Vec<CleaningStep> {
        vec![
            CleaningStep::ImputeMissing {
                column: ListingColumn::ReviewsPerMonth,
                fill_value: 0,
            },
            CleaningStep::FilterPrice(price_range),
            CleaningStep::FilterGeoBounds(GeoBounds::NEW_YORK_CITY),
            CleaningStep::CoerceDates {
                column: ListingColumn::LastReview,
                format: date_format.to_string(),
            },
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            CleaningStep::ImputeMissing { .. } => "impute_missing",
            CleaningStep::FilterPrice(_) => "filter_price",
            CleaningStep::FilterGeoBounds(_) => "filter_geo_bounds",
            CleaningStep::CoerceDates { .. } => "coerce_dates",
        }
    }

    /// Human-readable log line for the step.
    pub fn description(&self) -> String {
        match self {
            CleaningStep::ImputeMissing { .. } => "Handling missing values".to_string(),
            CleaningStep::FilterPrice(_) => "Filtering price outliers".to_string(),
            CleaningStep::FilterGeoBounds(_) => "Filtering geographic boundaries".to_string(),
            CleaningStep::CoerceDates { column, .. } => {
                format!("Converting {} to datetime", column)
            }
        }
    }

    pub fn required_columns(&self) -> Vec<ListingColumn> {
        match self {
            CleaningStep::ImputeMissing { column, .. } => vec![*column],
            CleaningStep::FilterPrice(_) => vec![ListingColumn::Price],
            CleaningStep::FilterGeoBounds(_) => {
                vec![ListingColumn::Longitude, ListingColumn::Latitude]
            }
            CleaningStep::CoerceDates { column, .. } => vec![*column],
        }
    }

    pub fn is_applicable(&self, df: &DataFrame) -> bool {
        self.required_columns()
            .iter()
            .all(|c| df.get_column_index(c.as_str()).is_some())
    }

    /// Apply the step, or return the dataset unchanged when not applicable.
    pub fn apply(&self, df: &DataFrame) -> PolarsResult<DataFrame> {
        if !self.is_applicable(df) {
            return Ok(df.clone());
        }

        match self {
            CleaningStep::ImputeMissing { column, fill_value } => {
                impute_missing(df, column.as_str(), *fill_value)
            }
            CleaningStep::FilterPrice(range) => filter_by_range(
                df,
                ListingColumn::Price.as_str(),
                range.min as f64,
                range.max as f64,
            ),
            CleaningStep::FilterGeoBounds(bounds) => filter_by_bounds(
                df,
                ListingColumn::Longitude.as_str(),
                ListingColumn::Latitude.as_str(),
                bounds,
            ),
            CleaningStep::CoerceDates { column, format } => {
                coerce_dates(df, column.as_str(), format)
            }
        }
    }
}
