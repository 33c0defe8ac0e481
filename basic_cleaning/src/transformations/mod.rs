//! Cleaning rules applied to the listings DataFrame.
//!
//! # Modules
//!
//! - [`cleaning`]: Impute missing values, infer and coerce date columns
//! - [`filtering`]: Closed-interval and bounding-box row filters
//! - [`steps`]: The rules as [`CleaningStep`] values with their required columns
//!
//! # Example
//!
//! ```no_run
//! use basic_cleaning::core::PriceRange;
//! use basic_cleaning::transformations::{CleaningStep, DEFAULT_DATE_FORMAT};
//! use polars::prelude::*;
//!
//! # fn example(mut df: DataFrame) -> PolarsResult<()> {
//! for step in CleaningStep::standard(PriceRange::new(10, 350), DEFAULT_DATE_FORMAT) {
//!     df = step.apply(&df)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod cleaning;
pub mod filtering;
pub mod steps;

pub use cleaning::{coerce_dates, impute_missing, infer_date_format, FALLBACK_DATE_FORMATS};
pub use filtering::{filter_by_bounds, filter_by_range};
pub use steps::{CleaningStep, DEFAULT_DATE_FORMAT};
