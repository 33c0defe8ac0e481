//! # Basic Cleaning
//!
//! Cleaning step of the NYC Airbnb price model pipeline.
//!
//! A run fetches a versioned raw listings CSV from the tracking service,
//! applies a fixed sequence of cleaning rules, writes the result to a
//! temporary CSV and publishes it back as a new artifact version.
//!
//! ## Architecture
//!
//! - [`core`]: Schema descriptor, price range, geographic bounds, artifact types
//! - [`parsing`]: CSV loading into a Polars DataFrame
//! - [`transformations`]: Imputation, range and bounding-box filters, date coercion
//! - [`io`]: CSV writing and the scoped temporary output file
//! - [`tracking`]: Run context trait and the filesystem-backed tracker
//! - [`preprocessing`]: The cleaning pipeline tying everything together
//! - [`config`]: TOML settings with environment overrides

pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod parsing;
pub mod preprocessing;
pub mod tracking;
pub mod transformations;

pub use error::{CleaningError, CleaningResult};
pub use preprocessing::{clean, CleanRequest, CleaningPipeline, CleaningReport};
