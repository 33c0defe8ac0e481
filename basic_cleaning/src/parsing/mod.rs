//! Parsers for listing data files.
//!
//! - [`csv_parser`]: Parse comma-separated listing files into a DataFrame
//!
//! # Example
//!
//! ```no_run
//! use basic_cleaning::parsing::parse_listings_csv;
//! use std::path::Path;
//!
//! let df = parse_listings_csv(Path::new("sample.csv"))
//!     .expect("Failed to parse listings");
//! println!("{} rows", df.height());
//! ```

pub mod csv_parser;


pub use csv_parser::{column_names, parse_listings_csv};
