//! Output file handling.
//!
//! - [`writer`]: Serialize a DataFrame to CSV
//! - [`scratch`]: Scoped ownership of the temporary output file

pub mod scratch;
pub mod writer;

pub use scratch::ScratchFile;
pub use writer::write_csv;
