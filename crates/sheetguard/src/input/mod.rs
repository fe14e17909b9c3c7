//! Input data model: datasets, sheets, rows and cell coercion.

mod headers;
mod source;
pub mod value;

pub use headers::{normalize_headers, UNKNOWN_HEADER};
pub use source::{Dataset, Row, Sheet};
