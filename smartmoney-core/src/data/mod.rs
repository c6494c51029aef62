//! Series preparation: raw rows in, validated `Series` out.

pub mod prepare;
pub mod raw;

pub use prepare::{
    DroppedRow, DuplicatePolicy, Field, MalformedRow, PrepareConfig, PrepareError,
    PrepareReport, Prepared, Preparer,
};
pub use raw::RawRow;
