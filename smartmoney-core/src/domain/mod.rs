//! Domain types: bars, series, signal tags.

pub mod bar;
pub mod series;
pub mod tag;

pub use bar::Bar;
pub use series::{BarStats, Series, SeriesError};
pub use tag::{ParseTagError, Tag};
