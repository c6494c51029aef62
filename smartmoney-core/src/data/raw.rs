//! Raw rows as delivered by an ingestion collaborator (sheet export, CSV, API).
//!
//! Every field is text; the preparer owns parsing and coercion. Mapping source
//! headers onto these six fields is the collaborator's job.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawRow {
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

impl RawRow {
    pub fn new(date: &str, open: &str, high: &str, low: &str, close: &str, volume: &str) -> Self {
        Self {
            date: date.to_string(),
            open: open.to_string(),
            high: high.to_string(),
            low: low.to_string(),
            close: close.to_string(),
            volume: volume.to_string(),
        }
    }

    /// Build a row from already-typed values (ISO date, plain decimal text).
    pub fn from_values(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            open: open.to_string(),
            high: high.to_string(),
            low: low.to_string(),
            close: close.to_string(),
            volume: volume.to_string(),
        }
    }
}
