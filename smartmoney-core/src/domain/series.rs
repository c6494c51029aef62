//! Series — a validated, date-ordered bar sequence for one symbol.
//!
//! A `Series` owns its bars, the per-bar derived scalars and the rolling
//! volume baseline. Nothing is mutable once the series is built.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Bar;
use crate::indicators::BaselineConfig;

/// Per-bar scalars derived once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarStats {
    /// high - low
    pub range: f64,
    /// |close - open|
    pub body: f64,
    /// close - previous close; 0 for the first bar.
    pub point_change: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("series has no bars")]
    Empty,

    #[error("bar {index} ({date}) is not after the previous bar's date")]
    NotAscending { index: usize, date: NaiveDate },

    #[error("bar {index} ({date}) has non-finite or inconsistent OHLCV values")]
    InvalidBar { index: usize, date: NaiveDate },
}

#[derive(Debug, Clone)]
pub struct Series {
    symbol: String,
    bars: Vec<Bar>,
    stats: Vec<BarStats>,
    avg_volume: Vec<f64>,
}

impl Series {
    /// Build a series from bars that are already sane and strictly ascending.
    pub fn new(
        symbol: impl Into<String>,
        bars: Vec<Bar>,
        baseline: &BaselineConfig,
    ) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }
        for (index, bar) in bars.iter().enumerate() {
            if !bar.is_sane() {
                return Err(SeriesError::InvalidBar {
                    index,
                    date: bar.date,
                });
            }
            if index > 0 && bar.date <= bars[index - 1].date {
                return Err(SeriesError::NotAscending {
                    index,
                    date: bar.date,
                });
            }
        }

        let stats = derive_stats(&bars);
        let avg_volume = baseline.compute(&bars);
        Ok(Self {
            symbol: symbol.into(),
            bars,
            stats,
            avg_volume,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn bar(&self, index: usize) -> &Bar {
        &self.bars[index]
    }

    pub fn stats(&self) -> &[BarStats] {
        &self.stats
    }

    pub fn stat(&self, index: usize) -> &BarStats {
        &self.stats[index]
    }

    pub fn avg_volume(&self) -> &[f64] {
        &self.avg_volume
    }

    pub fn avg_volume_at(&self, index: usize) -> f64 {
        self.avg_volume[index]
    }

    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.bars[self.bars.len() - 1].date
    }
}

fn derive_stats(bars: &[Bar]) -> Vec<BarStats> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| BarStats {
            range: bar.range(),
            body: bar.body(),
            point_change: if i == 0 {
                0.0
            } else {
                bar.close - bars[i - 1].close
            },
        })
        .collect()
}
