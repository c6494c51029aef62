//! Scan fingerprinting — deterministic identification of what was scanned and how.
//!
//! - `ConfigHash`: BLAKE3 of the canonical JSON of a configuration.
//! - `DatasetHash`: BLAKE3 of the prepared bars (dates and OHLCV bit patterns).
//! - `ScanFingerprint`: the pair, plus the series extent, recorded with every result.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{Bar, Series};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigHash(pub String);

impl ConfigHash {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes).to_hex().to_string())
    }

    /// Hash the canonical JSON form of `config`.
    ///
    /// Struct fields serialize in declaration order, so the encoding is stable
    /// for a given type.
    pub fn of<T: Serialize>(config: &T) -> Result<Self, serde_json::Error> {
        let json = serde_json::to_vec(config)?;
        Ok(Self::from_bytes(&json))
    }
}

impl fmt::Display for ConfigHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub String);

impl DatasetHash {
    pub fn from_bars(bars: &[Bar]) -> Self {
        let mut hasher = blake3::Hasher::new();
        for bar in bars {
            hasher.update(bar.date.to_string().as_bytes());
            for v in [bar.open, bar.high, bar.low, bar.close, bar.volume] {
                hasher.update(&v.to_bits().to_le_bytes());
            }
        }
        Self(hasher.finalize().to_hex().to_string())
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one symbol's scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFingerprint {
    pub symbol: String,
    pub bars: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub config_hash: ConfigHash,
    pub dataset_hash: DatasetHash,
}

impl ScanFingerprint {
    pub fn new<T: Serialize>(series: &Series, config: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            symbol: series.symbol().to_string(),
            bars: series.len(),
            first_date: series.first_date(),
            last_date: series.last_date(),
            config_hash: ConfigHash::of(config)?,
            dataset_hash: DatasetHash::from_bars(series.bars()),
        })
    }
}
