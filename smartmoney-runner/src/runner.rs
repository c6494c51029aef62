//! Scan runner — wires together loading, preparation, classification and fingerprints.
//!
//! Entry points:
//! - `Scanner::scan()`: one symbol's raw rows to a `ScanResult`.
//! - `scan_all()`: every symbol of a `LoadedRows`, optionally in parallel.
//! - `run_scan()`: load from a file (or synthesize) then `scan_all()`. Used by the CLI.
//!
//! Parallelism is across symbols only; each symbol's pass is sequential.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use smartmoney_core::data::{PrepareReport, Preparer};
use smartmoney_core::fingerprint::{DatasetHash, ScanFingerprint};
use smartmoney_core::signal_log::recent_signals;
use smartmoney_core::{
    Classifier, InsufficientHistory, PrepareError, RawRow, SignalRecord, Tag, TaggedSeries,
};

use crate::config::{ConfigError, ScanConfig};
use crate::data_loader::{load_rows, LoadError, LoadOptions, LoadedRows};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("prepare error: {0}")]
    Prepare(#[from] PrepareError),
    #[error("fingerprint error: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// One bar of the tagged series, flattened for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub range: f64,
    pub body: f64,
    pub point_change: f64,
    pub avg_volume: f64,
    pub tag: Tag,
}

/// Complete result of scanning one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub symbol: String,
    pub fingerprint: ScanFingerprint,
    pub config: ScanConfig,
    pub has_synthetic: bool,
    pub prepare_report: PrepareReport,
    /// Set when the series was too short to classify.
    pub warning: Option<InsufficientHistory>,
    pub counts: BTreeMap<Tag, usize>,
    pub signals: Vec<SignalRecord>,
    pub rows: Vec<TaggedRow>,
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl ScanResult {
    pub fn bar_count(&self) -> usize {
        self.rows.len()
    }

    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.rows.iter().map(|r| r.tag).collect()
    }
}

/// A symbol that could not be scanned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolFailure {
    pub symbol: String,
    pub error: String,
}

/// Results for every symbol of one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    pub results: Vec<ScanResult>,
    pub failures: Vec<SymbolFailure>,
}

impl ScanReport {
    /// All signals across symbols, in symbol then date order.
    pub fn signals(&self) -> Vec<SignalRecord> {
        self.results
            .iter()
            .flat_map(|r| r.signals.iter().cloned())
            .collect()
    }

    /// Last bar date across every scanned symbol.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.results.iter().map(|r| r.fingerprint.last_date).max()
    }

    /// Signals within `days` of the latest bar date, newest first.
    pub fn recent_signals(&self, days: u32) -> Vec<SignalRecord> {
        match self.latest_date() {
            Some(latest) => recent_signals(&self.signals(), latest, days),
            None => Vec::new(),
        }
    }

    pub fn total_counts(&self) -> BTreeMap<Tag, usize> {
        let mut totals = BTreeMap::new();
        for result in &self.results {
            for (tag, n) in &result.counts {
                *totals.entry(*tag).or_insert(0) += n;
            }
        }
        totals
    }
}

/// A validated configuration with its preparer and classifier built once.
pub struct Scanner {
    config: ScanConfig,
    preparer: Preparer,
    classifier: Classifier,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let classifier = Classifier::new(config.classifier.clone())?;
        let preparer = config.preparer();
        Ok(Self {
            config,
            preparer,
            classifier,
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Prepare and classify one symbol's rows.
    pub fn scan(
        &self,
        symbol: &str,
        rows: &[RawRow],
        has_synthetic: bool,
    ) -> Result<ScanResult, RunError> {
        let prepared = self.preparer.prepare(symbol, rows)?;
        let fingerprint = ScanFingerprint::new(&prepared.series, &self.config)?;
        let tagged = self.classifier.classify(prepared.series);

        let result = ScanResult {
            schema_version: SCHEMA_VERSION,
            symbol: symbol.to_string(),
            fingerprint,
            config: self.config.clone(),
            has_synthetic,
            prepare_report: prepared.report,
            warning: tagged.warning().copied(),
            counts: tagged.counts(),
            signals: tagged.signals(),
            rows: tagged_rows(&tagged),
        };

        info!(
            symbol,
            bars = result.bar_count(),
            signals = result.signal_count(),
            dropped = result.prepare_report.dropped_count(),
            "scanned symbol"
        );
        Ok(result)
    }
}

fn tagged_rows(tagged: &TaggedSeries) -> Vec<TaggedRow> {
    let series = tagged.series();
    series
        .bars()
        .iter()
        .zip(series.stats())
        .zip(series.avg_volume())
        .zip(tagged.tags())
        .map(|(((bar, stat), avg), tag)| TaggedRow {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            range: stat.range,
            body: stat.body,
            point_change: stat.point_change,
            avg_volume: *avg,
            tag: *tag,
        })
        .collect()
}

/// Scan every symbol in `loaded`. Per-symbol failures are collected, not fatal.
///
/// Results are in symbol order regardless of `parallel`.
pub fn scan_all(scanner: &Scanner, loaded: &LoadedRows, parallel: bool) -> ScanReport {
    let symbols: Vec<(&String, &Vec<RawRow>)> = loaded.rows.iter().collect();
    let scan_one = |(symbol, rows): &(&String, &Vec<RawRow>)| {
        (
            symbol.to_string(),
            scanner.scan(symbol, rows, loaded.has_synthetic),
        )
    };

    let outcomes: Vec<(String, Result<ScanResult, RunError>)> = if parallel {
        symbols.par_iter().map(scan_one).collect()
    } else {
        symbols.iter().map(scan_one).collect()
    };

    let mut report = ScanReport::default();
    for (symbol, outcome) in outcomes {
        match outcome {
            Ok(result) => report.results.push(result),
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "symbol failed");
                report.failures.push(SymbolFailure {
                    symbol,
                    error: e.to_string(),
                });
            }
        }
    }
    report
}

/// Load rows (or synthesize them) and scan every symbol.
pub fn run_scan(
    path: Option<&Path>,
    options: &LoadOptions,
    config: &ScanConfig,
    parallel: bool,
) -> Result<ScanReport, RunError> {
    let scanner = Scanner::new(config.clone())?;
    let loaded = load_rows(path, options)?;
    info!(
        symbols = loaded.rows.len(),
        rows = loaded.total_rows(),
        synthetic = loaded.has_synthetic,
        "loaded input"
    );
    Ok(scan_all(&scanner, &loaded, parallel))
}

/// Dataset hash over every symbol of a report, for run-level identification.
pub fn report_dataset_hash(report: &ScanReport) -> DatasetHash {
    let joined: String = report
        .results
        .iter()
        .map(|r| format!("{}:{};", r.symbol, r.fingerprint.dataset_hash))
        .collect();
    DatasetHash(blake3::hash(joined.as_bytes()).to_hex().to_string())
}
