//! Series preparer: parse, coerce, validate, sort, dedupe, derive.
//!
//! Bad rows are recovered from locally: they are dropped and listed in the
//! [`PrepareReport`]. Only an empty result (or a duplicate date under
//! [`DuplicatePolicy::Reject`]) is a hard failure.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

use super::raw::RawRow;
use crate::domain::{Bar, Series, SeriesError};
use crate::indicators::BaselineConfig;

/// What to do when several rows share a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first row in input order.
    #[default]
    KeepFirst,
    /// Keep the last row in input order.
    KeepLast,
    /// Fail with [`PrepareError::DuplicateDate`].
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareConfig {
    pub duplicate_policy: DuplicatePolicy,
    /// chrono format strings tried in order. Formats containing `%H` are
    /// parsed as date-times and truncated to the date.
    pub date_formats: Vec<String>,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::KeepFirst,
            date_formats: [
                "%Y-%m-%d",
                "%Y/%m/%d",
                "%m/%d/%Y",
                "%d-%m-%Y",
                "%Y-%m-%d %H:%M:%S",
            ]
            .iter()
            .map(|f| f.to_string())
            .collect(),
        }
    }
}

/// OHLCV column of a raw row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Open => "open",
            Field::High => "high",
            Field::Low => "low",
            Field::Close => "close",
            Field::Volume => "volume",
        };
        f.write_str(name)
    }
}

/// Why a row was dropped.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MalformedRow {
    #[error("unparseable date '{value}'")]
    UnparseableDate { value: String },

    #[error("non-numeric {field} '{value}'")]
    NonNumeric { field: Field, value: String },

    #[error("non-finite {field}")]
    NonFinite { field: Field },

    #[error("inconsistent prices (expected low <= open, close <= high)")]
    InconsistentPrices,

    #[error("negative volume")]
    NegativeVolume,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedRow {
    /// Zero-based position in the input.
    pub row: usize,
    pub reason: MalformedRow,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrepareReport {
    pub rows_in: usize,
    pub rows_kept: usize,
    pub dropped: Vec<DroppedRow>,
    pub duplicates_removed: usize,
}

impl PrepareReport {
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrepareError {
    #[error("no valid rows for '{symbol}' ({rows_in} in, {dropped} dropped)")]
    EmptySeries {
        symbol: String,
        rows_in: usize,
        dropped: usize,
    },

    #[error("duplicate date {date} for '{symbol}'")]
    DuplicateDate { symbol: String, date: NaiveDate },

    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// A prepared series plus the cleaning report.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub series: Series,
    pub report: PrepareReport,
}

#[derive(Debug, Clone, Default)]
pub struct Preparer {
    config: PrepareConfig,
    baseline: BaselineConfig,
}

impl Preparer {
    pub fn new(config: PrepareConfig, baseline: BaselineConfig) -> Self {
        Self { config, baseline }
    }

    pub fn config(&self) -> &PrepareConfig {
        &self.config
    }

    pub fn prepare(&self, symbol: &str, rows: &[RawRow]) -> Result<Prepared, PrepareError> {
        let mut report = PrepareReport {
            rows_in: rows.len(),
            ..PrepareReport::default()
        };

        let mut bars = Vec::with_capacity(rows.len());
        for (row, raw) in rows.iter().enumerate() {
            match self.parse_row(raw) {
                Ok(bar) => bars.push(bar),
                Err(reason) => report.dropped.push(DroppedRow { row, reason }),
            }
        }

        if !report.dropped.is_empty() {
            warn!(
                symbol,
                dropped = report.dropped.len(),
                rows_in = report.rows_in,
                "dropped malformed rows"
            );
        }

        if bars.is_empty() {
            return Err(PrepareError::EmptySeries {
                symbol: symbol.to_string(),
                rows_in: report.rows_in,
                dropped: report.dropped.len(),
            });
        }

        // Stable sort keeps input order among equal dates.
        bars.sort_by_key(|b| b.date);
        let before = bars.len();
        let bars = self.dedupe(symbol, bars)?;
        report.duplicates_removed = before - bars.len();
        report.rows_kept = bars.len();

        debug!(
            symbol,
            rows_kept = report.rows_kept,
            duplicates_removed = report.duplicates_removed,
            "prepared series"
        );

        let series = Series::new(symbol, bars, &self.baseline)?;
        Ok(Prepared { series, report })
    }

    fn parse_row(&self, raw: &RawRow) -> Result<Bar, MalformedRow> {
        let date = self.parse_date(&raw.date)?;
        let bar = Bar {
            date,
            open: coerce(&raw.open, Field::Open)?,
            high: coerce(&raw.high, Field::High)?,
            low: coerce(&raw.low, Field::Low)?,
            close: coerce(&raw.close, Field::Close)?,
            volume: coerce(&raw.volume, Field::Volume)?,
        };
        if bar.volume < 0.0 {
            return Err(MalformedRow::NegativeVolume);
        }
        if !bar.is_sane() {
            return Err(MalformedRow::InconsistentPrices);
        }
        Ok(bar)
    }

    fn parse_date(&self, value: &str) -> Result<NaiveDate, MalformedRow> {
        let trimmed = value.trim();
        self.config
            .date_formats
            .iter()
            .find_map(|fmt| {
                if fmt.contains("%H") {
                    NaiveDateTime::parse_from_str(trimmed, fmt)
                        .ok()
                        .map(|dt| dt.date())
                } else {
                    NaiveDate::parse_from_str(trimmed, fmt).ok()
                }
            })
            .ok_or_else(|| MalformedRow::UnparseableDate {
                value: value.to_string(),
            })
    }

    fn dedupe(&self, symbol: &str, bars: Vec<Bar>) -> Result<Vec<Bar>, PrepareError> {
        let mut out: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match out.last_mut() {
                Some(last) if last.date == bar.date => match self.config.duplicate_policy {
                    DuplicatePolicy::KeepFirst => {}
                    DuplicatePolicy::KeepLast => *last = bar,
                    DuplicatePolicy::Reject => {
                        return Err(PrepareError::DuplicateDate {
                            symbol: symbol.to_string(),
                            date: bar.date,
                        })
                    }
                },
                _ => out.push(bar),
            }
        }
        Ok(out)
    }
}

/// Coerce a text cell to a finite number. Thousands separators are stripped.
fn coerce(value: &str, field: Field) -> Result<f64, MalformedRow> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    let parsed: f64 = cleaned.parse().map_err(|_| MalformedRow::NonNumeric {
        field,
        value: value.to_string(),
    })?;
    if !parsed.is_finite() {
        return Err(MalformedRow::NonFinite { field });
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, o: &str, h: &str, l: &str, c: &str, v: &str) -> RawRow {
        RawRow::new(date, o, h, l, c, v)
    }

    fn ok_row(date: &str, close: &str) -> RawRow {
        row(date, "100", "110", "90", close, "1000")
    }

    #[test]
    fn sorts_ascending_by_date() {
        let rows = vec![
            ok_row("2024-01-04", "103"),
            ok_row("2024-01-02", "101"),
            ok_row("2024-01-03", "102"),
        ];
        let prepared = Preparer::default().prepare("ABC", &rows).unwrap();
        let closes: Vec<f64> = prepared.series.bars().iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![101.0, 102.0, 103.0]);
        assert_eq!(prepared.report.rows_kept, 3);
    }

    #[test]
    fn drops_unparseable_date_and_non_numeric() {
        let rows = vec![
            ok_row("2024-01-02", "101"),
            ok_row("not a date", "101"),
            row("2024-01-03", "100", "abc", "90", "101", "1000"),
            row("2024-01-04", "100", "110", "90", "NaN", "1000"),
            ok_row("2024-01-05", "102"),
        ];
        let prepared = Preparer::default().prepare("ABC", &rows).unwrap();
        let report = &prepared.report;

        assert_eq!(report.rows_in, 5);
        assert_eq!(report.rows_kept, 2);
        assert_eq!(report.dropped_count(), 3);
        assert_eq!(report.dropped[0].row, 1);
        assert!(matches!(
            report.dropped[0].reason,
            MalformedRow::UnparseableDate { .. }
        ));
        assert_eq!(
            report.dropped[1].reason,
            MalformedRow::NonNumeric {
                field: Field::High,
                value: "abc".into()
            }
        );
        assert_eq!(
            report.dropped[2].reason,
            MalformedRow::NonFinite {
                field: Field::Close
            }
        );
    }

    #[test]
    fn drops_inconsistent_and_negative_volume_rows() {
        let rows = vec![
            row("2024-01-02", "100", "90", "110", "100", "1000"),
            row("2024-01-03", "100", "110", "90", "120", "1000"),
            row("2024-01-04", "100", "110", "90", "100", "-5"),
            ok_row("2024-01-05", "101"),
        ];
        let prepared = Preparer::default().prepare("ABC", &rows).unwrap();
        let reasons: Vec<_> = prepared.report.dropped.iter().map(|d| &d.reason).collect();
        assert_eq!(
            reasons,
            vec![
                &MalformedRow::InconsistentPrices,
                &MalformedRow::InconsistentPrices,
                &MalformedRow::NegativeVolume,
            ]
        );
        assert_eq!(prepared.series.len(), 1);
    }

    #[test]
    fn empty_after_cleaning_is_fatal() {
        let rows = vec![ok_row("garbage", "1"), ok_row("", "1")];
        let err = Preparer::default().prepare("ABC", &rows).unwrap_err();
        assert_eq!(
            err,
            PrepareError::EmptySeries {
                symbol: "ABC".into(),
                rows_in: 2,
                dropped: 2
            }
        );

        let err = Preparer::default().prepare("ABC", &[]).unwrap_err();
        assert!(matches!(err, PrepareError::EmptySeries { rows_in: 0, .. }));
    }

    #[test]
    fn keep_first_on_duplicate_dates() {
        let rows = vec![
            ok_row("2024-01-03", "105"),
            ok_row("2024-01-02", "101"),
            ok_row("2024-01-03", "107"),
        ];
        let prepared = Preparer::default().prepare("ABC", &rows).unwrap();
        assert_eq!(prepared.series.len(), 2);
        assert_eq!(prepared.series.bar(1).close, 105.0);
        assert_eq!(prepared.report.duplicates_removed, 1);
    }

    #[test]
    fn keep_last_on_duplicate_dates() {
        let rows = vec![
            ok_row("2024-01-03", "105"),
            ok_row("2024-01-02", "101"),
            ok_row("2024-01-03", "107"),
        ];
        let preparer = Preparer::new(
            PrepareConfig {
                duplicate_policy: DuplicatePolicy::KeepLast,
                ..PrepareConfig::default()
            },
            BaselineConfig::default(),
        );
        let prepared = preparer.prepare("ABC", &rows).unwrap();
        assert_eq!(prepared.series.bar(1).close, 107.0);
    }

    #[test]
    fn reject_on_duplicate_dates() {
        let rows = vec![ok_row("2024-01-03", "105"), ok_row("2024-01-03", "107")];
        let preparer = Preparer::new(
            PrepareConfig {
                duplicate_policy: DuplicatePolicy::Reject,
                ..PrepareConfig::default()
            },
            BaselineConfig::default(),
        );
        let err = preparer.prepare("ABC", &rows).unwrap_err();
        assert!(matches!(err, PrepareError::DuplicateDate { .. }));
    }

    #[test]
    fn accepts_alternate_date_formats_and_separators() {
        let rows = vec![
            row("01/02/2024", "1,000", "1,100", "900", "1,050", "12,345"),
            row("2024/01/03", "1000", "1100", "900", "1050", "1"),
            row("2024-01-04 00:00:00", "1000", "1100", "900", "1050", "1"),
            row(" 05-01-2024 ", "1000", "1100", "900", "1050", "1"),
        ];
        let prepared = Preparer::default().prepare("ABC", &rows).unwrap();
        assert_eq!(prepared.series.len(), 4);
        assert_eq!(prepared.series.bar(0).volume, 12_345.0);
        assert_eq!(prepared.series.bar(0).open, 1_000.0);
        assert_eq!(
            prepared.series.last_date(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
    }

    #[test]
    fn derived_fields_and_baseline_are_populated() {
        let rows = vec![ok_row("2024-01-02", "101"), ok_row("2024-01-03", "104")];
        let prepared = Preparer::default().prepare("ABC", &rows).unwrap();
        let series = &prepared.series;
        assert_eq!(series.stat(1).point_change, 3.0);
        assert_eq!(series.stat(1).body, 4.0);
        assert_eq!(series.stat(1).range, 20.0);
        assert!(series.avg_volume().iter().all(|v| *v == 1000.0));
    }

    #[test]
    fn malformed_row_serializes_with_kind() {
        let json = serde_json::to_string(&MalformedRow::NonFinite {
            field: Field::Volume,
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"non_finite","field":"volume"}"#);
    }
}
