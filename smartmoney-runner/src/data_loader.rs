//! Row loading for the runner.
//!
//! Reads a CSV with the fixed header `date, symbol, open, high, low, close,
//! volume` and groups the rows by symbol. Cells stay text; parsing and
//! coercion belong to the preparer. Header names are matched exactly and no
//! guessing is attempted. Extra columns are ignored and `symbol` is optional.
//!
//! Synthetic rows are a developer-only debug mode for demos and tests.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

use smartmoney_core::RawRow;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}' (expected date, symbol, open, high, low, close, volume)")]
    MissingColumn(&'static str),

    #[error("input has no data rows")]
    NoRows,

    #[error("symbol '{0}' not found in input")]
    UnknownSymbol(String),
}

/// Options controlling which rows are loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Restrict to these symbols (normalized). Empty means all.
    pub symbols: Vec<String>,
    /// Symbol used for rows without a `symbol` column or value.
    pub default_symbol: String,
    /// Generate synthetic rows instead of reading a file.
    pub synthetic: bool,
    /// Bars per synthetic symbol.
    pub synthetic_bars: usize,
    /// First synthetic date (weekends are skipped).
    pub synthetic_start: NaiveDate,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            default_symbol: "UNKNOWN".to_string(),
            synthetic: false,
            synthetic_bars: 250,
            synthetic_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        }
    }
}

/// Rows per symbol, plus provenance.
#[derive(Debug, Clone, Default)]
pub struct LoadedRows {
    pub rows: BTreeMap<String, Vec<RawRow>>,
    /// Whether the rows were generated rather than read.
    pub has_synthetic: bool,
}

impl LoadedRows {
    pub fn symbols(&self) -> Vec<&str> {
        self.rows.keys().map(String::as_str).collect()
    }

    pub fn total_rows(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }
}

/// Trim and upper-case a symbol for comparison.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Load rows from `path`, or synthesize them when `options.synthetic` is set.
pub fn load_rows(path: Option<&Path>, options: &LoadOptions) -> Result<LoadedRows, LoadError> {
    let wanted: Vec<String> = options.symbols.iter().map(|s| normalize_symbol(s)).collect();

    if options.synthetic {
        let symbols = if wanted.is_empty() {
            vec![normalize_symbol(&options.default_symbol)]
        } else {
            wanted
        };
        let rows = symbols
            .into_iter()
            .map(|symbol| {
                let rows = generate_synthetic_rows(
                    &symbol,
                    options.synthetic_start,
                    options.synthetic_bars,
                );
                (symbol, rows)
            })
            .collect();
        return Ok(LoadedRows {
            rows,
            has_synthetic: true,
        });
    }

    let Some(path) = path else {
        return Err(LoadError::NoRows);
    };
    let file = std::fs::File::open(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let mut rows = read_csv(std::io::BufReader::new(file), &options.default_symbol)?;

    if !wanted.is_empty() {
        if let Some(missing) = wanted.iter().find(|s| !rows.contains_key(*s)) {
            return Err(LoadError::UnknownSymbol(missing.clone()));
        }
        rows.retain(|symbol, _| wanted.contains(symbol));
    }

    Ok(LoadedRows {
        rows,
        has_synthetic: false,
    })
}

/// Read the fixed-schema CSV and group rows by normalized symbol.
///
/// Row order within a symbol is preserved; the preparer sorts.
pub fn read_csv<R: Read>(
    reader: R,
    default_symbol: &str,
) -> Result<BTreeMap<String, Vec<RawRow>>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let column = |name: &'static str| -> Result<usize, LoadError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))
    };
    let date = column("date")?;
    let open = column("open")?;
    let high = column("high")?;
    let low = column("low")?;
    let close = column("close")?;
    let volume = column("volume")?;
    let symbol = headers.iter().position(|h| h == "symbol");

    let fallback = normalize_symbol(default_symbol);
    let mut grouped: BTreeMap<String, Vec<RawRow>> = BTreeMap::new();
    for record in reader.records() {
        let record = record?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").to_string();

        let key = symbol
            .and_then(|idx| record.get(idx))
            .map(normalize_symbol)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| fallback.clone());

        grouped.entry(key).or_default().push(RawRow {
            date: cell(date),
            open: cell(open),
            high: cell(high),
            low: cell(low),
            close: cell(close),
            volume: cell(volume),
        });
    }

    if grouped.is_empty() {
        return Err(LoadError::NoRows);
    }
    Ok(grouped)
}

/// Generate `n` deterministic weekday rows for `symbol`, seeded from its name.
///
/// Volume occasionally spikes so the classifier has something to find.
pub fn generate_synthetic_rows(symbol: &str, start: NaiveDate, n: usize) -> Vec<RawRow> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    // Deterministic seed from symbol name
    let seed_bytes = blake3::hash(symbol.as_bytes());
    let seed: [u8; 32] = *seed_bytes.as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut rows = Vec::with_capacity(n);
    let mut price = 100.0_f64;
    let mut current = start;

    while rows.len() < n {
        let weekday = current.weekday();
        if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let mut volume = rng.gen_range(500_000..5_000_000u64) as f64;
        if rng.gen_bool(0.08) {
            volume *= rng.gen_range(2.0..4.0);
        }

        rows.push(RawRow::from_values(
            current,
            round2(open),
            round2(high),
            round2(low),
            round2(close),
            volume.round(),
        ));

        price = close;
        current += chrono::Duration::days(1);
    }

    rows
}

/// Round a price to cents, keeping the bar internally consistent.
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
date,symbol,open,high,low,close,volume,note
2024-01-03,spy ,101,103,100,102,1100,x
2024-01-02,SPY,100,102,99,101,1000,y
2024-01-02,QQQ,200,202,199,201,2000,z
";

    #[test]
    fn groups_by_normalized_symbol() {
        let grouped = read_csv(SAMPLE.as_bytes(), "UNKNOWN").unwrap();
        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["QQQ", "SPY"]);
        assert_eq!(grouped["SPY"].len(), 2);
        // Input order is preserved
        assert_eq!(grouped["SPY"][0].date, "2024-01-03");
        assert_eq!(grouped["QQQ"][0].close, "201");
    }

    #[test]
    fn symbol_column_is_optional() {
        let text = "date,open,high,low,close,volume\n2024-01-02,1,2,0.5,1.5,10\n";
        let grouped = read_csv(text.as_bytes(), "abc").unwrap();
        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["ABC"]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let text = "date,symbol,open,high,low,close\n2024-01-02,X,1,2,0.5,1.5\n";
        let err = read_csv(text.as_bytes(), "X").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("volume")));
    }

    #[test]
    fn header_names_are_exact() {
        let text = "Date,Symbol,Open,High,Low,Close,Volume\n2024-01-02,X,1,2,0.5,1.5,10\n";
        assert!(matches!(
            read_csv(text.as_bytes(), "X"),
            Err(LoadError::MissingColumn("date"))
        ));
    }

    #[test]
    fn header_only_is_no_rows() {
        let text = "date,symbol,open,high,low,close,volume\n";
        assert!(matches!(read_csv(text.as_bytes(), "X"), Err(LoadError::NoRows)));
    }

    #[test]
    fn synthetic_data_is_deterministic() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let a = generate_synthetic_rows("SPY", start, 50);
        let b = generate_synthetic_rows("SPY", start, 50);
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
    }

    #[test]
    fn different_symbols_get_different_synthetic_data() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let a = generate_synthetic_rows("SPY", start, 20);
        let b = generate_synthetic_rows("QQQ", start, 20);
        assert_ne!(a, b);
    }

    #[test]
    fn synthetic_rows_skip_weekends() {
        // 2024-01-06 is a Saturday
        let start = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let rows = generate_synthetic_rows("SPY", start, 2);
        assert_eq!(rows[0].date, "2024-01-05");
        assert_eq!(rows[1].date, "2024-01-08");
    }

    #[test]
    fn synthetic_load_uses_requested_symbols() {
        let options = LoadOptions {
            symbols: vec!["spy".into(), " qqq".into()],
            synthetic: true,
            synthetic_bars: 30,
            ..LoadOptions::default()
        };
        let loaded = load_rows(None, &options).unwrap();
        assert!(loaded.has_synthetic);
        assert_eq!(loaded.symbols(), vec!["QQQ", "SPY"]);
        assert_eq!(loaded.total_rows(), 60);
    }
}
