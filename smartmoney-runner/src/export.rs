//! Export — JSON scan results and CSV tagged series / signal logs.
//!
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: the tagged series per symbol, and the signal log across symbols
//!
//! All persisted JSON includes a `schema_version` field. Unknown versions
//! are rejected on load.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use smartmoney_core::fingerprint::DatasetHash;
use smartmoney_core::{SignalRecord, Tag};

use crate::runner::{
    report_dataset_hash, ScanReport, ScanResult, SymbolFailure, SCHEMA_VERSION,
};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `ScanResult` to pretty JSON.
pub fn export_json(result: &ScanResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize ScanResult to JSON")
}

/// Deserialize a `ScanResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ScanResult> {
    let result: ScanResult =
        serde_json::from_str(json).context("failed to deserialize ScanResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the tagged series of one symbol.
///
/// Columns: date, open, high, low, close, volume, range, body, point_change,
/// avg_volume, tag, label
pub fn export_tagged_csv(result: &ScanResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "date",
        "open",
        "high",
        "low",
        "close",
        "volume",
        "range",
        "body",
        "point_change",
        "avg_volume",
        "tag",
        "label",
    ])?;

    for r in &result.rows {
        wtr.write_record([
            r.date.to_string(),
            format!("{:.4}", r.open),
            format!("{:.4}", r.high),
            format!("{:.4}", r.low),
            format!("{:.4}", r.close),
            r.volume.to_string(),
            format!("{:.4}", r.range),
            format!("{:.4}", r.body),
            format!("{:.4}", r.point_change),
            format!("{:.2}", r.avg_volume),
            r.tag.code().to_string(),
            r.tag.label().to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export a signal log (non-NONE rows only).
///
/// Columns: symbol, date, close, point_change, tag, label, glyph
pub fn export_signals_csv(signals: &[SignalRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "symbol",
        "date",
        "close",
        "point_change",
        "tag",
        "label",
        "glyph",
    ])?;

    for s in signals.iter().filter(|s| !s.tag.is_none()) {
        wtr.write_record([
            s.symbol.clone(),
            s.date.to_string(),
            format!("{:.4}", s.close),
            format!("{:.4}", s.point_change),
            s.tag.code().to_string(),
            s.label().to_string(),
            s.glyph().to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the artifact set for one symbol.
///
/// Creates `{symbol}/` under `output_dir` containing:
/// - `result.json` — the full `ScanResult`
/// - `tagged.csv` — every bar with derived fields and its tag
/// - `signals.csv` — the symbol's signal log
///
/// Returns the path to the created directory.
pub fn save_artifacts(result: &ScanResult, output_dir: &Path) -> Result<PathBuf> {
    check_dir_name(&result.symbol)?;
    let dir = output_dir.join(&result.symbol);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create artifact dir: {}", dir.display()))?;

    std::fs::write(dir.join("result.json"), export_json(result)?)?;
    std::fs::write(dir.join("tagged.csv"), export_tagged_csv(result)?)?;
    std::fs::write(dir.join("signals.csv"), export_signals_csv(&result.signals)?)?;

    Ok(dir)
}

/// A symbol becomes a directory name, so it must stay a single path component.
fn check_dir_name(symbol: &str) -> Result<()> {
    if symbol.is_empty()
        || symbol == "."
        || symbol == ".."
        || symbol.contains(['/', '\\', ':'])
    {
        bail!("symbol {symbol:?} cannot be used as an artifact directory name");
    }
    Ok(())
}

/// Run-level summary written next to the per-symbol directories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportManifest {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub dataset_hash: DatasetHash,
    pub symbols: Vec<String>,
    pub failures: Vec<SymbolFailure>,
    pub counts: BTreeMap<Tag, usize>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl ReportManifest {
    pub fn new(report: &ScanReport) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            dataset_hash: report_dataset_hash(report),
            symbols: report.results.iter().map(|r| r.symbol.clone()).collect(),
            failures: report.failures.clone(),
            counts: report.total_counts(),
        }
    }
}

/// Save every symbol's artifacts plus a combined `signals.csv` and
/// `manifest.json` at the top level.
pub fn save_report(report: &ScanReport, output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let mut dirs = Vec::with_capacity(report.results.len());
    for result in &report.results {
        dirs.push(save_artifacts(result, output_dir)?);
    }

    let combined = export_signals_csv(&report.signals())?;
    std::fs::write(output_dir.join("signals.csv"), combined)?;

    let manifest = serde_json::to_string_pretty(&ReportManifest::new(report))
        .context("failed to serialize report manifest")?;
    std::fs::write(output_dir.join("manifest.json"), manifest)?;
    Ok(dirs)
}

/// Load the run-level manifest written by `save_report`.
pub fn load_manifest(output_dir: &Path) -> Result<ReportManifest> {
    let path = output_dir.join("manifest.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let manifest: ReportManifest =
        serde_json::from_str(&json).context("failed to deserialize report manifest")?;
    if manifest.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            manifest.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(manifest)
}

/// Load a `ScanResult` from an artifact directory's result.json.
///
/// Rejects unknown schema versions.
pub fn load_artifacts(dir: &Path) -> Result<ScanResult> {
    let path = dir.join("result.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}
