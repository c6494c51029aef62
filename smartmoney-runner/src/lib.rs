//! SmartMoney Runner — scan orchestration on top of `smartmoney-core`.
//!
//! This crate provides:
//! - TOML scan configuration with defaults and validation
//! - CSV row loading grouped by symbol, with a synthetic debug mode
//! - Per-symbol scans (prepare, classify, fingerprint), optionally in parallel
//! - JSON and CSV artifact export with a run-level manifest

pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;

pub use config::{ConfigError, ScanConfig};
pub use data_loader::{
    generate_synthetic_rows, load_rows, normalize_symbol, read_csv, LoadError, LoadOptions,
    LoadedRows,
};
pub use export::{
    export_json, export_signals_csv, export_tagged_csv, import_json, load_artifacts,
    load_manifest, save_artifacts, save_report, ReportManifest,
};
pub use runner::{
    report_dataset_hash, run_scan, scan_all, RunError, ScanReport, ScanResult, Scanner,
    SymbolFailure, TaggedRow, SCHEMA_VERSION,
};
