//! Smart-money core — bar series preparation, volume baselines, signal classifier.
//!
//! This crate contains the pure, I/O-free heart of the scanner:
//! - Domain types (bars, per-bar stats, series, tags)
//! - Series preparation from raw text rows (coercion, sorting, de-duplication)
//! - Volume baseline and prior-channel indicators
//! - The twelve-rule priority cascade with forward-assigned absorption tags
//! - Signal log and scan fingerprints

pub mod classifier;
pub mod data;
pub mod domain;
pub mod fingerprint;
pub mod indicators;
pub mod params;
pub mod signal_log;

pub use classifier::{classify, Classifier, ClassifierConfig, InsufficientHistory, TaggedSeries};
pub use data::{PrepareConfig, PrepareError, Preparer, RawRow};
pub use domain::{Bar, Series, Tag};
pub use indicators::BaselineConfig;
pub use params::ParamError;
pub use signal_log::{recent_signals, SignalRecord};
