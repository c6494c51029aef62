//! Indicator trait, precomputed indicator values, and concrete indicators.
//!
//! Indicators are pure functions: bar history in, numeric series out. They are
//! computed once before the classifier pass and looked up by bar index during
//! the pass. No recomputation on each bar.

pub mod baseline;
pub mod channel;
pub mod sma;

pub use baseline::{BaselineConfig, WarmupFill};
pub use channel::{ChannelSide, PriorChannel};
pub use sma::VolumeSma;

use crate::domain::Bar;
use std::collections::HashMap;

/// Trait for indicators.
///
/// Indicators take a full bar series and produce a numeric output series of
/// the same length. The first `lookback()` values are `f64::NAN` (warmup).
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "volume_sma_20", "prior_high_10").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Container for precomputed indicator values, queried by bar index.
#[derive(Debug, Clone, Default)]
pub struct IndicatorValues {
    series: HashMap<String, Vec<f64>>,
}

impl IndicatorValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Get the indicator value at a specific bar index.
    pub fn get(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.series
            .get(name)
            .and_then(|v| v.get(bar_index).copied())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.series.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Compute every indicator over `bars` into one container. Indicators sharing
/// a name are computed once.
pub fn precompute(bars: &[Bar], indicators: &[Box<dyn Indicator>]) -> IndicatorValues {
    let mut iv = IndicatorValues::new();
    for indicator in indicators {
        if iv.contains(indicator.name()) {
            continue;
        }
        let series = indicator.compute(bars);
        debug_assert_eq!(
            series.len(),
            bars.len(),
            "indicator '{}' produced {} values for {} bars",
            indicator.name(),
            series.len(),
            bars.len()
        );
        iv.insert(indicator.name(), series);
    }
    iv
}

/// Synthetic bars with the given volumes: open 100, close 101, high 102, low 99.
#[cfg(test)]
pub fn make_volume_bars(volumes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    volumes
        .iter()
        .enumerate()
        .map(|(i, &volume)| Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open: 100.0,
            high: 102.0,
            low: 99.0,
            close: 101.0,
            volume,
        })
        .collect()
}

#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-9;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_values_insert_and_get() {
        let mut iv = IndicatorValues::new();
        iv.insert("prior_high_2", vec![f64::NAN, f64::NAN, 10.0]);
        assert!(iv.get("prior_high_2", 0).unwrap().is_nan());
        assert_eq!(iv.get("prior_high_2", 2), Some(10.0));
        assert_eq!(iv.get("prior_high_2", 3), None);
        assert_eq!(iv.get("missing", 0), None);
    }

    #[test]
    fn precompute_skips_duplicate_names() {
        let bars = make_volume_bars(&[1.0, 2.0, 3.0]);
        let indicators: Vec<Box<dyn Indicator>> = vec![
            Box::new(VolumeSma::new(2)),
            Box::new(VolumeSma::new(2)),
            Box::new(PriorChannel::high(1)),
        ];
        let iv = precompute(&bars, &indicators);
        assert_eq!(iv.len(), 2);
        assert_eq!(iv.get("volume_sma_2", 2), Some(2.5));
        assert_eq!(iv.get("prior_high_1", 1), Some(102.0));
    }
}
