//! Rolling average-volume baseline with an explicit warm-up fill policy.
//!
//! The classifier compares every bar's volume against `avg_volume[i]`, so the
//! baseline must be defined for every bar. The rolling mean is undefined for
//! the first `W - 1` bars; [`WarmupFill`] decides what those bars get.

use serde::{Deserialize, Serialize};

use super::{Indicator, VolumeSma};
use crate::domain::Bar;
use crate::params::{check_window, ParamError};

/// How leading bars without a full rolling window are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarmupFill {
    /// Take the first defined rolling value; if the series is shorter than the
    /// window, every bar takes the series' mean volume.
    #[default]
    Backfill,
    /// Every undefined bar takes the series' mean volume.
    SeriesMean,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineConfig {
    /// Upper bound on the rolling window, W.
    pub window: usize,
    /// Floor applied when the window adapts to a short series.
    pub min_window: usize,
    /// Shrink the window to `max(min_window, len / 2)` on short series.
    pub adaptive: bool,
    pub warmup: WarmupFill,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            window: 20,
            min_window: 5,
            adaptive: true,
            warmup: WarmupFill::Backfill,
        }
    }
}

impl BaselineConfig {
    /// Fixed window, no adaptation.
    pub fn fixed(window: usize) -> Self {
        Self {
            window,
            adaptive: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        check_window("baseline.window", self.window, 1)?;
        check_window("baseline.min_window", self.min_window, 1)?;
        Ok(())
    }

    /// Window actually used for a series of `len` bars. Always >= 1.
    pub fn effective_window(&self, len: usize) -> usize {
        let window = if self.adaptive {
            self.window.min(self.min_window.max(len / 2))
        } else {
            self.window
        };
        window.max(1)
    }

    /// Compute the filled baseline. The result has no NaN values.
    pub fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        if bars.is_empty() {
            return Vec::new();
        }

        let window = self.effective_window(bars.len());
        let mut values = VolumeSma::new(window).compute(bars);
        let mean = bars.iter().map(|b| b.volume).sum::<f64>() / bars.len() as f64;

        let fill = match self.warmup {
            WarmupFill::Backfill => values.iter().copied().find(|v| !v.is_nan()).unwrap_or(mean),
            WarmupFill::SeriesMean => mean,
        };
        for v in values.iter_mut().filter(|v| v.is_nan()) {
            *v = fill;
        }

        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_volume_bars, DEFAULT_EPSILON};

    #[test]
    fn adaptive_window_shrinks_on_short_series() {
        let cfg = BaselineConfig::default();
        assert_eq!(cfg.effective_window(100), 20);
        assert_eq!(cfg.effective_window(30), 15);
        assert_eq!(cfg.effective_window(6), 5);
        assert_eq!(cfg.effective_window(0), 5);
    }

    #[test]
    fn fixed_window_ignores_length() {
        let cfg = BaselineConfig::fixed(10);
        assert_eq!(cfg.effective_window(4), 10);
        assert_eq!(cfg.effective_window(400), 10);
    }

    #[test]
    fn backfill_uses_first_defined_value() {
        let bars = make_volume_bars(&[10.0, 20.0, 30.0, 40.0]);
        let result = BaselineConfig::fixed(3).compute(&bars);
        assert_approx(result[0], 20.0, DEFAULT_EPSILON);
        assert_approx(result[1], 20.0, DEFAULT_EPSILON);
        assert_approx(result[2], 20.0, DEFAULT_EPSILON);
        assert_approx(result[3], 30.0, DEFAULT_EPSILON);
    }

    #[test]
    fn series_mean_fill() {
        let bars = make_volume_bars(&[10.0, 20.0, 30.0, 40.0]);
        let cfg = BaselineConfig {
            warmup: WarmupFill::SeriesMean,
            ..BaselineConfig::fixed(3)
        };
        let result = cfg.compute(&bars);
        assert_approx(result[0], 25.0, DEFAULT_EPSILON);
        assert_approx(result[1], 25.0, DEFAULT_EPSILON);
        assert_approx(result[2], 20.0, DEFAULT_EPSILON);
    }

    #[test]
    fn series_shorter_than_window_falls_back_to_mean() {
        let bars = make_volume_bars(&[10.0, 30.0]);
        let result = BaselineConfig::fixed(10).compute(&bars);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|v| !v.is_nan()));
        assert_approx(result[0], 20.0, DEFAULT_EPSILON);
        assert_approx(result[1], 20.0, DEFAULT_EPSILON);
    }

    #[test]
    fn empty_series_gives_empty_baseline() {
        assert!(BaselineConfig::default().compute(&[]).is_empty());
    }

    #[test]
    fn validate_rejects_zero_window() {
        let cfg = BaselineConfig::fixed(0);
        assert!(cfg.validate().is_err());
    }
}
