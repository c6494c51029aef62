//! Prior channel — highest high / lowest low over the N bars *before* bar t.
//!
//! Unlike a Donchian channel, the current bar is excluded, so a bar can
//! break out of its own channel:
//! - High: max(high[t-period..t])
//! - Low:  min(low[t-period..t])
//!
//! Lookback: period (first valid value at index period).

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSide {
    High,
    Low,
}

#[derive(Debug, Clone)]
pub struct PriorChannel {
    period: usize,
    side: ChannelSide,
    name: String,
}

impl PriorChannel {
    pub fn high(period: usize) -> Self {
        Self::new(period, ChannelSide::High)
    }

    pub fn low(period: usize) -> Self {
        Self::new(period, ChannelSide::Low)
    }

    pub fn new(period: usize, side: ChannelSide) -> Self {
        assert!(period >= 1, "prior channel period must be >= 1");
        Self {
            period,
            side,
            name: Self::key(period, side),
        }
    }

    /// Lookup key under which the channel is stored in `IndicatorValues`.
    pub fn key(period: usize, side: ChannelSide) -> String {
        match side {
            ChannelSide::High => format!("prior_high_{period}"),
            ChannelSide::Low => format!("prior_low_{period}"),
        }
    }
}

impl Indicator for PriorChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        for i in self.period..n {
            let window = &bars[i - self.period..i];
            result[i] = match self.side {
                ChannelSide::High => window
                    .iter()
                    .map(|b| b.high)
                    .fold(f64::NEG_INFINITY, f64::max),
                ChannelSide::Low => window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min),
            };
        }

        result
    }
}
