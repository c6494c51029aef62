//! Aggressive buyers / sellers — wide-bodied bar closing at its extreme on heavy volume.
//!
//! Buyers: bullish bar with close >= high - f * range, volume > m * baseline and
//! a body larger than the previous bar's. Sellers mirror this at the low.
//! Suppressed if the same tag appears in the trailing `dedup_window` bars
//! counted including the current one.

use crate::classifier::book::TagBook;
use crate::classifier::config::AggressiveParams;
use crate::classifier::rule::{Bias, Placement, ScanContext, SignalRule};
use crate::domain::Tag;

#[derive(Debug, Clone)]
pub struct AggressiveRule {
    bias: Bias,
    close_fraction: f64,
    volume_mult: f64,
    dedup_window: usize,
}

impl AggressiveRule {
    pub fn new(bias: Bias, params: &AggressiveParams, dedup_window: usize) -> Self {
        Self {
            bias,
            close_fraction: params.close_fraction,
            volume_mult: params.volume_mult,
            dedup_window,
        }
    }

    pub fn buyers(params: &AggressiveParams, dedup_window: usize) -> Self {
        Self::new(Bias::Bullish, params, dedup_window)
    }

    pub fn sellers(params: &AggressiveParams, dedup_window: usize) -> Self {
        Self::new(Bias::Bearish, params, dedup_window)
    }
}

impl SignalRule for AggressiveRule {
    fn name(&self) -> &str {
        match self.bias {
            Bias::Bullish => "aggressive_buyers",
            Bias::Bearish => "aggressive_sellers",
        }
    }

    fn tag(&self) -> Tag {
        match self.bias {
            Bias::Bullish => Tag::AggressiveBuy,
            Bias::Bearish => Tag::AggressiveSell,
        }
    }

    fn evaluate(&self, ctx: &ScanContext<'_>, index: usize, book: &TagBook) -> Option<Placement> {
        if index < self.warmup_bars() {
            return None;
        }

        let bar = ctx.bar(index);
        let stat = ctx.stat(index);
        let margin = self.close_fraction * stat.range;

        let at_extreme = match self.bias {
            Bias::Bullish => bar.is_bullish() && bar.close >= bar.high - margin,
            Bias::Bearish => bar.is_bearish() && bar.close <= bar.low + margin,
        };
        if !at_extreme {
            return None;
        }

        if !ctx.volume_above(index, self.volume_mult) {
            return None;
        }
        if stat.body <= ctx.stat(index - 1).body {
            return None;
        }
        if book.recent(self.tag(), index, self.dedup_window) {
            return None;
        }

        Some(Placement::at(index, self.tag()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::test_support::*;

    fn buyers() -> AggressiveRule {
        AggressiveRule::buyers(&AggressiveParams::default(), 4)
    }

    fn sellers() -> AggressiveRule {
        AggressiveRule::sellers(&AggressiveParams::default(), 4)
    }

    #[test]
    fn buyers_fire_on_strong_close() {
        let mut candles = vec![BASE; 5];
        candles[4] = (100.0, 110.0, 99.0, 109.5, 5000.0);
        let series = flat_baseline_series(&candles);
        let book = TagBook::new(series.len());

        // mean volume 1800, threshold 2700
        let placement = evaluate_at(&buyers(), &series, 4, &book).unwrap();
        assert_eq!(placement, Placement::at(4, Tag::AggressiveBuy));
        assert!(evaluate_at(&sellers(), &series, 4, &book).is_none());
    }

    #[test]
    fn buyers_need_close_near_high() {
        let mut candles = vec![BASE; 5];
        // range 11, margin 1.1, close 108 < 108.9
        candles[4] = (100.0, 110.0, 99.0, 108.0, 5000.0);
        let series = flat_baseline_series(&candles);
        let book = TagBook::new(series.len());
        assert!(evaluate_at(&buyers(), &series, 4, &book).is_none());
    }

    #[test]
    fn buyers_need_heavy_volume() {
        let mut candles = vec![BASE; 5];
        candles[4] = (100.0, 110.0, 99.0, 109.5, 1200.0);
        let series = flat_baseline_series(&candles);
        let book = TagBook::new(series.len());
        assert!(evaluate_at(&buyers(), &series, 4, &book).is_none());
    }

    #[test]
    fn buyers_need_expanding_body() {
        let mut candles = vec![BASE; 5];
        candles[3] = (100.0, 112.0, 99.0, 111.0, 1000.0);
        candles[4] = (100.0, 110.0, 99.0, 109.5, 5000.0);
        let series = flat_baseline_series(&candles);
        let book = TagBook::new(series.len());
        assert!(evaluate_at(&buyers(), &series, 4, &book).is_none());
    }

    #[test]
    fn sellers_fire_on_weak_close() {
        let mut candles = vec![BASE; 5];
        candles[4] = (100.0, 101.0, 90.0, 90.5, 5000.0);
        let series = flat_baseline_series(&candles);
        let book = TagBook::new(series.len());

        let placement = evaluate_at(&sellers(), &series, 4, &book).unwrap();
        assert_eq!(placement, Placement::at(4, Tag::AggressiveSell));
        assert!(evaluate_at(&buyers(), &series, 4, &book).is_none());
    }

    #[test]
    fn recent_tag_suppresses() {
        let mut candles = vec![BASE; 6];
        candles[5] = (100.0, 110.0, 99.0, 109.5, 5000.0);
        let series = flat_baseline_series(&candles);

        let mut book = TagBook::new(series.len());
        // window of 4 ending at bar 5 covers bars 2..=4 before it
        book.place(Placement::at(1, Tag::AggressiveBuy));
        assert!(evaluate_at(&buyers(), &series, 5, &book).is_some());

        book.place(Placement::at(2, Tag::AggressiveBuy));
        assert!(evaluate_at(&buyers(), &series, 5, &book).is_none());
    }

    #[test]
    fn first_bar_is_skipped() {
        let series = flat_baseline_series(&[(100.0, 110.0, 99.0, 109.5, 5000.0), BASE]);
        let book = TagBook::new(series.len());
        assert!(evaluate_at(&buyers(), &series, 0, &book).is_none());
    }
}
