//! Point of Reinforcement — a heavy-volume break of the prior N-bar extreme.
//!
//! Bullish: high[i] > max(high[i-N..i]) with volume > m * baseline.
//! Bearish: low[i] < min(low[i-N..i]) with volume > m * baseline.
//! Needs i >= N and no same tag in the trailing `dedup_window` bars.

use crate::classifier::book::TagBook;
use crate::classifier::config::PorParams;
use crate::classifier::rule::{Bias, Placement, ScanContext, SignalRule};
use crate::domain::Tag;
use crate::indicators::{ChannelSide, Indicator, PriorChannel};

#[derive(Debug, Clone)]
pub struct PorRule {
    bias: Bias,
    lookback: usize,
    volume_mult: f64,
    dedup_window: usize,
    channel_key: String,
}

impl PorRule {
    pub fn new(bias: Bias, params: &PorParams) -> Self {
        Self {
            bias,
            lookback: params.lookback,
            volume_mult: params.volume_mult,
            dedup_window: params.dedup_window,
            channel_key: PriorChannel::key(params.lookback, Self::side(bias)),
        }
    }

    pub fn bullish(params: &PorParams) -> Self {
        Self::new(Bias::Bullish, params)
    }

    pub fn bearish(params: &PorParams) -> Self {
        Self::new(Bias::Bearish, params)
    }

    fn side(bias: Bias) -> ChannelSide {
        match bias {
            Bias::Bullish => ChannelSide::High,
            Bias::Bearish => ChannelSide::Low,
        }
    }
}

impl SignalRule for PorRule {
    fn name(&self) -> &str {
        match self.bias {
            Bias::Bullish => "bullish_por",
            Bias::Bearish => "bearish_por",
        }
    }

    fn tag(&self) -> Tag {
        match self.bias {
            Bias::Bullish => Tag::BullishPor,
            Bias::Bearish => Tag::BearishPor,
        }
    }

    fn warmup_bars(&self) -> usize {
        self.lookback
    }

    fn required_indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![Box::new(PriorChannel::new(
            self.lookback,
            Self::side(self.bias),
        ))]
    }

    fn evaluate(&self, ctx: &ScanContext<'_>, index: usize, book: &TagBook) -> Option<Placement> {
        if index < self.warmup_bars() {
            return None;
        }

        let level = ctx.indicators.get(&self.channel_key, index)?;
        if level.is_nan() {
            return None;
        }

        let bar = ctx.bar(index);
        let breaks = match self.bias {
            Bias::Bullish => bar.high > level,
            Bias::Bearish => bar.low < level,
        };

        if breaks
            && ctx.volume_above(index, self.volume_mult)
            && !book.recent(self.tag(), index, self.dedup_window)
        {
            Some(Placement::at(index, self.tag()))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::test_support::*;

    fn bullish() -> PorRule {
        PorRule::bullish(&PorParams::default())
    }

    fn bearish() -> PorRule {
        PorRule::bearish(&PorParams::default())
    }

    #[test]
    fn bullish_fires_on_new_high_with_volume() {
        let mut candles = vec![BASE; 12];
        candles[11] = (101.0, 103.0, 100.0, 101.5, 5000.0);
        let series = flat_baseline_series(&candles);
        let book = TagBook::new(series.len());

        // mean volume 1333.3, threshold 2400
        assert_eq!(
            evaluate_at(&bullish(), &series, 11, &book),
            Some(Placement::at(11, Tag::BullishPor))
        );
        assert!(evaluate_at(&bearish(), &series, 11, &book).is_none());
    }

    #[test]
    fn equal_high_is_not_a_break() {
        let mut candles = vec![BASE; 12];
        candles[11] = (101.0, 102.0, 100.0, 101.5, 5000.0);
        let series = flat_baseline_series(&candles);
        let book = TagBook::new(series.len());
        assert!(evaluate_at(&bullish(), &series, 11, &book).is_none());
    }

    #[test]
    fn needs_full_lookback() {
        let mut candles = vec![BASE; 12];
        candles[9] = (101.0, 103.0, 100.0, 101.5, 5000.0);
        let series = flat_baseline_series(&candles);
        let book = TagBook::new(series.len());
        assert!(evaluate_at(&bullish(), &series, 9, &book).is_none());
    }

    #[test]
    fn bearish_fires_on_new_low_with_volume() {
        let mut candles = vec![BASE; 12];
        candles[10] = (100.0, 101.0, 98.0, 99.0, 5000.0);
        let series = flat_baseline_series(&candles);
        let book = TagBook::new(series.len());
        assert_eq!(
            evaluate_at(&bearish(), &series, 10, &book),
            Some(Placement::at(10, Tag::BearishPor))
        );
    }

    #[test]
    fn recent_por_suppresses() {
        let mut candles = vec![BASE; 12];
        candles[11] = (101.0, 103.0, 100.0, 101.5, 5000.0);
        let series = flat_baseline_series(&candles);

        let mut book = TagBook::new(series.len());
        book.place(Placement::at(8, Tag::BullishPor));
        assert!(evaluate_at(&bullish(), &series, 11, &book).is_some());

        book.place(Placement::at(9, Tag::BullishPor));
        assert!(evaluate_at(&bullish(), &series, 11, &book).is_none());
    }
}
