//! Point of Interest — a full-bodied directional bar on very heavy volume.
//!
//! Body must exceed `body_fraction` of the range and volume must exceed
//! `volume_mult` × baseline. No duplicate guard.

use crate::classifier::book::TagBook;
use crate::classifier::config::PoiParams;
use crate::classifier::rule::{Bias, Placement, ScanContext, SignalRule};
use crate::domain::Tag;

#[derive(Debug, Clone)]
pub struct PoiRule {
    bias: Bias,
    body_fraction: f64,
    volume_mult: f64,
}

impl PoiRule {
    pub fn new(bias: Bias, params: &PoiParams) -> Self {
        Self {
            bias,
            body_fraction: params.body_fraction,
            volume_mult: params.volume_mult,
        }
    }

    pub fn bullish(params: &PoiParams) -> Self {
        Self::new(Bias::Bullish, params)
    }

    pub fn bearish(params: &PoiParams) -> Self {
        Self::new(Bias::Bearish, params)
    }
}

impl SignalRule for PoiRule {
    fn name(&self) -> &str {
        match self.bias {
            Bias::Bullish => "bullish_poi",
            Bias::Bearish => "bearish_poi",
        }
    }

    fn tag(&self) -> Tag {
        match self.bias {
            Bias::Bullish => Tag::BullishPoi,
            Bias::Bearish => Tag::BearishPoi,
        }
    }

    fn warmup_bars(&self) -> usize {
        0
    }

    fn evaluate(&self, ctx: &ScanContext<'_>, index: usize, _book: &TagBook) -> Option<Placement> {
        let bar = ctx.bar(index);
        let stat = ctx.stat(index);

        let directional = match self.bias {
            Bias::Bullish => bar.is_bullish(),
            Bias::Bearish => bar.is_bearish(),
        };

        if directional
            && stat.body > self.body_fraction * stat.range
            && ctx.volume_above(index, self.volume_mult)
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

    #[test]
    fn bullish_fires_on_marubozu_with_volume() {
        let mut candles = vec![BASE; 6];
        // body 14 of range 17 (0.82)
        candles[3] = (96.0, 112.0, 95.0, 110.0, 6000.0);
        let series = flat_baseline_series(&candles);
        let book = TagBook::new(series.len());

        let rule = PoiRule::bullish(&PoiParams::default());
        assert_eq!(
            evaluate_at(&rule, &series, 3, &book),
            Some(Placement::at(3, Tag::BullishPoi))
        );
        let rule = PoiRule::bearish(&PoiParams::default());
        assert!(evaluate_at(&rule, &series, 3, &book).is_none());
    }

    #[test]
    fn small_body_is_rejected() {
        let mut candles = vec![BASE; 6];
        // body 10 of range 17 (0.59)
        candles[3] = (96.0, 112.0, 95.0, 106.0, 6000.0);
        let series = flat_baseline_series(&candles);
        let book = TagBook::new(series.len());
        let rule = PoiRule::bullish(&PoiParams::default());
        assert!(evaluate_at(&rule, &series, 3, &book).is_none());
    }

    #[test]
    fn needs_double_volume() {
        let mut candles = vec![BASE; 6];
        candles[3] = (96.0, 112.0, 95.0, 110.0, 2000.0);
        let series = flat_baseline_series(&candles);
        let book = TagBook::new(series.len());
        let rule = PoiRule::bullish(&PoiParams::default());
        assert!(evaluate_at(&rule, &series, 3, &book).is_none());
    }

    #[test]
    fn bearish_fires_on_full_down_bar() {
        let mut candles = vec![BASE; 6];
        candles[3] = (110.0, 111.0, 95.0, 96.0, 6000.0);
        let series = flat_baseline_series(&candles);
        let book = TagBook::new(series.len());
        let rule = PoiRule::bearish(&PoiParams::default());
        assert_eq!(
            evaluate_at(&rule, &series, 3, &book),
            Some(Placement::at(3, Tag::BearishPoi))
        );
    }
}
