//! Weak leg — a continuation bar with a collapsing body on light volume.
//!
//! Bullish: close up from the previous close, bullish bar, body below
//! `body_ratio` × previous body, volume below `volume_mult` × baseline.
//! Bearish mirrors the direction conditions.

use crate::classifier::book::TagBook;
use crate::classifier::config::WeakLegParams;
use crate::classifier::rule::{Bias, Placement, ScanContext, SignalRule};
use crate::domain::Tag;

#[derive(Debug, Clone)]
pub struct WeakLegRule {
    bias: Bias,
    body_ratio: f64,
    volume_mult: f64,
}

impl WeakLegRule {
    pub fn new(bias: Bias, params: &WeakLegParams) -> Self {
        Self {
            bias,
            body_ratio: params.body_ratio,
            volume_mult: params.volume_mult,
        }
    }

    pub fn bullish(params: &WeakLegParams) -> Self {
        Self::new(Bias::Bullish, params)
    }

    pub fn bearish(params: &WeakLegParams) -> Self {
        Self::new(Bias::Bearish, params)
    }
}

impl SignalRule for WeakLegRule {
    fn name(&self) -> &str {
        match self.bias {
            Bias::Bullish => "bullish_weak_leg",
            Bias::Bearish => "bearish_weak_leg",
        }
    }

    fn tag(&self) -> Tag {
        match self.bias {
            Bias::Bullish => Tag::BullishWeakLeg,
            Bias::Bearish => Tag::BearishWeakLeg,
        }
    }

    fn evaluate(&self, ctx: &ScanContext<'_>, index: usize, _book: &TagBook) -> Option<Placement> {
        if index < self.warmup_bars() {
            return None;
        }

        let bar = ctx.bar(index);
        let stat = ctx.stat(index);
        let continues = match self.bias {
            Bias::Bullish => stat.point_change > 0.0 && bar.is_bullish(),
            Bias::Bearish => stat.point_change < 0.0 && bar.is_bearish(),
        };

        if continues
            && stat.body < self.body_ratio * ctx.stat(index - 1).body
            && ctx.volume_below(index, self.volume_mult)
        {
            Some(Placement::at(index, self.tag()))
        } else {
            None
        }
    }
}
