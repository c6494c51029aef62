//! Fake drop / fake rise — a reversal bar that lacks volume conviction.
//!
//! Fake drop: bearish bar after a bullish one, body at least `body_ratio` ×
//! previous body, volume below `volume_mult` × baseline. Fake rise mirrors it.
//! Suppressed if the same tag appears in the trailing `dedup_window` bars
//! counted including the current one.

use crate::classifier::book::TagBook;
use crate::classifier::config::FakeMoveParams;
use crate::classifier::rule::{Bias, Placement, ScanContext, SignalRule};
use crate::domain::Tag;

#[derive(Debug, Clone)]
pub struct FakeMoveRule {
    /// Direction of the move being faked: bearish for a fake drop.
    bias: Bias,
    body_ratio: f64,
    volume_mult: f64,
    dedup_window: usize,
}

impl FakeMoveRule {
    pub fn new(bias: Bias, params: &FakeMoveParams, dedup_window: usize) -> Self {
        Self {
            bias,
            body_ratio: params.body_ratio,
            volume_mult: params.volume_mult,
            dedup_window,
        }
    }

    pub fn fake_drop(params: &FakeMoveParams, dedup_window: usize) -> Self {
        Self::new(Bias::Bearish, params, dedup_window)
    }

    pub fn fake_rise(params: &FakeMoveParams, dedup_window: usize) -> Self {
        Self::new(Bias::Bullish, params, dedup_window)
    }
}

impl SignalRule for FakeMoveRule {
    fn name(&self) -> &str {
        match self.bias {
            Bias::Bearish => "fake_drop",
            Bias::Bullish => "fake_rise",
        }
    }

    fn tag(&self) -> Tag {
        match self.bias {
            Bias::Bearish => Tag::FakeDrop,
            Bias::Bullish => Tag::FakeRise,
        }
    }

    fn evaluate(&self, ctx: &ScanContext<'_>, index: usize, book: &TagBook) -> Option<Placement> {
        if index < self.warmup_bars() {
            return None;
        }

        let bar = ctx.bar(index);
        let prev = ctx.bar(index - 1);
        let reverses = match self.bias {
            Bias::Bearish => bar.is_bearish() && prev.is_bullish(),
            Bias::Bullish => bar.is_bullish() && prev.is_bearish(),
        };
        if !reverses {
            return None;
        }

        if ctx.stat(index).body >= self.body_ratio * ctx.stat(index - 1).body
            && ctx.volume_below(index, self.volume_mult)
            && !book.recent(self.tag(), index, self.dedup_window)
        {
            Some(Placement::at(index, self.tag()))
        } else {
            None
        }
    }
}
