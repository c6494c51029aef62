//! Buyer / seller absorption — a heavy-volume push that is given back within K bars.
//!
//! Trigger on bar i: bullish (buyer) or bearish (seller) with volume above
//! `volume_mult` × baseline. The tag is then placed on the first bar j in
//! `i+1..=i+K` whose close crosses back through open[i] (below it for buyers,
//! above it for sellers), and every earlier occurrence of the tag is cleared.
//! The scan stops at the end of the classified window. With no such bar the
//! rule does not match and the cascade continues at bar i.

use crate::classifier::book::TagBook;
use crate::classifier::config::AbsorptionParams;
use crate::classifier::rule::{Bias, Placement, ScanContext, SignalRule};
use crate::domain::Tag;

#[derive(Debug, Clone)]
pub struct AbsorptionRule {
    bias: Bias,
    volume_mult: f64,
    horizon: usize,
}

impl AbsorptionRule {
    pub fn new(bias: Bias, params: &AbsorptionParams, horizon: usize) -> Self {
        Self {
            bias,
            volume_mult: params.volume_mult,
            horizon,
        }
    }

    pub fn buyers(params: &AbsorptionParams, horizon: usize) -> Self {
        Self::new(Bias::Bullish, params, horizon)
    }

    pub fn sellers(params: &AbsorptionParams, horizon: usize) -> Self {
        Self::new(Bias::Bearish, params, horizon)
    }

    /// First bar after `index` (within the horizon and window) that gives the move back.
    fn find_target(&self, ctx: &ScanContext<'_>, index: usize) -> Option<usize> {
        let open = ctx.bar(index).open;
        let last = index.saturating_add(self.horizon).min(ctx.window_end.saturating_sub(1));
        (index + 1..=last).find(|&j| {
            let close = ctx.bar(j).close;
            match self.bias {
                Bias::Bullish => close < open,
                Bias::Bearish => close > open,
            }
        })
    }
}

impl SignalRule for AbsorptionRule {
    fn name(&self) -> &str {
        match self.bias {
            Bias::Bullish => "buyer_absorption",
            Bias::Bearish => "seller_absorption",
        }
    }

    fn tag(&self) -> Tag {
        match self.bias {
            Bias::Bullish => Tag::BuyerAbsorption,
            Bias::Bearish => Tag::SellerAbsorption,
        }
    }

    fn warmup_bars(&self) -> usize {
        0
    }

    fn evaluate(&self, ctx: &ScanContext<'_>, index: usize, _book: &TagBook) -> Option<Placement> {
        let bar = ctx.bar(index);
        let directional = match self.bias {
            Bias::Bullish => bar.is_bullish(),
            Bias::Bearish => bar.is_bearish(),
        };
        if !directional || !ctx.volume_above(index, self.volume_mult) {
            return None;
        }

        self.find_target(ctx, index)
            .map(|target| Placement::exclusive(target, self.tag()))
    }
}
